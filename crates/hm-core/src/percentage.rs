//! `Percentage` — a fraction validated into `[0, 1]` at construction.

use std::fmt;

use crate::{HmError, HmResult};

/// A validated fraction.  `Percentage::new(0.25)` means 25 %.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Percentage(f64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.0);
    pub const FULL: Percentage = Percentage(1.0);

    /// Validate `fraction` into `[0, 1]`.  NaN is rejected.
    pub fn new(fraction: f64) -> HmResult<Self> {
        if (0.0..=1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(HmError::InvalidPercentage(fraction))
        }
    }

    /// Build from a value in percent (`25.0` → 25 %).
    pub fn from_percent(percent: f64) -> HmResult<Self> {
        Self::new(percent / 100.0)
    }

    #[inline]
    pub fn fraction(self) -> f64 {
        self.0
    }

    /// `self × total`.
    #[inline]
    pub fn of(self, total: f64) -> f64 {
        self.0 * total
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}
