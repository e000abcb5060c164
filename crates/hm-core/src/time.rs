//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer calendar-free `Year` counter.  A run covers the closed
//! range `start..=end` and advances by `timestep_years` each step:
//!
//!   years visited = start, start + ts, start + 2·ts, … ≤ end
//!
//! Using an integer year as the canonical unit keeps repeat-harvest
//! arithmetic (`now + interval <= end`) exact.

use std::fmt;

// ── Year ─────────────────────────────────────────────────────────────────────

/// An absolute simulation year.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Year(pub u32);

impl Year {
    pub const ZERO: Year = Year(0);

    /// Return the year `n` years after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Year {
        Year(self.0 + n)
    }

    /// Years elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Year) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u32> for Year {
    type Output = Year;
    #[inline]
    fn add(self, rhs: u32) -> Year {
        Year(self.0 + rhs)
    }
}

impl std::ops::Sub for Year {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Year) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Y{}", self.0)
    }
}

// ── RunClock ──────────────────────────────────────────────────────────────────

/// The host simulation's time provider: current year plus the run bounds.
///
/// `RunClock` is cheap to copy and holds no heap data.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunClock {
    /// First simulated year (inclusive).
    pub start: Year,
    /// Last simulated year (inclusive).
    pub end: Year,
    /// Years per timestep.
    pub timestep_years: u32,
    /// The current year, advanced by [`RunClock::advance`].
    pub current: Year,
}

impl RunClock {
    pub fn new(start: Year, end: Year, timestep_years: u32) -> Self {
        Self { start, end, timestep_years, current: start }
    }

    /// Advance the clock by one timestep.
    #[inline]
    pub fn advance(&mut self) {
        self.current = self.current + self.timestep_years;
    }

    /// `true` once the clock has moved past the last simulated year.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current > self.end
    }

    /// Number of timesteps visited so far (the current one included).
    pub fn steps_elapsed(&self) -> u32 {
        if self.timestep_years == 0 {
            return 0;
        }
        self.current.since(self.start) / self.timestep_years + 1
    }
}

impl fmt::Display for RunClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}..={}", self.current, self.start, self.end)
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// First simulated year.
    pub start: Year,

    /// Last simulated year (inclusive).
    pub end: Year,

    /// Years per timestep.  Must be > 0.
    pub timestep_years: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Area of one site (raster cell) in hectares.
    pub cell_area_ha: f64,
}

impl RunConfig {
    /// Construct a `RunClock` pre-configured for this run.
    pub fn make_clock(&self) -> RunClock {
        RunClock::new(self.start, self.end, self.timestep_years)
    }
}
