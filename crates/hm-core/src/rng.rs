//! Seeded random streams for random stand ranking.
//!
//! Each applied prescription that ranks at random owns one [`SimRng`], seeded
//! from the run seed and the prescription's index:
//!
//! ```text
//! stream seed = run seed XOR (index × 0x9e37_79b9_7f4a_7c15)
//! ```
//!
//! The multiplier (the golden ratio as a 64-bit fraction) scatters
//! neighbouring indices across the seed space.  Streams never share state, so
//! adding a prescription does not reshuffle the draws of the others.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A deterministic stream of uniform draws.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// The stream for consumer `offset` (a prescription index) of a run
    /// seeded with `seed`.
    pub fn for_offset(seed: u64, offset: u64) -> Self {
        Self::new(seed ^ offset.wrapping_mul(GOLDEN_GAMMA))
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng")
    }
}
