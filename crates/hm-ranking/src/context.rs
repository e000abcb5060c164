//! Read-only landscape view passed to every requirement and ranking callback.

use hm_core::Year;
use hm_landscape::Landscape;

/// Built once per ranking pass.
///
/// Holding a single borrow of the landscape for the whole pass means external
/// site arrays (fire, wind, fuel) are read from one consistent snapshot:
/// their owners refresh them between passes, never during one.
#[derive(Clone, Copy)]
pub struct RankingContext<'a> {
    /// Current simulation year.
    pub now: Year,

    pub landscape: &'a Landscape,
}

impl<'a> RankingContext<'a> {
    #[inline]
    pub fn new(now: Year, landscape: &'a Landscape) -> Self {
        Self { now, landscape }
    }
}
