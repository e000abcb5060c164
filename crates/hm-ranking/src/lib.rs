//! `hm-ranking` — which stands are eligible, and how desirable each one is.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`context`]     | `RankingContext` (read-only view built once per pass)     |
//! | [`requirement`] | `Requirement` predicates (`MinimumAge`, `MinimumBiomass`, time since fire / wind) |
//! | [`method`]      | `RankingMethod` trait, `StandRanking`, `StandRanker`      |
//! | [`methods`]     | `MaxCohortAge`, `EconomicRank`, `FireRiskRank`, `TimeSinceDisturbanceRank`, `MinimumBiomassRank`, `RandomRank` |
//! | [`tables`]      | `EconomicRankTable`, `FireRiskTable`                      |
//! | [`error`]       | `RankingError`, `RankingResult<T>`                        |
//!
//! # Ranking pass
//!
//! ```text
//! method.begin_pass(requirements, ctx)          // once per pass
//! for stand in candidates:
//!     gate  = all requirements the method does not consume are met
//!     rank  = gate ? method.compute_rank(stand) : 0
//! sort by rank descending, then StandId ascending
//! ```

pub mod context;
pub mod error;
pub mod method;
pub mod methods;
pub mod requirement;
pub mod tables;

#[cfg(test)]
mod tests;

pub use context::RankingContext;
pub use error::{RankingError, RankingResult};
pub use method::{RankingMethod, StandRanker, StandRanking};
pub use methods::{
    EconomicRank, FireRiskRank, MaxCohortAge, MinimumBiomassRank, RandomRank,
    TimeSinceDisturbanceRank,
};
pub use requirement::Requirement;
pub use tables::{EconomicRankParameters, EconomicRankTable, FireRiskTable, MAX_FUEL_TYPES};
