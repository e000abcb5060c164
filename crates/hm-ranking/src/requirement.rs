//! Eligibility predicates over a stand.
//!
//! Every predicate aggregates over the stand's sites.  A stand with no sites
//! never meets any requirement, and neither does a stand whose source array
//! is unavailable.

use hm_core::StandId;

use crate::RankingContext;

/// A requirement that a stand must meet to be eligible for ranking.
#[derive(Clone, Debug, PartialEq)]
pub enum Requirement {
    /// Stand age (mean oldest-cohort age) of at least this many years.
    MinimumAge(u16),

    /// Mean above-ground biomass of at least this many g m⁻².
    MinimumBiomass(f64),

    /// Mean years since the last fire of at least this many years.
    TimeSinceLastFire(u32),

    /// Mean years since the last wind event of at least this many years.
    TimeSinceLastWind(u32),
}

impl Requirement {
    /// Does `stand` meet the requirement?
    pub fn met_by(&self, stand: StandId, ctx: &RankingContext<'_>) -> bool {
        let land = ctx.landscape;
        match *self {
            Requirement::MinimumAge(min) => land
                .mean_site_age(stand)
                .is_some_and(|age| age.round() >= min as f64),

            Requirement::MinimumBiomass(min) => {
                land.mean_biomass(stand).is_some_and(|b| b >= min)
            }

            Requirement::TimeSinceLastFire(min) => land
                .mean_over_sites(stand, |s| {
                    land.external.last_fire(s).map(|y| ctx.now.since(y) as f64)
                })
                .is_some_and(|t| t >= min as f64),

            Requirement::TimeSinceLastWind(min) => land
                .mean_over_sites(stand, |s| {
                    land.external.last_wind(s).map(|y| ctx.now.since(y) as f64)
                })
                .is_some_and(|t| t >= min as f64),
        }
    }

    /// `true` for the fire and wind recency requirements.
    pub fn is_disturbance(&self) -> bool {
        matches!(
            self,
            Requirement::TimeSinceLastFire(_) | Requirement::TimeSinceLastWind(_)
        )
    }
}
