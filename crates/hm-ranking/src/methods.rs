//! Concrete ranking methods.
//!
//! | Method                      | Rank                                              |
//! |-----------------------------|---------------------------------------------------|
//! | [`MaxCohortAge`]            | stand age                                         |
//! | [`EconomicRank`]            | mean over sites of summed merchantable cohort value |
//! | [`FireRiskRank`]            | mean over sites of the fuel-type risk rank        |
//! | [`TimeSinceDisturbanceRank`]| `1` if any fire / wind requirement is met, else `0` |
//! | [`MinimumBiomassRank`]      | `1` if any biomass requirement is met, else `0`   |
//! | [`RandomRank`]              | uniform draw in `(0, 1]`                          |

use hm_core::{SimRng, StandId};

use crate::{EconomicRankTable, FireRiskTable, RankingContext, RankingMethod, Requirement};

// ── MaxCohortAge ──────────────────────────────────────────────────────────────

/// Oldest stands first.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxCohortAge;

impl RankingMethod for MaxCohortAge {
    fn name(&self) -> &'static str {
        "max-cohort-age"
    }

    fn compute_rank(&mut self, stand: StandId, _: &[Requirement], ctx: &RankingContext<'_>) -> f64 {
        ctx.landscape.stand_age(stand) as f64
    }
}

// ── EconomicRank ──────────────────────────────────────────────────────────────

/// Most valuable timber first.
#[derive(Clone, Debug)]
pub struct EconomicRank {
    table: EconomicRankTable,
}

impl EconomicRank {
    pub fn new(table: EconomicRankTable) -> Self {
        Self { table }
    }
}

impl RankingMethod for EconomicRank {
    fn name(&self) -> &'static str {
        "economic"
    }

    fn compute_rank(&mut self, stand: StandId, _: &[Requirement], ctx: &RankingContext<'_>) -> f64 {
        let land = ctx.landscape;
        land.mean_over_sites(stand, |site| {
            Some(
                land.sites.cohorts[site.index()]
                    .iter()
                    .map(|c| self.table.cohort_value(c.species, c.age))
                    .sum(),
            )
        })
        .unwrap_or(0.0)
    }
}

// ── FireRiskRank ──────────────────────────────────────────────────────────────

/// Highest fuel-type risk first.  Ranks are `0` while no fuel data is present.
#[derive(Clone, Debug)]
pub struct FireRiskRank {
    table:        FireRiskTable,
    fuel_present: bool,
}

impl FireRiskRank {
    pub fn new(table: FireRiskTable) -> Self {
        Self { table, fuel_present: false }
    }
}

impl RankingMethod for FireRiskRank {
    fn name(&self) -> &'static str {
        "fire-risk"
    }

    fn begin_pass(&mut self, _: &[Requirement], ctx: &RankingContext<'_>) {
        self.fuel_present = ctx.landscape.external.fuel_type.is_some();
        if !self.fuel_present {
            tracing::warn!(year = ctx.now.0, "fuel type data unavailable; fire-risk ranks are 0");
        }
    }

    fn compute_rank(&mut self, stand: StandId, _: &[Requirement], ctx: &RankingContext<'_>) -> f64 {
        if !self.fuel_present {
            return 0.0;
        }
        let land = ctx.landscape;
        land.mean_over_sites(stand, |site| {
            land.external.fuel_type(site).map(|f| self.table.rank_of(f) as f64)
        })
        .unwrap_or(0.0)
    }
}

// ── TimeSinceDisturbanceRank ──────────────────────────────────────────────────

/// Binary rank: a stand qualifies when it has gone long enough without fire
/// or wind.  Consumes the disturbance requirements instead of gating on them,
/// so meeting either one is enough.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeSinceDisturbanceRank;

impl RankingMethod for TimeSinceDisturbanceRank {
    fn name(&self) -> &'static str {
        "time-since-disturbance"
    }

    fn begin_pass(&mut self, requirements: &[Requirement], ctx: &RankingContext<'_>) {
        let ext = &ctx.landscape.external;
        for r in requirements {
            let missing = match r {
                Requirement::TimeSinceLastFire(_) => ext.time_of_last_fire.is_none(),
                Requirement::TimeSinceLastWind(_) => ext.time_of_last_wind.is_none(),
                _ => false,
            };
            if missing {
                tracing::warn!(year = ctx.now.0, requirement = ?r, "disturbance data unavailable; requirement never met");
            }
        }
    }

    fn consumes(&self, requirement: &Requirement) -> bool {
        requirement.is_disturbance()
    }

    fn compute_rank(&mut self, stand: StandId, requirements: &[Requirement], ctx: &RankingContext<'_>) -> f64 {
        let met = requirements
            .iter()
            .filter(|r| r.is_disturbance())
            .any(|r| r.met_by(stand, ctx));
        if met { 1.0 } else { 0.0 }
    }
}

// ── MinimumBiomassRank ────────────────────────────────────────────────────────

/// Binary rank on the attached `MinimumBiomass` requirements.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimumBiomassRank;

impl RankingMethod for MinimumBiomassRank {
    fn name(&self) -> &'static str {
        "minimum-biomass"
    }

    fn consumes(&self, requirement: &Requirement) -> bool {
        matches!(requirement, Requirement::MinimumBiomass(_))
    }

    fn compute_rank(&mut self, stand: StandId, requirements: &[Requirement], ctx: &RankingContext<'_>) -> f64 {
        let met = requirements
            .iter()
            .filter(|r| self.consumes(r))
            .any(|r| r.met_by(stand, ctx));
        if met { 1.0 } else { 0.0 }
    }
}

// ── RandomRank ────────────────────────────────────────────────────────────────

/// Uniform random order, reproducible for a fixed seed.
pub struct RandomRank {
    rng: SimRng,
}

impl RandomRank {
    pub fn new(rng: SimRng) -> Self {
        Self { rng }
    }
}

impl RankingMethod for RandomRank {
    fn name(&self) -> &'static str {
        "random"
    }

    fn compute_rank(&mut self, _: StandId, _: &[Requirement], _: &RankingContext<'_>) -> f64 {
        // unit() is in [0, 1); flip it so every eligible stand ranks above 0.
        1.0 - self.rng.unit()
    }
}
