//! Unit tests for hm-ranking.

use hm_core::{SimRng, SpeciesId, StandId, Year};
use hm_landscape::{Cohort, ExternalSiteVars, Landscape, LandscapeBuilder};

use crate::{
    EconomicRank, EconomicRankParameters, EconomicRankTable, FireRiskRank, FireRiskTable,
    MaxCohortAge, MinimumBiomassRank, RandomRank, RankingContext, RankingError,
    Requirement, StandRanker, StandRanking, TimeSinceDisturbanceRank,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const NOW: Year = Year(100);

/// One row of five cells:
///
/// ```text
/// col:   0    1    2    3    4
///        S0   S0   S1   S1   S2
/// ```
///
/// | stand | mean age | mean biomass | years since fire |
/// |-------|----------|--------------|------------------|
/// | S0    | 40       | 3000         | 100              |
/// | S1    | 50       | 3500         | 10               |
/// | S2    | 10       | 500          | 50               |
fn forest(external: ExternalSiteVars) -> Landscape {
    let mut b = LandscapeBuilder::new(1.0);
    let cells = [(1, 0, 50, 4000), (1, 0, 30, 2000), (2, 1, 80, 6000), (2, 1, 20, 1000), (3, 0, 10, 500)];
    for (col, &(stand, species, age, biomass)) in cells.iter().enumerate() {
        let site = b.add_site(0, col as u32, stand, 1).unwrap();
        b.add_cohort(site, Cohort { species: SpeciesId(species), age, biomass });
    }
    b.external(external).build()
}

fn with_fire() -> ExternalSiteVars {
    ExternalSiteVars {
        time_of_last_fire: Some(vec![Year(0), Year(0), Year(90), Year(90), Year(50)]),
        ..ExternalSiteVars::default()
    }
}

fn all_stands(land: &Landscape) -> Vec<StandId> {
    land.stands.iter().map(|s| s.id).collect()
}

fn order(rankings: &[StandRanking]) -> Vec<u32> {
    rankings.iter().map(|r| r.stand.0).collect()
}

// ── Requirements ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod requirement {
    use super::*;

    #[test]
    fn minimum_age_uses_mean_site_age() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let req = Requirement::MinimumAge(40);
        assert!(req.met_by(StandId(0), &ctx));
        assert!(req.met_by(StandId(1), &ctx));
        assert!(!req.met_by(StandId(2), &ctx));
    }

    #[test]
    fn minimum_biomass_is_inclusive() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let req = Requirement::MinimumBiomass(3000.0);
        assert!(req.met_by(StandId(0), &ctx));
        assert!(!req.met_by(StandId(2), &ctx));
    }

    #[test]
    fn time_since_fire_averages_over_sites() {
        let land = forest(with_fire());
        let ctx = RankingContext::new(NOW, &land);
        let req = Requirement::TimeSinceLastFire(40);
        assert!(req.met_by(StandId(0), &ctx));
        assert!(!req.met_by(StandId(1), &ctx));
        assert!(req.met_by(StandId(2), &ctx));
    }

    #[test]
    fn stand_without_sites_meets_nothing() {
        let mut b = LandscapeBuilder::new(1.0);
        let site = b.add_site(0, 0, 1, 1).unwrap();
        b.add_cohort(site, Cohort { species: SpeciesId(0), age: 80, biomass: 5000 });
        let empty = b.add_stand(2, 1).unwrap();
        let land = b
            .external(ExternalSiteVars {
                time_of_last_fire: Some(vec![Year(0)]),
                time_of_last_wind: Some(vec![Year(0)]),
                ..ExternalSiteVars::default()
            })
            .build();
        let ctx = RankingContext::new(NOW, &land);

        let reqs = [
            Requirement::MinimumAge(0),
            Requirement::MinimumBiomass(0.0),
            Requirement::TimeSinceLastFire(0),
            Requirement::TimeSinceLastWind(0),
        ];
        for req in &reqs {
            assert!(req.met_by(StandId(0), &ctx), "{req:?}");
            assert!(!req.met_by(empty, &ctx), "{req:?}");
        }
    }

    #[test]
    fn missing_external_data_is_never_met() {
        let land = forest(with_fire());
        let ctx = RankingContext::new(NOW, &land);
        assert!(!Requirement::TimeSinceLastWind(0).met_by(StandId(0), &ctx));
    }
}

// ── StandRanker ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod ranker {
    use super::*;

    #[test]
    fn max_cohort_age_sorts_descending() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut ranker = StandRanker::new(Box::new(MaxCohortAge), vec![]);
        let r = ranker.rank(all_stands(&land), &ctx);
        assert_eq!(order(&r), vec![1, 0, 2]);
        assert_eq!(r[0].rank, 50.0);
    }

    #[test]
    fn unmet_requirement_forces_zero_rank() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut ranker = StandRanker::new(Box::new(MaxCohortAge), vec![Requirement::MinimumAge(40)]);
        let r = ranker.rank(all_stands(&land), &ctx);
        assert_eq!(r[2], StandRanking { stand: StandId(2), rank: 0.0 });
        assert!(!ranker.is_eligible(StandId(2), &ctx));
    }

    #[test]
    fn ties_break_by_ascending_stand_id() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut ranker = StandRanker::new(
            Box::new(MinimumBiomassRank),
            vec![Requirement::MinimumBiomass(3000.0)],
        );
        // Candidates supplied out of order.
        let r = ranker.rank([StandId(2), StandId(1), StandId(0)], &ctx);
        assert_eq!(order(&r), vec![0, 1, 2]);
        assert_eq!(r[0].rank, 1.0);
        assert_eq!(r[1].rank, 1.0);
        assert_eq!(r[2].rank, 0.0);
    }

    #[test]
    fn only_candidates_are_ranked() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut ranker = StandRanker::new(Box::new(MaxCohortAge), vec![]);
        let r = ranker.rank([StandId(2)], &ctx);
        assert_eq!(order(&r), vec![2]);
    }
}

// ── Ranking methods ───────────────────────────────────────────────────────────

#[cfg(test)]
mod methods {
    use super::*;

    #[test]
    fn economic_rank_values_merchantable_cohorts() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut table = EconomicRankTable::new();
        table.set(SpeciesId(0), EconomicRankParameters { rank: 10, minimum_age: 20 }).unwrap();
        table.set(SpeciesId(1), EconomicRankParameters { rank: 50, minimum_age: 100 }).unwrap();

        let mut ranker = StandRanker::new(Box::new(EconomicRank::new(table)), vec![]);
        let r = ranker.rank(all_stands(&land), &ctx);
        // S0: (10/20·50 + 10/20·30) / 2 = 20; S1 and S2 are below minimum age.
        assert_eq!(r[0], StandRanking { stand: StandId(0), rank: 20.0 });
        assert_eq!(r[1].rank, 0.0);
        assert_eq!(r[2].rank, 0.0);
    }

    #[test]
    fn fire_risk_is_zero_without_fuel_data() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut table = FireRiskTable::new();
        table.set(1, 10).unwrap();
        let mut ranker = StandRanker::new(Box::new(FireRiskRank::new(table)), vec![]);
        assert!(ranker.rank(all_stands(&land), &ctx).iter().all(|r| r.rank == 0.0));
    }

    #[test]
    fn fire_risk_averages_fuel_ranks() {
        let land = forest(ExternalSiteVars {
            fuel_type: Some(vec![1, 1, 2, 2, 3]),
            ..ExternalSiteVars::default()
        });
        let ctx = RankingContext::new(NOW, &land);
        let mut table = FireRiskTable::new();
        table.set(1, 10).unwrap();
        table.set(2, 40).unwrap();
        let mut ranker = StandRanker::new(Box::new(FireRiskRank::new(table)), vec![]);
        let r = ranker.rank(all_stands(&land), &ctx);
        assert_eq!(order(&r), vec![1, 0, 2]);
        assert_eq!(r[0].rank, 40.0);
        assert_eq!(r[1].rank, 10.0);
    }

    #[test]
    fn time_since_disturbance_consumes_fire_requirement() {
        let land = forest(with_fire());
        let ctx = RankingContext::new(NOW, &land);
        let mut ranker = StandRanker::new(
            Box::new(TimeSinceDisturbanceRank),
            vec![Requirement::TimeSinceLastFire(40), Requirement::MinimumAge(20)],
        );
        let r = ranker.rank(all_stands(&land), &ctx);
        // S0 passes the age gate and the fire test; S1 fails fire; S2 fails age.
        assert_eq!(r[0], StandRanking { stand: StandId(0), rank: 1.0 });
        assert_eq!(r[1].rank, 0.0);
        assert_eq!(r[2].rank, 0.0);
    }

    #[test]
    fn time_since_disturbance_without_wind_data_ranks_zero() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut ranker = StandRanker::new(
            Box::new(TimeSinceDisturbanceRank),
            vec![Requirement::TimeSinceLastWind(0)],
        );
        assert!(ranker.rank(all_stands(&land), &ctx).iter().all(|r| r.rank == 0.0));
    }

    #[test]
    fn random_rank_is_positive_and_reproducible() {
        let land = forest(ExternalSiteVars::default());
        let ctx = RankingContext::new(NOW, &land);
        let mut a = StandRanker::new(Box::new(RandomRank::new(SimRng::new(7))), vec![]);
        let mut b = StandRanker::new(Box::new(RandomRank::new(SimRng::new(7))), vec![]);
        let ra = a.rank(all_stands(&land), &ctx);
        let rb = b.rank(all_stands(&land), &ctx);
        assert_eq!(ra, rb);
        assert!(ra.iter().all(|r| r.rank > 0.0 && r.rank <= 1.0));
    }
}

// ── Tables ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tables {
    use super::*;

    #[test]
    fn fuel_type_out_of_range_rejected() {
        let mut table = FireRiskTable::new();
        assert!(table.set(149, 1).is_ok());
        assert!(matches!(table.set(150, 1), Err(RankingError::FuelTypeOutOfRange(150))));
    }

    #[test]
    fn positive_rank_needs_positive_minimum_age() {
        let mut table = EconomicRankTable::new();
        let err = table.set(SpeciesId(3), EconomicRankParameters { rank: 5, minimum_age: 0 });
        assert!(matches!(err, Err(RankingError::ZeroMinimumAge { species: 3, rank: 5 })));
        assert!(table.set(SpeciesId(3), EconomicRankParameters { rank: 0, minimum_age: 0 }).is_ok());
        assert_eq!(table.cohort_value(SpeciesId(3), 500), 0.0);
        assert_eq!(table.cohort_value(SpeciesId(9), 500), 0.0);
    }
}
