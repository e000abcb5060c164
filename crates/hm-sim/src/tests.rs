//! Integration tests for hm-sim.

use hm_core::{RunConfig, SpeciesId, Year};
use hm_harvest::{
    HarvestConfigFile, HarvestEvents, HarvestError, RepeatFinished, StandHarvestRecord,
};
use hm_landscape::{Cohort, ExternalSiteVars, Landscape, LandscapeBuilder, SpeciesList};

use crate::{NoopObserver, SimBuilder, SimError, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn run_config(start: u32, end: u32, timestep: u32) -> RunConfig {
    RunConfig {
        start:          Year(start),
        end:            Year(end),
        timestep_years: timestep,
        seed:           42,
        cell_area_ha:   1.0,
    }
}

/// Three single-site stands in a row (codes 1, 2, 3; ages 60, 50, 40), all in
/// management area 7.
fn landscape() -> Landscape {
    let mut b = LandscapeBuilder::new(1.0);
    for (col, age) in [60u16, 50, 40].into_iter().enumerate() {
        let site = b.add_site(0, col as u32, col as u32 + 1, 7).unwrap();
        b.add_cohort(site, Cohort { species: SpeciesId(0), age, biomass: 2000 });
    }
    b.build()
}

fn species() -> SpeciesList {
    SpeciesList::new(["pinus"])
}

/// One stand per timestep, re-harvested twice at 10-year intervals.
const REPEAT_JSON: &str = r#"{
    "prescriptions": [ {
        "name": "rx",
        "ranking": { "method": "max_cohort_age" },
        "requirements": [ { "kind": "minimum_age", "years": 30 } ],
        "selection": { "strategy": "complete_stand" },
        "cutting": { "kind": "species_age", "rules": [ { "species": "pinus", "percent": 50 } ] },
        "repeat": { "mode": "multiple", "interval": 10, "times": 2 }
    } ],
    "applied": [ { "management_area": 7, "prescription": "rx", "percent_area": 100, "percent_stands": 34 } ]
}"#;

/// Observer that records timestep boundaries and harvest events.
#[derive(Default)]
struct Trace {
    starts:   Vec<u32>,
    ends:     Vec<(u32, usize)>,
    run_end:  Option<u32>,
    records:  Vec<StandHarvestRecord>,
    finished: Vec<RepeatFinished>,
}

impl HarvestEvents for Trace {
    fn on_stand_harvested(&mut self, record: &StandHarvestRecord) {
        self.records.push(record.clone());
    }
    fn on_repeat_prescription_finished(&mut self, event: &RepeatFinished) {
        self.finished.push(event.clone());
    }
}

impl SimObserver for Trace {
    fn on_timestep_start(&mut self, year: Year) {
        self.starts.push(year.0);
    }
    fn on_timestep_end(&mut self, year: Year, events: usize) {
        self.ends.push((year.0, events));
    }
    fn on_run_end(&mut self, year: Year) {
        self.run_end = Some(year.0);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_default_areas() {
        let sim = SimBuilder::new(run_config(0, 20, 5), landscape()).build().unwrap();
        assert_eq!(sim.areas.len(), 1);
        assert_eq!(sim.areas.find(7).unwrap().stands().len(), 3);
        assert_eq!(sim.clock.current, Year(0));
    }

    #[test]
    fn zero_timestep_rejected() {
        let result = SimBuilder::new(run_config(0, 20, 0), landscape()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn start_after_end_rejected() {
        let result = SimBuilder::new(run_config(30, 20, 5), landscape()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn cell_area_mismatch_rejected() {
        let mut config = run_config(0, 20, 5);
        config.cell_area_ha = 4.0;
        let result = SimBuilder::new(config, landscape()).build();
        assert!(matches!(result, Err(SimError::CellAreaMismatch { .. })));
    }

    #[test]
    fn harvest_config_errors_surface() {
        let mut file = HarvestConfigFile::from_json(REPEAT_JSON).unwrap();
        file.applied[0].management_area = 99;
        let result = SimBuilder::new(run_config(0, 20, 5), landscape())
            .harvest_config(file, species())
            .build();
        assert!(matches!(
            result,
            Err(SimError::Harvest(HarvestError::UnknownManagementArea(99)))
        ));
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn visits_every_year_inclusive() {
        let mut sim = SimBuilder::new(run_config(0, 20, 5), landscape()).build().unwrap();
        let mut trace = Trace::default();
        sim.run(&mut trace).unwrap();
        assert_eq!(trace.starts, vec![0, 5, 10, 15, 20]);
        assert_eq!(trace.run_end, Some(20));
        assert!(sim.clock.is_finished());
    }

    #[test]
    fn run_timesteps_advances_clock() {
        let mut sim = SimBuilder::new(run_config(0, 100, 10), landscape()).build().unwrap();
        sim.run_timesteps(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current, Year(30));
        sim.run_timesteps(2, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current, Year(50));
    }

    #[test]
    fn repeat_chains_run_through_the_timestep_loop() {
        let file = HarvestConfigFile::from_json(REPEAT_JSON).unwrap();
        let mut sim = SimBuilder::new(run_config(0, 20, 10), landscape())
            .harvest_config(file, species())
            .build()
            .unwrap();
        let mut trace = Trace::default();
        sim.run(&mut trace).unwrap();

        // 0: stand 1 initial.  10: stand 1 repeat, stand 2 initial.
        // 20: stand 1 second repeat, stand 2 repeat, stand 3 initial.
        let log: Vec<(u32, u32, String)> = trace
            .records
            .iter()
            .map(|r| (r.time.0, r.stand_code, r.display_name()))
            .collect();
        assert_eq!(
            log,
            vec![
                (0, 1, "rx".to_string()),
                (10, 1, "rx(1)".to_string()),
                (10, 2, "rx".to_string()),
                (20, 1, "rx(2)".to_string()),
                (20, 2, "rx(1)".to_string()),
                (20, 3, "rx".to_string()),
            ]
        );
        assert_eq!(trace.ends, vec![(0, 1), (10, 2), (20, 3)]);
        assert_eq!(sim.harvest_events(), 6);
        assert!(trace.finished.iter().all(|f| f.last_harvest));

        // Stand 1 used up its two repeats; stand 2's chain is cut off by the end year.
        let s1 = sim.landscape.stands.get(sim.landscape.stands.find(1).unwrap());
        assert_eq!(s1.set_aside(), None);
        let s2 = sim.landscape.stands.get(sim.landscape.stands.find(2).unwrap());
        assert_eq!(s2.set_aside_until(), Some(Year(20)));
    }

    #[test]
    fn external_data_is_swapped_between_timesteps() {
        let json = r#"{
            "prescriptions": [ {
                "name": "salvage",
                "ranking": { "method": "time_since_disturbance" },
                "requirements": [ { "kind": "time_since_last_fire", "years": 5 } ],
                "selection": { "strategy": "complete_stand" },
                "cutting": { "kind": "clear_cut" }
            } ],
            "applied": [ { "management_area": 7, "prescription": "salvage", "percent_area": 100 } ]
        }"#;
        let file = HarvestConfigFile::from_json(json).unwrap();
        let mut sim = SimBuilder::new(run_config(0, 20, 10), landscape())
            .harvest_config(file, species())
            .build()
            .unwrap();
        let mut trace = Trace::default();

        // No fire data yet: the requirement can never be met.
        sim.run_timesteps(1, &mut trace).unwrap();
        assert!(trace.records.is_empty());

        sim.set_external(ExternalSiteVars {
            time_of_last_fire: Some(vec![Year(0), Year(8), Year(0)]),
            ..ExternalSiteVars::default()
        });
        sim.run_timesteps(1, &mut trace).unwrap();
        let codes: Vec<u32> = trace.records.iter().map(|r| r.stand_code).collect();
        assert_eq!(codes, vec![1, 3]);
    }
}
