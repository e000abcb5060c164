//! small — smallest demo of the harvest scheduling framework.
//!
//! Builds a synthetic 144-cell forest of 36 stands in two management areas
//! and applies four prescriptions: patch cuts with repeat clear-cuts, a
//! shelterwood with one removal cut, harvests that wait out a mid-run fire,
//! and random birch thinning.  Runs 50 years in 10-year timesteps and writes
//! the harvest logs as CSV.
//!
//! Set `RUST_LOG=debug` to trace individual stand harvests and queue moves.

mod forest;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use hm_core::{RunConfig, Year};
use hm_harvest::{HarvestConfigFile, HarvestEvents, RepeatFinished, StandHarvestRecord};
use hm_output::{CsvWriter, HarvestOutputObserver, OutputWriter};
use hm_sim::{SimBuilder, SimObserver};

use forest::{CELL_AREA_HA, build_forest, fire_history, species};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64 = 42;
const START_YEAR: u32 = 2000;
const END_YEAR:   u32 = 2050;
const TIMESTEP:   u32 = 10;
const FIRE_YEAR:  u32 = 2015;
const OUTPUT_DIR: &str = "output/small";

// ── Prescriptions ─────────────────────────────────────────────────────────────

const HARVEST_JSON: &str = r#"{
  "prescriptions": [
    {
      "name": "patch-cut",
      "ranking": { "method": "max_cohort_age" },
      "requirements": [ { "kind": "minimum_age", "years": 60 } ],
      "selection": { "strategy": "complete_stand_spreading", "min_area_ha": 8, "max_area_ha": 12 },
      "cutting": { "kind": "clear_cut" },
      "species_to_plant": [ "pinubank" ],
      "repeat": { "mode": "multiple", "interval": 10, "times": 2 }
    },
    {
      "name": "shelterwood",
      "ranking": {
        "method": "economic",
        "species": [
          { "species": "pinubank", "rank": 40, "minimum_age": 50 },
          { "species": "acersacc", "rank": 80, "minimum_age": 30 }
        ]
      },
      "selection": { "strategy": "complete_stand" },
      "cutting": {
        "kind": "species_age",
        "rules": [
          { "species": "pinubank", "min_age": 40, "percent": 60 },
          { "species": "acersacc", "percent": 30 }
        ]
      },
      "min_time_since_damage": 20,
      "repeat": {
        "mode": "single",
        "interval": 20,
        "additional": {
          "selection": { "strategy": "partial_stand", "percent": 50 },
          "cutting": { "kind": "clear_cut" }
        }
      }
    },
    {
      "name": "post-fire",
      "ranking": { "method": "time_since_disturbance" },
      "requirements": [ { "kind": "time_since_last_fire", "years": 10 } ],
      "selection": { "strategy": "complete_stand" },
      "cutting": { "kind": "species_age", "rules": [ { "species": "pinubank", "percent": 100 } ] },
      "prevent_establishment": true
    },
    {
      "name": "random-thin",
      "ranking": { "method": "random" },
      "selection": { "strategy": "partial_stand", "percent": 25 },
      "cutting": { "kind": "species_age", "rules": [ { "species": "betupapy", "percent": 50 } ] }
    }
  ],
  "applied": [
    { "management_area": 1, "prescription": "patch-cut",   "percent_area": 10 },
    { "management_area": 1, "prescription": "random-thin", "percent_area": 5, "begin": 2020 },
    { "management_area": 2, "prescription": "shelterwood", "percent_area": 15, "end": 2030 },
    { "management_area": 2, "prescription": "post-fire",   "percent_area": 100, "percent_stands": 20, "begin": 2020 }
  ]
}"#;

// ── Observer wrapper to count events ──────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:           HarvestOutputObserver<W>,
    initial_events:  usize,
    repeat_events:   usize,
    generations:     usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: HarvestOutputObserver<W>) -> Self {
        Self { inner, initial_events: 0, repeat_events: 0, generations: 0 }
    }
}

impl<W: OutputWriter> HarvestEvents for CountingObserver<W> {
    fn on_stand_harvested(&mut self, record: &StandHarvestRecord) {
        if record.repeat_number == 0 {
            self.initial_events += 1;
        } else {
            self.repeat_events += 1;
        }
        self.inner.on_stand_harvested(record);
    }

    fn on_repeat_prescription_finished(&mut self, event: &RepeatFinished) {
        if event.last_harvest {
            self.generations += 1;
        }
        self.inner.on_repeat_prescription_finished(event);
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_timestep_end(&mut self, year: Year, harvest_events: usize) {
        self.inner.on_timestep_end(year, harvest_events);
    }

    fn on_run_end(&mut self, final_year: Year) {
        self.inner.on_run_end(final_year);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== small — harvest scheduling demo ===");
    println!("Years: {START_YEAR}..={END_YEAR} step {TIMESTEP}  |  Seed: {SEED}");
    println!();

    // 1. Forest.
    let species = species();
    let landscape = build_forest(&species)?;
    println!(
        "Forest: {} sites, {} stands, {} management areas",
        landscape.sites.count,
        landscape.stands.len(),
        landscape.mgmt_area_codes.len()
    );

    // 2. Build sim.
    let config = RunConfig {
        start:          Year(START_YEAR),
        end:            Year(END_YEAR),
        timestep_years: TIMESTEP,
        seed:           SEED,
        cell_area_ha:   CELL_AREA_HA,
    };
    let harvest = HarvestConfigFile::from_json(HARVEST_JSON)?;
    let mut sim = SimBuilder::new(config, landscape)
        .harvest_config(harvest, species.clone())
        .build()?;
    println!("Applied prescriptions: {}", sim.areas.prescription_count());
    println!();

    // 3. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR), &species)?;
    let mut obs = CountingObserver::new(HarvestOutputObserver::new(writer, &species));

    // 4. Run up to the fire, hand over the fire map, then finish.
    let t0 = Instant::now();
    let before_fire = (FIRE_YEAR - START_YEAR).div_ceil(TIMESTEP);
    sim.run_timesteps(before_fire, &mut obs)?;
    let fires = fire_history(&sim.landscape, Year(FIRE_YEAR));
    sim.set_external(fires);
    tracing::info!(year = FIRE_YEAR, "fire map handed over");
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  initial harvests    : {}", obs.initial_events);
    println!("  repeat harvests     : {}", obs.repeat_events);
    println!("  repeat generations  : {}", obs.generations);
    println!("  logs written to     : {OUTPUT_DIR}/event_log.csv, summary_log.csv");
    println!();

    // 6. Final stand table.
    println!("{:<8} {:<6} {:<16} {:<10} {:<10}", "Stand", "Age", "Prescription", "Last cut", "Set aside");
    println!("{}", "-".repeat(54));
    for stand in sim.landscape.stands.iter() {
        let Some(name) = &stand.prescription_name else { continue };
        println!(
            "{:<8} {:<6} {:<16} {:<10} {:<10}",
            stand.map_code,
            sim.landscape.stand_age(stand.id),
            name,
            stand.time_last_harvested.map_or("-".to_owned(), |y| y.to_string()),
            stand.set_aside_until().map_or("-".to_owned(), |y| y.to_string()),
        );
    }

    Ok(())
}
