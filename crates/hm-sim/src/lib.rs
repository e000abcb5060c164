//! `hm-sim` — timestep driver for the harvest scheduling framework.
//!
//! # Timestep loop
//!
//! ```text
//! for year in start..=end step timestep_years:
//!   observer.on_timestep_start(year)
//!   for each management area (ascending MgmtAreaId):
//!     ① Repeats:  drain every applied prescription's due reserved stands
//!     ② Rank:     one ranking pass per active prescription
//!     ③ Harvest:  highest-ranked stands until the budget is spent;
//!                  repeat prescriptions set aside and enqueue what they cut
//!   observer.on_timestep_end(year, harvest_events)
//! observer.on_run_end(last_year)
//! ```
//!
//! External site arrays (fire, wind, fuel) are swapped in between timesteps
//! with [`HarvestSim::set_external`]; they are never touched mid-timestep.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let landscape = load_landscape_csv("cohorts.csv", &species, 1.0)?;
//! let mut sim = SimBuilder::new(run_config, landscape)
//!     .harvest_config(load_harvest_config("harvest.json")?, species)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::HarvestSim;

// Event types observers receive, re-exported for implementors.
pub use hm_harvest::{HarvestEvents, RepeatFinished, StandHarvestRecord};
