//! Simulation observer trait for progress reporting and data collection.

use hm_core::Year;
use hm_harvest::HarvestEvents;

/// Callbacks invoked by [`HarvestSim::run`][crate::HarvestSim::run] at
/// timestep boundaries, on top of the harvest events every observer also
/// receives.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl HarvestEvents for Progress {
///     fn on_stand_harvested(&mut self, r: &StandHarvestRecord) {
///         println!("{}: stand {} by {}", r.time, r.stand_code, r.display_name());
///     }
/// }
///
/// impl SimObserver for Progress {
///     fn on_timestep_end(&mut self, year: Year, events: usize) {
///         println!("{year}: {events} harvest events");
///     }
/// }
/// ```
pub trait SimObserver: HarvestEvents {
    /// Called at the very start of each timestep, before any harvesting.
    fn on_timestep_start(&mut self, _year: Year) {}

    /// Called at the end of each timestep with the number of stand harvest
    /// events (initial and repeat) it produced.
    fn on_timestep_end(&mut self, _year: Year, _harvest_events: usize) {}

    /// Called once after the final timestep completes.
    fn on_run_end(&mut self, _final_year: Year) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl HarvestEvents for NoopObserver {}

impl SimObserver for NoopObserver {}
