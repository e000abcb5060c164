//! The `HarvestSim` struct and its timestep loop.

use hm_core::{RunClock, RunConfig, Year};
use hm_harvest::{HarvestContext, ManagementAreas};
use hm_landscape::{ExternalSiteVars, Landscape};

use crate::{SimObserver, SimResult};

/// The main harvest simulation runner.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct HarvestSim {
    /// Run bounds, timestep length, seed, cell area.
    pub config: RunConfig,

    /// Tracks the current year.
    pub clock: RunClock,

    /// Sites, stands, and external site arrays.
    pub landscape: Landscape,

    /// Management areas with their applied prescriptions and repeat queues.
    pub areas: ManagementAreas,

    /// Last stand harvest event id handed out (ids start at 1).
    pub(crate) event_counter: u32,
}

impl HarvestSim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current year through `config.end` (inclusive).
    ///
    /// Calls observer hooks at every timestep boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let mut last = self.clock.current;
        while !self.clock.is_finished() {
            last = self.clock.current;
            self.step(observer);
        }
        observer.on_run_end(last);
        tracing::info!(
            final_year = last.0,
            harvest_events = self.event_counter,
            "harvest run complete"
        );
        Ok(())
    }

    /// Run exactly `n` timesteps from the current position (ignores `end`
    /// for the loop bound; repeat scheduling still honours it).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_timesteps<O: SimObserver>(&mut self, n: u32, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    /// Replace the externally owned site arrays.  Call between timesteps.
    pub fn set_external(&mut self, external: ExternalSiteVars) {
        self.landscape.external = external;
    }

    /// Number of stand harvest events so far.
    pub fn harvest_events(&self) -> u32 {
        self.event_counter
    }

    // ── Core timestep processing ──────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current;
        observer.on_timestep_start(now);
        let events = self.process_timestep(now, observer);
        observer.on_timestep_end(now, events);
        tracing::info!(year = now.0, harvest_events = events, "timestep complete");
        self.clock.advance();
    }

    fn process_timestep<O: SimObserver>(&mut self, now: Year, observer: &mut O) -> usize {
        let mut ctx = HarvestContext::new(
            now,
            self.clock.end,
            &mut self.landscape,
            &mut *observer,
            &mut self.event_counter,
        );
        self.areas.iter_mut().map(|area| area.harvest_stands(&mut ctx)).sum()
    }
}
