//! Mutable state threaded through one timestep's harvest work.

use hm_core::Year;
use hm_landscape::Landscape;

use crate::HarvestEvents;

/// Everything a prescription touches while harvesting.
///
/// Built by the timestep driver once per management-area pass.  The event id
/// counter is owned by the driver so ids stay unique across areas and
/// timesteps.
pub struct HarvestContext<'a> {
    /// Current simulation year.
    pub now: Year,

    /// Last year of the run (inclusive).
    pub end: Year,

    pub landscape: &'a mut Landscape,

    pub events: &'a mut dyn HarvestEvents,

    event_counter: &'a mut u32,
}

impl<'a> HarvestContext<'a> {
    pub fn new(
        now:           Year,
        end:           Year,
        landscape:     &'a mut Landscape,
        events:        &'a mut dyn HarvestEvents,
        event_counter: &'a mut u32,
    ) -> Self {
        Self { now, end, landscape, events, event_counter }
    }

    /// Allocate the next stand harvest event id (1-based).
    pub fn next_event_id(&mut self) -> u32 {
        *self.event_counter += 1;
        *self.event_counter
    }
}
