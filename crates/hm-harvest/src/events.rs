//! Harvest event sink.
//!
//! The core emits four kinds of event synchronously, in the order they
//! happen.  Sinks are passed by reference into every pass; an empty sink
//! ([`NoopEvents`]) makes every emission a no-op.

use std::collections::BTreeMap;

use hm_core::{MgmtAreaId, PrescriptionId, SiteId, SpeciesId, StandId, Year};

/// One stand harvest event (initial or repeat), as logged.
#[derive(Clone, Debug, PartialEq)]
pub struct StandHarvestRecord {
    pub time:              Year,
    pub mgmt_area:         MgmtAreaId,
    pub mgmt_area_code:    u32,
    pub prescription:      PrescriptionId,
    /// Base prescription name, without a repeat suffix.
    pub prescription_name: String,
    /// `0` for an initial harvest, `n` for the n-th repeat of a chain.
    pub repeat_number:     u32,
    /// Year the stand's repeat chain started; the harvest year for initial events.
    pub chain_started:     Year,
    pub stand:             StandId,
    pub stand_code:        u32,
    pub event_id:          u32,
    /// Stand age before cutting.
    pub stand_age:         u16,
    pub rank:              f64,
    /// Sites selected, across the target stand and any spread neighbors.
    pub site_count:        usize,
    /// Selected sites where at least one cohort was cut.
    pub harvested_sites:   usize,
    pub cohorts_partial:   u32,
    pub cohorts_complete:  u32,
    pub biomass_removed_mg: f64,
    pub mg_per_damaged_ha: f64,
    pub biomass_by_species_mg: BTreeMap<SpeciesId, f64>,
    /// Target stand first, then spread neighbors.
    pub harvested_stands:  Vec<StandId>,
}

impl StandHarvestRecord {
    /// Prescription name as logged: `"name"` or `"name(n)"` for repeats.
    pub fn display_name(&self) -> String {
        if self.repeat_number > 0 {
            format!("{}({})", self.prescription_name, self.repeat_number)
        } else {
            self.prescription_name.clone()
        }
    }
}

/// A reserved stand finished one repeat harvest.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatFinished {
    pub time:          Year,
    pub prescription:  PrescriptionId,
    pub mgmt_area:     MgmtAreaId,
    pub stand:         StandId,
    pub repeat_number: u32,
    pub chain_started: Year,
    /// `true` for the last stand of this repeat generation drained this timestep.
    pub last_harvest:  bool,
}

/// Receives harvest events.
///
/// All methods have default no-op implementations.
pub trait HarvestEvents {
    fn on_site_harvested(&mut self, _site: SiteId, _prescription: PrescriptionId) {}

    /// Called once per stand harvest event, after cutting.
    fn on_stand_harvested(&mut self, _record: &StandHarvestRecord) {}

    /// A reserved stand came due and was re-harvested; `repeat_number` is
    /// post-increment.  Fires even if the selector cut nothing.
    fn on_repeat_stand_harvested(&mut self, _stand: StandId, _repeat_number: u32) {}

    fn on_repeat_prescription_finished(&mut self, _event: &RepeatFinished) {}
}

/// A sink that ignores everything.
pub struct NoopEvents;

impl HarvestEvents for NoopEvents {}

// ── Fan-out ───────────────────────────────────────────────────────────────────

impl<A: HarvestEvents, B: HarvestEvents> HarvestEvents for (A, B) {
    fn on_site_harvested(&mut self, site: SiteId, prescription: PrescriptionId) {
        self.0.on_site_harvested(site, prescription);
        self.1.on_site_harvested(site, prescription);
    }

    fn on_stand_harvested(&mut self, record: &StandHarvestRecord) {
        self.0.on_stand_harvested(record);
        self.1.on_stand_harvested(record);
    }

    fn on_repeat_stand_harvested(&mut self, stand: StandId, repeat_number: u32) {
        self.0.on_repeat_stand_harvested(stand, repeat_number);
        self.1.on_repeat_stand_harvested(stand, repeat_number);
    }

    fn on_repeat_prescription_finished(&mut self, event: &RepeatFinished) {
        self.0.on_repeat_prescription_finished(event);
        self.1.on_repeat_prescription_finished(event);
    }
}

impl HarvestEvents for Vec<Box<dyn HarvestEvents>> {
    fn on_site_harvested(&mut self, site: SiteId, prescription: PrescriptionId) {
        for sink in self.iter_mut() {
            sink.on_site_harvested(site, prescription);
        }
    }

    fn on_stand_harvested(&mut self, record: &StandHarvestRecord) {
        for sink in self.iter_mut() {
            sink.on_stand_harvested(record);
        }
    }

    fn on_repeat_stand_harvested(&mut self, stand: StandId, repeat_number: u32) {
        for sink in self.iter_mut() {
            sink.on_repeat_stand_harvested(stand, repeat_number);
        }
    }

    fn on_repeat_prescription_finished(&mut self, event: &RepeatFinished) {
        for sink in self.iter_mut() {
            sink.on_repeat_prescription_finished(event);
        }
    }
}
