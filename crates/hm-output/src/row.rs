//! Plain data row types written by output backends.
//!
//! Per-species columns are dense vectors indexed by `SpeciesId`, one entry per
//! species of the run.

use hm_harvest::StandHarvestRecord;

/// One stand harvest event (initial or repeat).
#[derive(Debug, Clone, PartialEq)]
pub struct StandEventRow {
    pub time:                  u32,
    /// Management-area map code.
    pub mgmt_area:             u32,
    /// Prescription name with `"(n)"` appended for the n-th repeat.
    pub prescription:          String,
    /// Stand map code.
    pub stand:                 u32,
    pub event_id:              u32,
    pub stand_age:             u16,
    pub rank:                  f64,
    pub site_count:            u32,
    pub harvested_sites:       u32,
    pub biomass_removed_mg:    f64,
    pub mg_per_damaged_ha:     f64,
    pub cohorts_partial:       u32,
    pub cohorts_complete:      u32,
    pub biomass_by_species_mg: Vec<f64>,
}

impl StandEventRow {
    pub fn from_record(record: &StandHarvestRecord, species_count: usize) -> Self {
        let mut by_species = vec![0.0; species_count];
        for (sp, &mg) in &record.biomass_by_species_mg {
            if let Some(slot) = by_species.get_mut(sp.index()) {
                *slot = mg;
            }
        }
        Self {
            time:                  record.time.0,
            mgmt_area:             record.mgmt_area_code,
            prescription:          record.display_name(),
            stand:                 record.stand_code,
            event_id:              record.event_id,
            stand_age:             record.stand_age,
            rank:                  record.rank,
            site_count:            record.site_count as u32,
            harvested_sites:       record.harvested_sites as u32,
            biomass_removed_mg:    record.biomass_removed_mg,
            mg_per_damaged_ha:     record.mg_per_damaged_ha,
            cohorts_partial:       record.cohorts_partial,
            cohorts_complete:      record.cohorts_complete,
            biomass_by_species_mg: by_species,
        }
    }
}

/// Totals for one (time, management area, prescription, repeat generation).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub time:                  u32,
    pub mgmt_area:             u32,
    pub prescription:          String,
    pub harvested_stands:      u32,
    pub harvested_sites:       u32,
    pub biomass_removed_mg:    f64,
    pub cohorts_partial:       u32,
    pub cohorts_complete:      u32,
    pub biomass_by_species_mg: Vec<f64>,
}

impl SummaryRow {
    /// An empty row keyed like `event`.
    pub fn empty_like(event: &StandEventRow) -> Self {
        Self {
            time:                  event.time,
            mgmt_area:             event.mgmt_area,
            prescription:          event.prescription.clone(),
            harvested_stands:      0,
            harvested_sites:       0,
            biomass_removed_mg:    0.0,
            cohorts_partial:       0,
            cohorts_complete:      0,
            biomass_by_species_mg: vec![0.0; event.biomass_by_species_mg.len()],
        }
    }

    /// Fold one event into the totals.  `stands` counts the target plus any
    /// spread neighbors.
    pub fn add(&mut self, event: &StandEventRow, stands: u32) {
        self.harvested_stands   += stands;
        self.harvested_sites    += event.harvested_sites;
        self.biomass_removed_mg += event.biomass_removed_mg;
        self.cohorts_partial    += event.cohorts_partial;
        self.cohorts_complete   += event.cohorts_complete;
        for (total, mg) in self.biomass_by_species_mg.iter_mut().zip(&event.biomass_by_species_mg) {
            *total += mg;
        }
    }
}
