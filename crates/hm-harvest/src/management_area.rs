//! Management areas: the stands under one authority and the prescriptions
//! applied to them.

use hm_core::{MgmtAreaId, StandId};
use hm_landscape::Landscape;

use crate::{AppliedPrescription, HarvestContext};

pub struct ManagementArea {
    pub id:       MgmtAreaId,
    pub map_code: u32,
    stands:        Vec<StandId>,
    prescriptions: Vec<AppliedPrescription>,
}

impl ManagementArea {
    pub fn new(id: MgmtAreaId, map_code: u32, stands: Vec<StandId>) -> Self {
        Self { id, map_code, stands, prescriptions: Vec::new() }
    }

    /// Append an applied prescription.  Prescriptions run in the order they
    /// were applied.
    pub fn apply(&mut self, prescription: AppliedPrescription) {
        self.prescriptions.push(prescription);
    }

    pub fn stands(&self) -> &[StandId] {
        &self.stands
    }

    pub fn prescriptions(&self) -> &[AppliedPrescription] {
        &self.prescriptions
    }

    /// Total stand area in hectares.
    pub fn managed_area_ha(&self, landscape: &Landscape) -> f64 {
        self.stands.iter().map(|&s| landscape.stand_area_ha(s)).sum()
    }

    /// Run one timestep: every prescription's due repeats first, then the
    /// base pass of each active prescription until its budget is spent.
    ///
    /// Returns the number of stand harvest events (repeats included).
    pub fn harvest_stands(&mut self, ctx: &mut HarvestContext<'_>) -> usize {
        let mut events = 0;
        for ap in &mut self.prescriptions {
            events += ap.harvest_reserved_stands(ctx);
        }

        let now = ctx.now;
        for ap in &mut self.prescriptions {
            if !ap.is_active(now) {
                continue;
            }
            ap.begin_timestep(&self.stands, ctx);
            while ap.harvest_highest_ranked_stand(ctx).is_some() {
                events += 1;
            }
        }
        events
    }
}

/// All management areas of a run, indexed by `MgmtAreaId`.
#[derive(Default)]
pub struct ManagementAreas {
    areas: Vec<ManagementArea>,
}

impl ManagementAreas {
    /// One area per management-area code in the landscape, each owning the
    /// stands the landscape assigned to it.
    pub fn from_landscape(landscape: &Landscape) -> Self {
        let areas = landscape
            .mgmt_area_codes
            .iter()
            .enumerate()
            .map(|(i, &code)| {
                let id = MgmtAreaId(i as u16);
                ManagementArea::new(id, code, landscape.stands_in(id).collect())
            })
            .collect();
        Self { areas }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, id: MgmtAreaId) -> Option<&ManagementArea> {
        self.areas.get(id.index())
    }

    /// Look up an area by its map code.
    pub fn find(&self, map_code: u32) -> Option<&ManagementArea> {
        self.areas.iter().find(|a| a.map_code == map_code)
    }

    pub fn find_mut(&mut self, map_code: u32) -> Option<&mut ManagementArea> {
        self.areas.iter_mut().find(|a| a.map_code == map_code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManagementArea> + '_ {
        self.areas.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ManagementArea> + '_ {
        self.areas.iter_mut()
    }

    /// Number of applied prescriptions across all areas.
    pub fn prescription_count(&self) -> usize {
        self.areas.iter().map(|a| a.prescriptions.len()).sum()
    }
}
