//! Per-site state in Structure-of-Arrays layout.
//!
//! Every `Vec` field of [`SiteStore`] has exactly `count` elements and is
//! indexed by `SiteId`.  Only active sites are stored; inactive raster cells
//! never enter the harvest core.

use hm_core::{PrescriptionId, SiteId, SpeciesId, StandId, Year};

/// One age cohort of one species on a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cohort {
    pub species: SpeciesId,
    pub age:     u16,
    /// Above-ground biomass in g m⁻².
    pub biomass: u32,
}

/// Structure-of-Arrays storage for all active sites.
#[derive(Debug, Default)]
pub struct SiteStore {
    /// Number of sites.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Raster row of each site.
    pub row: Vec<u32>,

    /// Raster column of each site.
    pub col: Vec<u32>,

    /// Owning stand of each site.
    pub stand: Vec<StandId>,

    /// Living cohorts.  Mutated only by cohort cutters.
    pub cohorts: Vec<Vec<Cohort>>,

    /// The prescription that most recently harvested the site.
    pub harvested_by: Vec<Option<PrescriptionId>>,

    /// Year of the most recent harvest on the site.
    pub time_of_last_harvest: Vec<Option<Year>>,

    /// Species the host succession model should plant after the harvest.
    pub species_to_plant: Vec<Vec<SpeciesId>>,

    /// When set, the host succession model suppresses establishment.
    pub prevent_establishment: Vec<bool>,
}

impl SiteStore {
    pub(crate) fn push(&mut self, row: u32, col: u32, stand: StandId) -> SiteId {
        let id = SiteId(self.count as u32);
        self.row.push(row);
        self.col.push(col);
        self.stand.push(stand);
        self.cohorts.push(Vec::new());
        self.harvested_by.push(None);
        self.time_of_last_harvest.push(None);
        self.species_to_plant.push(Vec::new());
        self.prevent_establishment.push(false);
        self.count += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Age of the oldest cohort on `site`, `0` when the site is bare.
    #[inline]
    pub fn max_cohort_age(&self, site: SiteId) -> u16 {
        self.cohorts[site.index()].iter().map(|c| c.age).max().unwrap_or(0)
    }

    /// Total above-ground biomass on `site` in g m⁻².
    #[inline]
    pub fn total_biomass(&self, site: SiteId) -> u64 {
        self.cohorts[site.index()].iter().map(|c| c.biomass as u64).sum()
    }

    /// Record that `prescription` harvested `site` at `now`.
    pub fn mark_harvested(
        &mut self,
        site:                  SiteId,
        prescription:          PrescriptionId,
        now:                   Year,
        species_to_plant:      &[SpeciesId],
        prevent_establishment: bool,
    ) {
        let i = site.index();
        self.harvested_by[i]          = Some(prescription);
        self.time_of_last_harvest[i]  = Some(now);
        self.species_to_plant[i]      = species_to_plant.to_vec();
        self.prevent_establishment[i] = prevent_establishment;
    }
}
