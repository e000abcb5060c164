//! `Landscape` — sites, stands, and external site variables in one place.

use rstar::RTree;

use hm_core::{MgmtAreaId, SiteId, StandId};

use crate::builder::CellEntry;
use crate::{ExternalSiteVars, SiteStore, StandStore};

/// The spatial state the harvest core reads and mutates.
///
/// Created once at initialization by [`LandscapeBuilder`][crate::LandscapeBuilder];
/// stands are never destroyed during a run.
#[derive(Debug)]
pub struct Landscape {
    /// Area of one site in hectares.
    pub cell_area_ha: f64,

    pub sites: SiteStore,

    pub stands: StandStore,

    /// Arrays owned by other extensions; refreshed by them between timesteps.
    pub external: ExternalSiteVars,

    /// Map code of each management area, indexed by `MgmtAreaId`.
    pub mgmt_area_codes: Vec<u32>,

    pub(crate) cell_index: RTree<CellEntry>,
}

impl Landscape {
    /// The site at raster cell (`row`, `col`), if it is active.
    pub fn site_at(&self, row: u32, col: u32) -> Option<SiteId> {
        self.cell_index
            .locate_at_point(&[row as i64, col as i64])
            .map(|e| e.site)
    }

    /// Stands belonging to `area`, ascending by `StandId`.
    pub fn stands_in(&self, area: MgmtAreaId) -> impl Iterator<Item = StandId> + '_ {
        self.stands
            .iter()
            .filter(move |s| s.mgmt_area == area)
            .map(|s| s.id)
    }

    /// Area of `stand` in hectares.
    #[inline]
    pub fn stand_area_ha(&self, stand: StandId) -> f64 {
        self.stands.get(stand).site_count() as f64 * self.cell_area_ha
    }

    // ── Stand statistics ──────────────────────────────────────────────────

    /// Mean of `per_site` over the stand's sites.
    ///
    /// Returns `None` when the stand has no sites or when `per_site` yields
    /// `None` for any site (the source array is unavailable).
    pub fn mean_over_sites<F>(&self, stand: StandId, mut per_site: F) -> Option<f64>
    where
        F: FnMut(SiteId) -> Option<f64>,
    {
        let sites = self.stands.get(stand).sites();
        if sites.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for &site in sites {
            sum += per_site(site)?;
        }
        Some(sum / sites.len() as f64)
    }

    /// Mean over sites of the oldest cohort age.
    pub fn mean_site_age(&self, stand: StandId) -> Option<f64> {
        self.mean_over_sites(stand, |s| Some(self.sites.max_cohort_age(s) as f64))
    }

    /// Stand age: the rounded mean site age, `0` for a stand with no sites.
    pub fn stand_age(&self, stand: StandId) -> u16 {
        self.mean_site_age(stand).map(|a| a.round() as u16).unwrap_or(0)
    }

    /// Mean over sites of total above-ground biomass (g m⁻²).
    pub fn mean_biomass(&self, stand: StandId) -> Option<f64> {
        self.mean_over_sites(stand, |s| Some(self.sites.total_biomass(s) as f64))
    }
}
