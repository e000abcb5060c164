//! Per-site arrays owned by other disturbance extensions.
//!
//! The harvest core only reads these.  Their owners refresh them between
//! timesteps; any of them may be absent when the owning extension is not
//! running, in which case dependent requirements degrade to "not met" and
//! dependent ranks to `0`.

use hm_core::{SiteId, Year};

/// Externally sourced site variables, indexed by `SiteId`.
#[derive(Clone, Debug, Default)]
pub struct ExternalSiteVars {
    /// Year of the most recent fire on each site.
    pub time_of_last_fire: Option<Vec<Year>>,

    /// Year of the most recent wind event on each site.
    pub time_of_last_wind: Option<Vec<Year>>,

    /// Fuel-type index of each site.
    pub fuel_type: Option<Vec<u16>>,
}

impl ExternalSiteVars {
    #[inline]
    pub fn last_fire(&self, site: SiteId) -> Option<Year> {
        self.time_of_last_fire.as_ref()?.get(site.index()).copied()
    }

    #[inline]
    pub fn last_wind(&self, site: SiteId) -> Option<Year> {
        self.time_of_last_wind.as_ref()?.get(site.index()).copied()
    }

    #[inline]
    pub fn fuel_type(&self, site: SiteId) -> Option<u16> {
        self.fuel_type.as_ref()?.get(site.index()).copied()
    }
}
