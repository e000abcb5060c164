//! Stands: the unit of ranking and harvest.
//!
//! # Scheduling state
//!
//! Besides its sites and neighbors a stand carries the state the repeat
//! scheduler mutates:
//!
//! | Field              | Meaning                                               |
//! |--------------------|-------------------------------------------------------|
//! | `set_aside`        | owning prescription + last year of the reservation    |
//! | `repeat_number`    | repeats completed in the current chain                |
//! | `last_area_harvested` | hectares harvested by the most recent harvest      |
//!
//! A stand is set aside while `now <= until`.  Releasing a stand clears the
//! reservation and resets `repeat_number` so the stand can later begin a new,
//! unrelated chain.

use hm_core::{MgmtAreaId, PrescriptionId, SiteId, StandId, Year};

use crate::CodeMap;

/// A reservation of a stand for future repeat harvests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetAside {
    /// The repeat prescription holding the stand.
    pub by:    PrescriptionId,
    /// Last year (inclusive) of the reservation.
    pub until: Year,
}

/// A grouped set of sites harvested as one unit.
#[derive(Clone, Debug)]
pub struct Stand {
    pub id:        StandId,
    pub map_code:  u32,
    pub mgmt_area: MgmtAreaId,

    sites:     Vec<SiteId>,
    neighbors: Vec<StandId>,

    // ── Harvest bookkeeping ───────────────────────────────────────────────
    /// Id of the most recent harvest event on this stand.
    pub event_id:            Option<u32>,
    /// Rank the stand had when it was last harvested.
    pub harvested_rank:      f64,
    /// Hectares harvested by the most recent harvest.
    pub last_area_harvested: f64,
    /// Name of the prescription that last harvested the stand.
    pub prescription_name:   Option<String>,
    /// Year of the most recent harvest.
    pub time_last_harvested: Option<Year>,

    // ── Repeat scheduling state ───────────────────────────────────────────
    set_aside:         Option<SetAside>,
    pub repeat_number: u32,
}

impl Stand {
    pub(crate) fn new(id: StandId, map_code: u32, mgmt_area: MgmtAreaId) -> Self {
        Self {
            id,
            map_code,
            mgmt_area,
            sites:               Vec::new(),
            neighbors:           Vec::new(),
            event_id:            None,
            harvested_rank:      0.0,
            last_area_harvested: 0.0,
            prescription_name:   None,
            time_last_harvested: None,
            set_aside:           None,
            repeat_number:       0,
        }
    }

    pub(crate) fn push_site(&mut self, site: SiteId) {
        self.sites.push(site);
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<StandId>) {
        self.neighbors = neighbors;
    }

    /// Active sites in insertion order.
    #[inline]
    pub fn sites(&self) -> &[SiteId] {
        &self.sites
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Adjacent stands, ascending by `StandId`.
    #[inline]
    pub fn neighbors(&self) -> &[StandId] {
        &self.neighbors
    }

    // ── Set-aside lifecycle ───────────────────────────────────────────────

    /// `true` while the stand is reserved for a future repeat harvest.
    #[inline]
    pub fn is_set_aside(&self, now: Year) -> bool {
        matches!(self.set_aside, Some(s) if now <= s.until)
    }

    pub fn set_aside(&self) -> Option<SetAside> {
        self.set_aside
    }

    pub fn set_aside_until(&self) -> Option<Year> {
        self.set_aside.map(|s| s.until)
    }

    /// Reserve the stand for `by` through `until` (inclusive).
    pub fn set_aside_for(&mut self, by: PrescriptionId, until: Year) {
        self.set_aside = Some(SetAside { by, until });
    }

    /// End the reservation immediately and reset the repeat counter.
    pub fn release(&mut self) {
        self.set_aside = None;
        self.repeat_number = 0;
    }

    /// Clear the reservation only if `by` holds it.  Returns whether the
    /// stand was released.
    pub fn clear_set_aside(&mut self, by: PrescriptionId) -> bool {
        match self.set_aside {
            Some(s) if s.by == by => {
                self.release();
                true
            }
            _ => false,
        }
    }

    // ── Harvest history ───────────────────────────────────────────────────

    /// `true` if the stand was harvested during timestep `now`.
    #[inline]
    pub fn harvested_in(&self, now: Year) -> bool {
        self.time_last_harvested == Some(now)
    }

    /// Years since the most recent harvest, `None` if never harvested.
    pub fn years_since_harvest(&self, now: Year) -> Option<u32> {
        self.time_last_harvested.map(|t| now.since(t))
    }
}

// ── StandStore ────────────────────────────────────────────────────────────────

/// All stands of a landscape, indexed by `StandId`.
#[derive(Debug, Default)]
pub struct StandStore {
    stands:  Vec<Stand>,
    by_code: CodeMap<u32, StandId>,
}

impl StandStore {
    pub(crate) fn push(&mut self, map_code: u32, mgmt_area: MgmtAreaId) -> StandId {
        let id = StandId(self.stands.len() as u32);
        self.stands.push(Stand::new(id, map_code, mgmt_area));
        self.by_code.insert(map_code, id);
        id
    }

    pub fn len(&self) -> usize {
        self.stands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stands.is_empty()
    }

    #[inline]
    pub fn get(&self, id: StandId) -> &Stand {
        &self.stands[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: StandId) -> &mut Stand {
        &mut self.stands[id.index()]
    }

    /// Look up a stand by its map code.
    pub fn find(&self, map_code: u32) -> Option<StandId> {
        self.by_code.get(&map_code).copied()
    }

    /// Stands in ascending `StandId` order.
    pub fn iter(&self) -> impl Iterator<Item = &Stand> + '_ {
        self.stands.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Stand> + '_ {
        self.stands.iter_mut()
    }
}
