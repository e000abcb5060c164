//! `Prescription` — a ranking rule plus one or two harvest configurations and
//! an optional repeat policy.
//!
//! A plain prescription has `repeat: None`.  A repeat prescription carries a
//! [`RepeatPolicy`]: `Multiple` re-harvests with the initial configuration up
//! to a repeat count, `Single` re-harvests once with its own additional
//! configuration.  The phase of the stand selects the configuration for each
//! call to [`Prescription::harvest`]; nothing is swapped in place.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use hm_core::{PrescriptionId, SpeciesId, StandId, Year};
use hm_ranking::StandRanker;

use crate::{
    CohortCutter, CutOutcome, HarvestContext, HarvestError, HarvestResult, Selection,
    SelectionContext, SiteSelector, StandHarvestRecord,
};

// ── Harvest configuration ─────────────────────────────────────────────────────

/// Selector, cutter, and species to plant: everything that varies between
/// an initial and an additional harvest.
pub struct HarvestConfig {
    pub site_selector:    Box<dyn SiteSelector>,
    pub cohort_cutter:    Box<dyn CohortCutter>,
    pub species_to_plant: Vec<SpeciesId>,
}

impl HarvestConfig {
    pub fn new(site_selector: Box<dyn SiteSelector>, cohort_cutter: Box<dyn CohortCutter>) -> Self {
        Self { site_selector, cohort_cutter, species_to_plant: Vec::new() }
    }

    pub fn with_planting(mut self, species: Vec<SpeciesId>) -> Self {
        self.species_to_plant = species;
        self
    }
}

impl fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("species_to_plant", &self.species_to_plant)
            .finish_non_exhaustive()
    }
}

/// Which configuration a harvest uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarvestPhase {
    Initial,
    Additional,
}

// ── Repeat policy ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatCount {
    /// Repeat every interval until the prescription's end year.
    Forever,
    Times(NonZeroU32),
}

impl RepeatCount {
    /// `true` once `repeats_done` repeats have used up the count.
    #[inline]
    pub fn is_exhausted(self, repeats_done: u32) -> bool {
        match self {
            RepeatCount::Forever => false,
            RepeatCount::Times(n) => repeats_done >= n.get(),
        }
    }
}

#[derive(Debug)]
pub enum RepeatMode {
    Multiple { times: RepeatCount },
    Single { additional: HarvestConfig },
}

#[derive(Debug)]
pub struct RepeatPolicy {
    /// Years between harvests of one chain.
    pub interval: NonZeroU32,
    pub mode:     RepeatMode,
}

impl RepeatPolicy {
    pub fn is_single(&self) -> bool {
        matches!(self.mode, RepeatMode::Single { .. })
    }
}

// ── Prescription ──────────────────────────────────────────────────────────────

pub struct Prescription {
    pub id:   PrescriptionId,
    pub name: String,

    pub ranker: StandRanker,

    pub initial: HarvestConfig,

    pub repeat: Option<RepeatPolicy>,

    /// Stands harvested fewer than this many years ago are not ranked.
    pub min_time_since_damage: u32,

    /// Harvested sites are flagged so the host model suppresses natural
    /// establishment.
    pub prevent_establishment: bool,
}

/// Arguments of one harvest event.
#[derive(Clone, Copy, Debug)]
pub struct HarvestRequest<'r> {
    pub stand:         StandId,
    pub phase:         HarvestPhase,
    pub rank:          f64,
    pub repeat_number: u32,
    pub chain_started: Year,
    /// This pass's ranks by `StandId`; empty for repeat harvests.
    pub ranks:         &'r [f64],
}

impl Prescription {
    pub fn config(&self, phase: HarvestPhase) -> &HarvestConfig {
        match (phase, &self.repeat) {
            (HarvestPhase::Additional, Some(RepeatPolicy { mode: RepeatMode::Single { additional }, .. })) => {
                additional
            }
            _ => &self.initial,
        }
    }

    /// Select, cut, and record one harvest event.
    ///
    /// Returns the harvested stands (target first) or `None` if the selector
    /// rejected the stand.  On success every selected site is marked, every
    /// harvested stand's bookkeeping is updated, and one
    /// [`StandHarvestRecord`] is emitted.
    pub fn harvest(&self, req: HarvestRequest<'_>, ctx: &mut HarvestContext<'_>) -> Option<Selection> {
        let config = self.config(req.phase);
        let now = ctx.now;

        let selection = config.site_selector.select_sites(
            req.stand,
            &SelectionContext { landscape: &*ctx.landscape, now, ranks: req.ranks },
        );
        if selection.is_empty() {
            return None;
        }

        let stand_age = ctx.landscape.stand_age(req.stand);

        let mut total = CutOutcome::default();
        let mut harvested_sites = 0;
        for &site in &selection.sites {
            let outcome = config
                .cohort_cutter
                .cut(site, &mut ctx.landscape.sites.cohorts[site.index()]);
            if outcome.is_damaged() {
                harvested_sites += 1;
            }
            total.merge(&outcome);
            ctx.landscape.sites.mark_harvested(
                site,
                self.id,
                now,
                &config.species_to_plant,
                self.prevent_establishment,
            );
            ctx.events.on_site_harvested(site, self.id);
        }

        let event_id = ctx.next_event_id();
        let land = &mut *ctx.landscape;
        for (i, &s) in selection.stands.iter().enumerate() {
            let area = if i == 0 { selection.area_selected } else { land.stand_area_ha(s) };
            let stand = land.stands.get_mut(s);
            stand.event_id            = Some(event_id);
            stand.time_last_harvested = Some(now);
            stand.last_area_harvested = area;
            stand.prescription_name   = Some(self.name.clone());
            stand.harvested_rank      = req.rank;
        }

        // g m⁻² summed over sites → Mg: × cell ha × 10⁴ m² ha⁻¹ / 10⁶ g Mg⁻¹.
        let to_mg = land.cell_area_ha / 100.0;
        let biomass_removed_mg = total.biomass_removed as f64 * to_mg;
        let damaged_ha = harvested_sites as f64 * land.cell_area_ha;
        let target = land.stands.get(req.stand);
        let record = StandHarvestRecord {
            time:               now,
            mgmt_area:          target.mgmt_area,
            mgmt_area_code:     land.mgmt_area_codes[target.mgmt_area.index()],
            prescription:       self.id,
            prescription_name:  self.name.clone(),
            repeat_number:      req.repeat_number,
            chain_started:      req.chain_started,
            stand:              req.stand,
            stand_code:         target.map_code,
            event_id,
            stand_age,
            rank:               req.rank,
            site_count:         selection.sites.len(),
            harvested_sites,
            cohorts_partial:    total.cohorts_damaged,
            cohorts_complete:   total.cohorts_killed,
            biomass_removed_mg,
            mg_per_damaged_ha:  if damaged_ha > 0.0 { biomass_removed_mg / damaged_ha } else { 0.0 },
            biomass_by_species_mg: total
                .biomass_by_species
                .iter()
                .map(|(&sp, &b)| (sp, b as f64 * to_mg))
                .collect::<BTreeMap<_, _>>(),
            harvested_stands:   selection.stands.clone(),
        };

        tracing::debug!(
            prescription = %record.display_name(),
            stand = record.stand_code,
            event = event_id,
            sites = record.site_count,
            neighbors = selection.harvested_neighbors().len(),
            year = now.0,
            "stand harvested"
        );
        ctx.events.on_stand_harvested(&record);
        Some(selection)
    }
}

impl fmt::Debug for Prescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prescription")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("ranker", &self.ranker)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

// ── PrescriptionBuilder ───────────────────────────────────────────────────────

enum PendingRepeat {
    Multiple { interval: u32, times: Option<u32> },
    Single { interval: u32, additional: Option<HarvestConfig> },
}

/// Validating constructor for [`Prescription`].
///
/// # Example
///
/// ```
/// use hm_core::PrescriptionId;
/// use hm_harvest::{ClearCut, CompleteStand, HarvestConfig, PrescriptionBuilder};
/// use hm_ranking::{MaxCohortAge, StandRanker};
///
/// let rx = PrescriptionBuilder::new(
///     PrescriptionId(0),
///     "clearcut",
///     StandRanker::new(Box::new(MaxCohortAge), vec![]),
///     HarvestConfig::new(Box::new(CompleteStand), Box::new(ClearCut)),
/// )
/// .repeat_multiple(10, Some(2))
/// .build()
/// .unwrap();
/// assert_eq!(rx.repeat.unwrap().interval.get(), 10);
/// ```
pub struct PrescriptionBuilder {
    id:                    PrescriptionId,
    name:                  String,
    ranker:                StandRanker,
    initial:               HarvestConfig,
    repeat:                Option<PendingRepeat>,
    min_time_since_damage: u32,
    prevent_establishment: bool,
}

impl PrescriptionBuilder {
    pub fn new(
        id:      PrescriptionId,
        name:    impl Into<String>,
        ranker:  StandRanker,
        initial: HarvestConfig,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ranker,
            initial,
            repeat: None,
            min_time_since_damage: 0,
            prevent_establishment: false,
        }
    }

    /// Re-harvest every `interval` years with the initial configuration,
    /// `times` repeats in total (`None` = until the end year).
    pub fn repeat_multiple(mut self, interval: u32, times: Option<u32>) -> Self {
        self.repeat = Some(PendingRepeat::Multiple { interval, times });
        self
    }

    /// Re-harvest once, `interval` years later, with `additional`.
    pub fn repeat_single(mut self, interval: u32, additional: Option<HarvestConfig>) -> Self {
        self.repeat = Some(PendingRepeat::Single { interval, additional });
        self
    }

    pub fn min_time_since_damage(mut self, years: u32) -> Self {
        self.min_time_since_damage = years;
        self
    }

    pub fn prevent_establishment(mut self, prevent: bool) -> Self {
        self.prevent_establishment = prevent;
        self
    }

    pub fn build(self) -> HarvestResult<Prescription> {
        let name = self.name;
        let interval_of = |interval: u32| {
            NonZeroU32::new(interval)
                .ok_or_else(|| HarvestError::ZeroInterval { prescription: name.clone() })
        };

        let repeat = match self.repeat {
            None => None,
            Some(PendingRepeat::Multiple { interval, times }) => {
                let times = match times {
                    None => RepeatCount::Forever,
                    Some(n) => RepeatCount::Times(NonZeroU32::new(n).ok_or_else(|| {
                        HarvestError::ZeroRepeatCount { prescription: name.clone() }
                    })?),
                };
                Some(RepeatPolicy {
                    interval: interval_of(interval)?,
                    mode:     RepeatMode::Multiple { times },
                })
            }
            Some(PendingRepeat::Single { interval, additional }) => {
                let additional = additional.ok_or_else(|| {
                    HarvestError::MissingAdditionalConfig { prescription: name.clone() }
                })?;
                Some(RepeatPolicy {
                    interval: interval_of(interval)?,
                    mode:     RepeatMode::Single { additional },
                })
            }
        };

        Ok(Prescription {
            id: self.id,
            name,
            ranker: self.ranker,
            initial: self.initial,
            repeat,
            min_time_since_damage: self.min_time_since_damage,
            prevent_establishment: self.prevent_establishment,
        })
    }
}
