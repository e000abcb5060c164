//! Site selection: which sites of a ranked stand (and its neighbors) are cut.
//!
//! Every selector is deterministic: sites come out in stand insertion order
//! and spreading visits neighbors by rank, then ascending `StandId`.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use hm_core::{Percentage, SiteId, StandId, Year};
use hm_landscape::Landscape;

use crate::{HarvestError, HarvestResult};

/// Read-only inputs to a selection.
pub struct SelectionContext<'a> {
    pub landscape: &'a Landscape,

    pub now: Year,

    /// This pass's ranks indexed by `StandId`.  Empty for repeat harvests,
    /// in which case no neighbor is eligible to spread into.
    pub ranks: &'a [f64],
}

impl SelectionContext<'_> {
    #[inline]
    fn rank_of(&self, stand: StandId) -> f64 {
        self.ranks.get(stand.index()).copied().unwrap_or(0.0)
    }
}

/// The sites chosen for one harvest event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub sites: Vec<SiteId>,

    /// Target stand first, then any neighbors swept in by spreading.
    pub stands: Vec<StandId>,

    /// Total selected area in hectares.
    pub area_selected: f64,
}

impl Selection {
    /// An empty selection: the stand is rejected for this pass.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Stands adjacent to the target that were swept into this selection.
    pub fn harvested_neighbors(&self) -> &[StandId] {
        self.stands.get(1..).unwrap_or(&[])
    }
}

/// Chooses the sites to harvest for a ranked stand.
pub trait SiteSelector: Send + Sync {
    fn select_sites(&self, stand: StandId, ctx: &SelectionContext<'_>) -> Selection;
}

// ── CompleteStand ─────────────────────────────────────────────────────────────

/// Every site of the target stand.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompleteStand;

impl SiteSelector for CompleteStand {
    fn select_sites(&self, stand: StandId, ctx: &SelectionContext<'_>) -> Selection {
        let sites = ctx.landscape.stands.get(stand).sites().to_vec();
        if sites.is_empty() {
            return Selection::none();
        }
        Selection {
            area_selected: sites.len() as f64 * ctx.landscape.cell_area_ha,
            sites,
            stands: vec![stand],
        }
    }
}

// ── PartialStand ──────────────────────────────────────────────────────────────

/// The first `ceil(percentage × sites)` sites of the target stand.
#[derive(Clone, Copy, Debug)]
pub struct PartialStand {
    pub percentage: Percentage,
}

impl PartialStand {
    pub fn new(percentage: Percentage) -> Self {
        Self { percentage }
    }
}

impl SiteSelector for PartialStand {
    fn select_sites(&self, stand: StandId, ctx: &SelectionContext<'_>) -> Selection {
        let all = ctx.landscape.stands.get(stand).sites();
        let n = (self.percentage.of(all.len() as f64).ceil() as usize).min(all.len());
        if n == 0 {
            return Selection::none();
        }
        Selection {
            sites:         all[..n].to_vec(),
            stands:        vec![stand],
            area_selected: n as f64 * ctx.landscape.cell_area_ha,
        }
    }
}

// ── CompleteStandSpreading ────────────────────────────────────────────────────

/// Frontier entry: higher rank first, then lower `StandId`.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    rank:  f64,
    stand: StandId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse the id comparison so lower ids pop first.
        self.rank
            .total_cmp(&other.rank)
            .then_with(|| other.stand.cmp(&self.stand))
    }
}
impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Harvest the whole target stand, then spread into adjacent stands until
/// at least `min_area` hectares are selected without exceeding `max_area`.
///
/// A neighbor is eligible when it is in the same management area, ranked
/// above zero this pass, not set aside, and not already harvested this
/// timestep.  If `min_area` cannot be reached the selection is empty and the
/// target is skipped.  Repeat harvests (no ranks) take the target stand alone.
#[derive(Clone, Copy, Debug)]
pub struct CompleteStandSpreading {
    min_area: f64,
    max_area: f64,
}

impl CompleteStandSpreading {
    pub fn new(min_area: f64, max_area: f64) -> HarvestResult<Self> {
        if min_area.is_nan() || max_area.is_nan() || min_area > max_area {
            return Err(HarvestError::SpreadingBounds { min: min_area, max: max_area });
        }
        Ok(Self { min_area, max_area })
    }

    pub fn min_area(&self) -> f64 {
        self.min_area
    }

    pub fn max_area(&self) -> f64 {
        self.max_area
    }

    fn eligible(&self, target: StandId, neighbor: StandId, ctx: &SelectionContext<'_>) -> bool {
        let stands = &ctx.landscape.stands;
        let n = stands.get(neighbor);
        n.mgmt_area == stands.get(target).mgmt_area
            && ctx.rank_of(neighbor) > 0.0
            && !n.is_set_aside(ctx.now)
            && !n.harvested_in(ctx.now)
    }
}

impl SiteSelector for CompleteStandSpreading {
    fn select_sites(&self, stand: StandId, ctx: &SelectionContext<'_>) -> Selection {
        let land = ctx.landscape;
        let mut selection = Selection {
            sites:         land.stands.get(stand).sites().to_vec(),
            stands:        vec![stand],
            area_selected: land.stand_area_ha(stand),
        };
        if selection.is_empty() || ctx.ranks.is_empty() {
            return selection;
        }

        let mut seen: BTreeSet<StandId> = BTreeSet::from([stand]);
        let mut frontier = BinaryHeap::new();
        let mut push_neighbors = |of: StandId, frontier: &mut BinaryHeap<Frontier>| {
            for &n in land.stands.get(of).neighbors() {
                if seen.insert(n) && self.eligible(stand, n, ctx) {
                    frontier.push(Frontier { rank: ctx.rank_of(n), stand: n });
                }
            }
        };
        push_neighbors(stand, &mut frontier);

        while selection.area_selected < self.min_area {
            let Some(next) = frontier.pop() else { break };
            let area = land.stand_area_ha(next.stand);
            if selection.area_selected + area > self.max_area {
                continue;
            }
            selection.area_selected += area;
            selection.sites.extend_from_slice(land.stands.get(next.stand).sites());
            selection.stands.push(next.stand);
            push_neighbors(next.stand, &mut frontier);
        }

        if selection.area_selected < self.min_area {
            tracing::debug!(
                stand = stand.0,
                area = selection.area_selected,
                min = self.min_area,
                "spreading could not reach minimum area; stand skipped"
            );
            return Selection::none();
        }
        selection
    }
}
