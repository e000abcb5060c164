//! `AppliedPrescription` — a prescription applied to one management area with
//! a harvest budget and an active period.

use hm_core::{Percentage, StandId, Year};
use hm_ranking::{RankingContext, StandRanking};

use crate::prescription::{HarvestPhase, HarvestRequest};
use crate::{HarvestContext, HarvestError, HarvestResult, Prescription, RepeatScheduler};

/// Remaining harvest allowance for the current timestep.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Budget {
    Area { remaining_ha: f64 },
    Stands { remaining: usize },
}

impl Budget {
    fn has_remaining(self) -> bool {
        match self {
            Budget::Area { remaining_ha } => remaining_ha > 0.0,
            Budget::Stands { remaining } => remaining > 0,
        }
    }
}

pub struct AppliedPrescription {
    prescription:   Prescription,
    percent_area:   Percentage,
    percent_stands: Option<Percentage>,
    begin:          Year,
    end:            Year,
    scheduler:      Option<RepeatScheduler>,

    // ── Per-timestep state (reset by begin_timestep) ──────────────────────
    rankings:       Vec<StandRanking>,
    ranks_by_stand: Vec<f64>,
    cursor:         usize,
    budget:         Budget,
}

impl AppliedPrescription {
    /// Apply `prescription` from `begin` through `end` (inclusive).
    ///
    /// `percent_stands`, when given, replaces the area budget with a
    /// stand-count budget.
    pub fn new(
        prescription:   Prescription,
        percent_area:   Percentage,
        percent_stands: Option<Percentage>,
        begin:          Year,
        end:            Year,
    ) -> HarvestResult<Self> {
        if begin > end {
            return Err(HarvestError::InvalidPeriod {
                prescription: prescription.name.clone(),
                begin:        begin.0,
                end:          end.0,
            });
        }
        let scheduler = prescription.repeat.as_ref().map(RepeatScheduler::new);
        Ok(Self {
            prescription,
            percent_area,
            percent_stands,
            begin,
            end,
            scheduler,
            rankings:       Vec::new(),
            ranks_by_stand: Vec::new(),
            cursor:         0,
            budget:         Budget::Stands { remaining: 0 },
        })
    }

    pub fn prescription(&self) -> &Prescription {
        &self.prescription
    }

    pub fn scheduler(&self) -> Option<&RepeatScheduler> {
        self.scheduler.as_ref()
    }

    pub fn begin(&self) -> Year {
        self.begin
    }

    pub fn end(&self) -> Year {
        self.end
    }

    pub fn is_active(&self, now: Year) -> bool {
        self.begin <= now && now <= self.end
    }

    pub fn has_budget(&self) -> bool {
        self.budget.has_remaining()
    }

    /// Last year a repeat may fall on: the earlier of this prescription's end
    /// and the run's end.
    fn effective_end(&self, ctx: &HarvestContext<'_>) -> Year {
        self.end.min(ctx.end)
    }

    /// Reset the budget and rank this timestep's candidates.
    ///
    /// Candidates are the area's stands that are not set aside, not already
    /// harvested this timestep, and outside the minimum time since damage.
    pub fn begin_timestep(&mut self, area_stands: &[StandId], ctx: &HarvestContext<'_>) {
        let now = ctx.now;
        let land = &*ctx.landscape;

        self.budget = match self.percent_stands {
            Some(pct) => Budget::Stands {
                remaining: pct.of(area_stands.len() as f64).round() as usize,
            },
            None => Budget::Area {
                remaining_ha: self
                    .percent_area
                    .of(area_stands.iter().map(|&s| land.stand_area_ha(s)).sum()),
            },
        };

        let min_gap = self.prescription.min_time_since_damage;
        let candidates = area_stands.iter().copied().filter(|&s| {
            let stand = land.stands.get(s);
            !stand.is_set_aside(now)
                && !stand.harvested_in(now)
                && stand.years_since_harvest(now).is_none_or(|y| y >= min_gap)
        });
        self.rankings = self
            .prescription
            .ranker
            .rank(candidates, &RankingContext::new(now, land));

        self.ranks_by_stand.clear();
        self.ranks_by_stand.resize(land.stands.len(), 0.0);
        for r in &self.rankings {
            self.ranks_by_stand[r.stand.index()] = r.rank;
        }
        self.cursor = 0;
    }

    /// Harvest the best remaining ranked stand.
    ///
    /// Returns the harvested stands (target first, then spread neighbors),
    /// or `None` once the budget is spent or no stand ranked above zero is
    /// left.  Stands taken earlier this timestep (for instance swept in by
    /// spreading) are skipped.
    pub fn harvest_highest_ranked_stand(&mut self, ctx: &mut HarvestContext<'_>) -> Option<Vec<StandId>> {
        let end = self.effective_end(ctx);
        while self.budget.has_remaining() {
            let StandRanking { stand, rank } = *self.rankings.get(self.cursor)?;
            if rank <= 0.0 {
                self.cursor = self.rankings.len();
                return None;
            }
            self.cursor += 1;

            let s = ctx.landscape.stands.get(stand);
            if s.is_set_aside(ctx.now) || s.harvested_in(ctx.now) {
                continue;
            }

            let request = HarvestRequest {
                stand,
                phase:         HarvestPhase::Initial,
                rank,
                repeat_number: 0,
                chain_started: ctx.now,
                ranks:         &self.ranks_by_stand,
            };
            let Some(selection) = self.prescription.harvest(request, ctx) else { continue };

            self.budget = match self.budget {
                Budget::Area { remaining_ha } => Budget::Area {
                    remaining_ha: remaining_ha - selection.area_selected,
                },
                Budget::Stands { remaining } => Budget::Stands {
                    remaining: remaining.saturating_sub(selection.stands.len()),
                },
            };

            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.reserve(&selection.stands, &self.prescription, end, ctx);
            }
            return Some(selection.stands);
        }
        None
    }

    /// Drain this prescription's due repeat harvests.  Plain prescriptions
    /// have nothing to drain.
    pub fn harvest_reserved_stands(&mut self, ctx: &mut HarvestContext<'_>) -> usize {
        let end = self.effective_end(ctx);
        match self.scheduler.as_mut() {
            Some(scheduler) => scheduler.harvest_reserved_stands(&self.prescription, end, ctx),
            None => 0,
        }
    }
}
