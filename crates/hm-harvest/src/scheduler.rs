//! `RepeatScheduler` — set-aside lifecycle and repeat-chain draining.
//!
//! # Chain state per stand
//!
//! ```text
//! Unharvested ──initial harvest──▶ SetAside ──due──▶ repeat harvest
//!                                     ▲                    │
//!                                     └── Multiple, count ─┤
//!                                         left, in time    │
//!                                                          ▼
//!                              Released (set-aside cleared, repeat_number = 0)
//! ```
//!
//! `Single` always releases after its one repeat.  `Multiple` releases once
//! the repeat count is used up; if the end year cuts a chain short the stand
//! simply stays set aside until then.

use hm_core::{StandId, Year};

use crate::prescription::{HarvestPhase, HarvestRequest, Prescription, RepeatMode, RepeatPolicy};
use crate::{HarvestContext, RepeatFinished, ReservedStand, ReservedStandQueue};

/// How long a freshly harvested stand stays reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetAsidePolicy {
    /// Until `now + interval` (single repeat).
    UntilNextHarvest,
    /// Until the prescription's end year (multiple repeats).
    UntilEndTime,
}

impl SetAsidePolicy {
    pub fn for_policy(policy: &RepeatPolicy) -> Self {
        match policy.mode {
            RepeatMode::Single { .. } => SetAsidePolicy::UntilNextHarvest,
            RepeatMode::Multiple { .. } => SetAsidePolicy::UntilEndTime,
        }
    }

    #[inline]
    pub fn set_aside_until(self, now: Year, interval: u32, end: Year) -> Year {
        match self {
            SetAsidePolicy::UntilNextHarvest => now + interval,
            SetAsidePolicy::UntilEndTime => end,
        }
    }
}

/// Owns the reserved-stand queue of one applied repeat prescription.
#[derive(Debug)]
pub struct RepeatScheduler {
    set_aside: SetAsidePolicy,
    queue:     ReservedStandQueue,
}

impl RepeatScheduler {
    pub fn new(policy: &RepeatPolicy) -> Self {
        Self {
            set_aside: SetAsidePolicy::for_policy(policy),
            queue:     ReservedStandQueue::new(),
        }
    }

    pub fn set_aside_policy(&self) -> SetAsidePolicy {
        self.set_aside
    }

    pub fn queue(&self) -> &ReservedStandQueue {
        &self.queue
    }

    /// Set aside and enqueue stands just harvested by the base pass.
    ///
    /// Stands that are already set aside are left alone.  Every other stand
    /// starts a fresh chain with its repeat counter at zero.  The first repeat
    /// is only enqueued if it falls on or before `end`.
    pub fn reserve(
        &mut self,
        stands:       &[StandId],
        prescription: &Prescription,
        end:          Year,
        ctx:          &mut HarvestContext<'_>,
    ) {
        let Some(policy) = &prescription.repeat else { return };
        let interval = policy.interval.get();
        let now = ctx.now;

        for &s in stands {
            let stand = ctx.landscape.stands.get_mut(s);
            if stand.is_set_aside(now) {
                continue;
            }
            stand.set_aside_for(prescription.id, self.set_aside.set_aside_until(now, interval, end));
            stand.repeat_number = 0;

            let next = now + interval;
            if next <= end {
                self.queue.push(ReservedStand { stand: s, next_time_to_harvest: next, chain_started: now });
                tracing::debug!(stand = stand.map_code, due = next.0, "stand reserved for repeat harvest");
            }
        }
    }

    /// Drain every entry due at `ctx.now`, in queue order.  Returns the
    /// number of repeat harvests performed.
    ///
    /// A due entry always counts as a repeat: the counter advances and
    /// `on_repeat_stand_harvested` fires even when the selector takes no
    /// sites, so chain length depends only on the schedule.
    pub fn harvest_reserved_stands(
        &mut self,
        prescription: &Prescription,
        end:          Year,
        ctx:          &mut HarvestContext<'_>,
    ) -> usize {
        let Some(policy) = &prescription.repeat else { return 0 };
        let interval = policy.interval.get();
        let now = ctx.now;
        let mut drained = 0;

        while let Some(entry) = self.queue.pop_due(now) {
            let stand = ctx.landscape.stands.get_mut(entry.stand);
            stand.repeat_number += 1;
            let repeat_number = stand.repeat_number;
            let rank = stand.harvested_rank;
            let mgmt_area = stand.mgmt_area;

            let phase = if policy.is_single() { HarvestPhase::Additional } else { HarvestPhase::Initial };
            prescription.harvest(
                HarvestRequest {
                    stand: entry.stand,
                    phase,
                    rank,
                    repeat_number,
                    chain_started: entry.chain_started,
                    ranks: &[],
                },
                ctx,
            );
            ctx.events.on_repeat_stand_harvested(entry.stand, repeat_number);

            let stand = ctx.landscape.stands.get_mut(entry.stand);
            match &policy.mode {
                RepeatMode::Multiple { times } => {
                    let exhausted = times.is_exhausted(repeat_number);
                    let next = now + interval;
                    if !exhausted && next <= end {
                        self.queue.push(ReservedStand { next_time_to_harvest: next, ..entry });
                    } else if exhausted {
                        stand.release();
                    }
                }
                RepeatMode::Single { .. } => {
                    stand.clear_set_aside(prescription.id);
                }
            }

            let last_harvest = self
                .queue
                .peek_due(now)
                .is_none_or(|next| next.chain_started != entry.chain_started);
            ctx.events.on_repeat_prescription_finished(&RepeatFinished {
                time: now,
                prescription: prescription.id,
                mgmt_area,
                stand: entry.stand,
                repeat_number,
                chain_started: entry.chain_started,
                last_harvest,
            });
            drained += 1;
        }

        if drained > 0 {
            tracing::debug!(
                prescription = %prescription.name,
                drained,
                pending = self.queue.len(),
                year = now.0,
                "reserved stands harvested"
            );
        }
        drained
    }
}
