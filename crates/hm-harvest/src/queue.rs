//! `ReservedStandQueue` — chronological queue of pending repeat harvests.
//!
//! Entries are bucketed by due year in a `BTreeMap`; each bucket is FIFO.
//! Draining pops the earliest bucket first, so the queue behaves as a plain
//! FIFO whenever due years are pushed in non-decreasing order (the normal
//! case: both the current year and the interval only move forward), and still
//! yields chronological order if they are not.
//!
//! Same-year entries keep the order in which the harvest pass produced them,
//! which makes the repeat order of one timestep reproducible.

use std::collections::{BTreeMap, VecDeque};

use hm_core::{StandId, Year};

/// One pending repeat-harvest obligation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedStand {
    pub stand: StandId,

    pub next_time_to_harvest: Year,

    /// Year of the chain's initial harvest; identifies the repeat generation.
    pub chain_started: Year,
}

#[derive(Debug, Default)]
pub struct ReservedStandQueue {
    inner: BTreeMap<Year, VecDeque<ReservedStand>>,
    /// Cached entry count for O(1) `len()`.
    total: usize,
}

impl ReservedStandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ReservedStand) {
        self.inner.entry(entry.next_time_to_harvest).or_default().push_back(entry);
        self.total += 1;
    }

    /// The front entry if it is due at `now`.
    pub fn peek_due(&self, now: Year) -> Option<&ReservedStand> {
        let (&due, bucket) = self.inner.first_key_value()?;
        if due > now {
            return None;
        }
        bucket.front()
    }

    /// Remove and return the front entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Year) -> Option<ReservedStand> {
        let mut bucket = self.inner.first_entry()?;
        if *bucket.key() > now {
            return None;
        }
        let entry = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            bucket.remove();
        }
        if entry.is_some() {
            self.total -= 1;
        }
        entry
    }

    /// The earliest due year, or `None` if empty.
    pub fn next_due_time(&self) -> Option<Year> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn contains(&self, stand: StandId) -> bool {
        self.iter().any(|e| e.stand == stand)
    }

    /// Entries in drain order.
    pub fn iter(&self) -> impl Iterator<Item = &ReservedStand> + '_ {
        self.inner.values().flatten()
    }
}
