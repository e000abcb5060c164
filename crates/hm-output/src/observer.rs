//! `HarvestOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.
//!
//! Event rows are buffered per timestep and written in one batch at the
//! timestep's end.  Summary rows are keyed by repeat generation:
//!
//! ```text
//! initial harvests   (area, prescription, started = now, 0)  → flushed at timestep end
//! n-th repeat        (area, prescription, started, n)         → flushed on the
//!                                                               finished event with
//!                                                               last_harvest = true
//! ```

use std::collections::BTreeMap;

use hm_core::{MgmtAreaId, PrescriptionId, Year};
use hm_harvest::{HarvestEvents, RepeatFinished, StandHarvestRecord};
use hm_landscape::SpeciesList;
use hm_sim::SimObserver;

use crate::row::{StandEventRow, SummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct GenerationKey {
    mgmt_area:     MgmtAreaId,
    prescription:  PrescriptionId,
    chain_started: Year,
    repeat_number: u32,
}

/// A [`SimObserver`] that writes the event and summary logs to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct HarvestOutputObserver<W: OutputWriter> {
    writer:        W,
    species_count: usize,
    events:        Vec<StandEventRow>,
    summaries:     BTreeMap<GenerationKey, SummaryRow>,
    last_error:    Option<OutputError>,
}

impl<W: OutputWriter> HarvestOutputObserver<W> {
    /// Create an observer backed by `writer`, with one biomass column per
    /// species in `species`.
    pub fn new(writer: W, species: &SpeciesList) -> Self {
        Self {
            writer,
            species_count: species.len(),
            events:        Vec::new(),
            summaries:     BTreeMap::new(),
            last_error:    None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Summary rows not yet written.
    pub fn pending_summaries(&self) -> usize {
        self.summaries.len()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "harvest log write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_events(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let result = self.writer.write_events(&self.events);
        self.events.clear();
        self.store_err(result);
    }

    fn flush_summary(&mut self, key: &GenerationKey) {
        if let Some(row) = self.summaries.remove(key) {
            let result = self.writer.write_summary(&row);
            self.store_err(result);
        }
    }
}

impl<W: OutputWriter> HarvestEvents for HarvestOutputObserver<W> {
    fn on_stand_harvested(&mut self, record: &StandHarvestRecord) {
        let row = StandEventRow::from_record(record, self.species_count);
        let key = GenerationKey {
            mgmt_area:     record.mgmt_area,
            prescription:  record.prescription,
            chain_started: record.chain_started,
            repeat_number: record.repeat_number,
        };
        self.summaries
            .entry(key)
            .or_insert_with(|| SummaryRow::empty_like(&row))
            .add(&row, record.harvested_stands.len() as u32);
        self.events.push(row);
    }

    fn on_repeat_prescription_finished(&mut self, event: &RepeatFinished) {
        if !event.last_harvest {
            return;
        }
        self.flush_summary(&GenerationKey {
            mgmt_area:     event.mgmt_area,
            prescription:  event.prescription,
            chain_started: event.chain_started,
            repeat_number: event.repeat_number,
        });
    }
}

impl<W: OutputWriter> SimObserver for HarvestOutputObserver<W> {
    fn on_timestep_end(&mut self, _year: Year, _harvest_events: usize) {
        self.flush_events();
        let keys: Vec<GenerationKey> = self.summaries.keys().copied().collect();
        for key in &keys {
            self.flush_summary(key);
        }
    }

    fn on_run_end(&mut self, _final_year: Year) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
