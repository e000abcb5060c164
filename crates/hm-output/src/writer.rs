//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, StandEventRow, SummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are returned to the caller; [`HarvestOutputObserver`][crate::HarvestOutputObserver]
/// stores the first one for [`take_error`][crate::HarvestOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of stand harvest events.
    fn write_events(&mut self, rows: &[StandEventRow]) -> OutputResult<()>;

    /// Write one summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
