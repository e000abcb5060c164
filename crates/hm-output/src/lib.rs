//! `hm-output` — harvest log writers for the harvest scheduling framework.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                        |
//! |-----------|---------|--------------------------------------|
//! | *(none)*  | CSV     | `event_log.csv`, `summary_log.csv`   |
//! | `sqlite`  | SQLite  | `output.db`                          |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`HarvestOutputObserver`], which implements `hm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hm_output::{CsvWriter, HarvestOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"), &species)?;
//! let mut obs = HarvestOutputObserver::new(writer, &species);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::HarvestOutputObserver;
pub use row::{StandEventRow, SummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
