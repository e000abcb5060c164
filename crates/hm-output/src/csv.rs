//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `event_log.csv`
//! - `summary_log.csv`
//!
//! Both end with one `biomass_harvested_mg_<species>` column per species.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use hm_landscape::SpeciesList;

use crate::writer::OutputWriter;
use crate::{OutputResult, StandEventRow, SummaryRow};

const EVENT_COLUMNS: [&str; 13] = [
    "time",
    "mgmt_area",
    "prescription",
    "stand",
    "event_id",
    "stand_age",
    "stand_rank",
    "number_of_sites",
    "harvested_sites",
    "mg_biomass_removed",
    "mg_biomass_removed_per_damaged_ha",
    "cohorts_partially_damaged",
    "cohorts_completely_removed",
];

const SUMMARY_COLUMNS: [&str; 8] = [
    "time",
    "mgmt_area",
    "prescription",
    "harvested_stands",
    "harvested_sites",
    "mg_biomass_removed",
    "cohorts_partially_damaged",
    "cohorts_completely_removed",
];

/// Writes harvest logs to two CSV files.
pub struct CsvWriter {
    events:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path, species: &SpeciesList) -> OutputResult<Self> {
        let species_cols: Vec<String> = species
            .iter()
            .map(|(_, name)| format!("biomass_harvested_mg_{name}"))
            .collect();

        let mut events = Writer::from_path(dir.join("event_log.csv"))?;
        events.write_record(
            EVENT_COLUMNS.iter().copied().chain(species_cols.iter().map(String::as_str)),
        )?;

        let mut summaries = Writer::from_path(dir.join("summary_log.csv"))?;
        summaries.write_record(
            SUMMARY_COLUMNS.iter().copied().chain(species_cols.iter().map(String::as_str)),
        )?;

        Ok(Self { events, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[StandEventRow]) -> OutputResult<()> {
        for row in rows {
            let mut record = vec![
                row.time.to_string(),
                row.mgmt_area.to_string(),
                row.prescription.clone(),
                row.stand.to_string(),
                row.event_id.to_string(),
                row.stand_age.to_string(),
                row.rank.to_string(),
                row.site_count.to_string(),
                row.harvested_sites.to_string(),
                row.biomass_removed_mg.to_string(),
                row.mg_per_damaged_ha.to_string(),
                row.cohorts_partial.to_string(),
                row.cohorts_complete.to_string(),
            ];
            record.extend(row.biomass_by_species_mg.iter().map(f64::to_string));
            self.events.write_record(&record)?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        let mut record = vec![
            row.time.to_string(),
            row.mgmt_area.to_string(),
            row.prescription.clone(),
            row.harvested_stands.to_string(),
            row.harvested_sites.to_string(),
            row.biomass_removed_mg.to_string(),
            row.cohorts_partial.to_string(),
            row.cohorts_complete.to_string(),
        ];
        record.extend(row.biomass_by_species_mg.iter().map(f64::to_string));
        self.summaries.write_record(&record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
