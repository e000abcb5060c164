//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory.
//! Per-species biomass is stored long-form in its own tables, so the schema
//! does not depend on the species list.

use std::path::Path;

use hm_landscape::SpeciesList;
use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, StandEventRow, SummaryRow};

/// Writes harvest logs to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    species:  Vec<String>,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path, species: &SpeciesList) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS event_log (
                 time               INTEGER NOT NULL,
                 mgmt_area          INTEGER NOT NULL,
                 prescription       TEXT    NOT NULL,
                 stand              INTEGER NOT NULL,
                 event_id           INTEGER PRIMARY KEY,
                 stand_age          INTEGER NOT NULL,
                 stand_rank         REAL    NOT NULL,
                 number_of_sites    INTEGER NOT NULL,
                 harvested_sites    INTEGER NOT NULL,
                 mg_biomass_removed REAL    NOT NULL,
                 mg_biomass_removed_per_damaged_ha REAL NOT NULL,
                 cohorts_partially_damaged  INTEGER NOT NULL,
                 cohorts_completely_removed INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS event_species_biomass (
                 event_id   INTEGER NOT NULL,
                 species    TEXT    NOT NULL,
                 biomass_mg REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS summary_log (
                 time               INTEGER NOT NULL,
                 mgmt_area          INTEGER NOT NULL,
                 prescription       TEXT    NOT NULL,
                 harvested_stands   INTEGER NOT NULL,
                 harvested_sites    INTEGER NOT NULL,
                 mg_biomass_removed REAL    NOT NULL,
                 cohorts_partially_damaged  INTEGER NOT NULL,
                 cohorts_completely_removed INTEGER NOT NULL,
                 PRIMARY KEY (time, mgmt_area, prescription)
             );
             CREATE TABLE IF NOT EXISTS summary_species_biomass (
                 time         INTEGER NOT NULL,
                 mgmt_area    INTEGER NOT NULL,
                 prescription TEXT    NOT NULL,
                 species      TEXT    NOT NULL,
                 biomass_mg   REAL    NOT NULL
             );",
        )?;

        Ok(Self {
            conn,
            species: species.iter().map(|(_, n)| n.to_owned()).collect(),
            finished: false,
        })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_events(&mut self, rows: &[StandEventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO event_log \
                 (time, mgmt_area, prescription, stand, event_id, stand_age, stand_rank, \
                  number_of_sites, harvested_sites, mg_biomass_removed, \
                  mg_biomass_removed_per_damaged_ha, cohorts_partially_damaged, \
                  cohorts_completely_removed) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            let mut by_species = tx.prepare_cached(
                "INSERT INTO event_species_biomass (event_id, species, biomass_mg) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time,
                    row.mgmt_area,
                    row.prescription,
                    row.stand,
                    row.event_id,
                    row.stand_age,
                    row.rank,
                    row.site_count,
                    row.harvested_sites,
                    row.biomass_removed_mg,
                    row.mg_per_damaged_ha,
                    row.cohorts_partial,
                    row.cohorts_complete,
                ])?;
                for (name, mg) in self.species.iter().zip(&row.biomass_by_species_mg) {
                    by_species.execute(rusqlite::params![row.event_id, name, mg])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO summary_log \
             (time, mgmt_area, prescription, harvested_stands, harvested_sites, \
              mg_biomass_removed, cohorts_partially_damaged, cohorts_completely_removed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.time,
                row.mgmt_area,
                row.prescription,
                row.harvested_stands,
                row.harvested_sites,
                row.biomass_removed_mg,
                row.cohorts_partial,
                row.cohorts_complete,
            ],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO summary_species_biomass \
                 (time, mgmt_area, prescription, species, biomass_mg) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (name, mg) in self.species.iter().zip(&row.biomass_by_species_mg) {
                stmt.execute(rusqlite::params![row.time, row.mgmt_area, row.prescription, name, mg])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
