//! Integration tests for hm-output.

use std::path::Path;

use hm_core::{RunConfig, SpeciesId, Year};
use hm_harvest::HarvestConfigFile;
use hm_landscape::{Cohort, Landscape, LandscapeBuilder, SpeciesList};
use hm_sim::SimBuilder;

use crate::row::{StandEventRow, SummaryRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn species() -> SpeciesList {
    SpeciesList::new(["pinus", "abies"])
}

fn event_row(event_id: u32, prescription: &str) -> StandEventRow {
    StandEventRow {
        time:                  10,
        mgmt_area:             7,
        prescription:          prescription.to_owned(),
        stand:                 3,
        event_id,
        stand_age:             60,
        rank:                  60.0,
        site_count:            4,
        harvested_sites:       2,
        biomass_removed_mg:    12.5,
        mg_per_damaged_ha:     6.25,
        cohorts_partial:       1,
        cohorts_complete:      3,
        biomass_by_species_mg: vec![10.0, 2.5],
    }
}

fn summary_row() -> SummaryRow {
    let mut row = SummaryRow::empty_like(&event_row(1, "rx"));
    row.add(&event_row(1, "rx"), 2);
    row.add(&event_row(2, "rx"), 1);
    row
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    let rows = rdr.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

fn num(record: &csv::StringRecord, i: usize) -> f64 {
    record[i].parse().unwrap()
}

/// Three single-site stands (codes 1, 2, 3; ages 60, 50, 40) in area 7, each
/// holding one 2000 g m⁻² pine cohort.
fn landscape() -> Landscape {
    let mut b = LandscapeBuilder::new(1.0);
    for (col, age) in [60u16, 50, 40].into_iter().enumerate() {
        let site = b.add_site(0, col as u32, col as u32 + 1, 7).unwrap();
        b.add_cohort(site, Cohort { species: SpeciesId(0), age, biomass: 2000 });
    }
    b.build()
}

/// One stand per timestep, thinned by half, re-thinned once ten years later.
const THINNING_JSON: &str = r#"{
    "prescriptions": [ {
        "name": "thin",
        "ranking": { "method": "max_cohort_age" },
        "selection": { "strategy": "complete_stand" },
        "cutting": { "kind": "species_age", "rules": [ { "species": "pinus", "percent": 50 } ] },
        "repeat": { "mode": "multiple", "interval": 10, "times": 1 }
    } ],
    "applied": [ { "management_area": 7, "prescription": "thin", "percent_area": 100, "percent_stands": 34 } ]
}"#;

fn run_with<W: crate::OutputWriter>(writer: W) -> crate::HarvestOutputObserver<W> {
    let config = RunConfig {
        start:          Year(0),
        end:            Year(10),
        timestep_years: 10,
        seed:           3,
        cell_area_ha:   1.0,
    };
    let mut sim = SimBuilder::new(config, landscape())
        .harvest_config(HarvestConfigFile::from_json(THINNING_JSON).unwrap(), species())
        .build()
        .unwrap();
    let mut obs = crate::HarvestOutputObserver::new(writer, &species());
    sim.run(&mut obs).unwrap();
    obs
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;

    #[test]
    fn summary_accumulates_events() {
        let row = summary_row();
        assert_eq!(row.harvested_stands, 3);
        assert_eq!(row.harvested_sites, 4);
        assert_eq!(row.cohorts_partial, 2);
        assert_eq!(row.cohorts_complete, 6);
        assert!((row.biomass_removed_mg - 25.0).abs() < 1e-9);
        assert_eq!(row.biomass_by_species_mg, vec![20.0, 5.0]);
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path(), &species()).unwrap();
        assert!(dir.path().join("event_log.csv").exists());
        assert!(dir.path().join("summary_log.csv").exists());
    }

    #[test]
    fn csv_headers_include_species_columns() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &species()).unwrap();
        w.finish().unwrap();

        let (events, _) = read_csv(&dir.path().join("event_log.csv"));
        assert_eq!(events.len(), 15);
        assert_eq!(events[0], "time");
        assert_eq!(events[13], "biomass_harvested_mg_pinus");
        assert_eq!(events[14], "biomass_harvested_mg_abies");

        let (summary, _) = read_csv(&dir.path().join("summary_log.csv"));
        assert_eq!(
            summary,
            [
                "time",
                "mgmt_area",
                "prescription",
                "harvested_stands",
                "harvested_sites",
                "mg_biomass_removed",
                "cohorts_partially_damaged",
                "cohorts_completely_removed",
                "biomass_harvested_mg_pinus",
                "biomass_harvested_mg_abies",
            ]
        );
    }

    #[test]
    fn csv_event_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &species()).unwrap();
        w.write_events(&[event_row(1, "rx"), event_row(2, "rx(1)")]).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_csv(&dir.path().join("event_log.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "rx");
        assert_eq!(&rows[1][2], "rx(1)");
        assert_eq!(&rows[1][4], "2"); // event_id
        assert_eq!(num(&rows[0], 9), 12.5);
        assert_eq!(num(&rows[0], 14), 2.5);
    }

    #[test]
    fn csv_summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &species()).unwrap();
        w.write_summary(&summary_row()).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_csv(&dir.path().join("summary_log.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "3"); // harvested_stands
        assert_eq!(num(&rows[0], 8), 20.0);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &species()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &species()).unwrap();
        w.write_events(&[]).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("absent"), &species());
        assert!(result.is_err());
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::CsvWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn integration_csv() {
        let dir = tmp();
        let mut obs = run_with(CsvWriter::new(dir.path(), &species()).unwrap());
        assert!(obs.take_error().is_none());
        assert_eq!(obs.pending_summaries(), 0);

        // t0: stand 1 thinned.  t10: stand 1 re-thinned, then stand 2.
        let (_, events) = read_csv(&dir.path().join("event_log.csv"));
        let log: Vec<(&str, &str, &str)> =
            events.iter().map(|r| (&r[0], &r[2], &r[3])).collect();
        assert_eq!(
            log,
            vec![("0", "thin", "1"), ("10", "thin(1)", "1"), ("10", "thin", "2")]
        );
        assert_eq!(num(&events[0], 9), 10.0); // 1000 g m⁻² over 1 ha
        assert_eq!(num(&events[1], 9), 5.0);
        assert_eq!(num(&events[1], 13), 5.0); // pinus column
        assert_eq!(num(&events[1], 14), 0.0); // abies column

        // The repeat generation is written as soon as it finishes, before the
        // same timestep's initial harvests.
        let (_, summary) = read_csv(&dir.path().join("summary_log.csv"));
        let log: Vec<(&str, &str, &str)> =
            summary.iter().map(|r| (&r[0], &r[2], &r[3])).collect();
        assert_eq!(
            log,
            vec![("0", "thin", "1"), ("10", "thin(1)", "1"), ("10", "thin", "1")]
        );
    }

    #[test]
    fn event_ids_are_sequential() {
        let dir = tmp();
        run_with(CsvWriter::new(dir.path(), &species()).unwrap());
        let (_, events) = read_csv(&dir.path().join("event_log.csv"));
        let ids: Vec<&str> = events.iter().map(|r| &r[4]).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn sqlite_rows_written() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path(), &species()).unwrap();
        w.write_events(&[event_row(1, "rx"), event_row(2, "rx(1)")]).unwrap();
        w.write_summary(&summary_row()).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("output.db")).unwrap();
        assert_eq!(count(&conn, "event_log"), 2);
        assert_eq!(count(&conn, "event_species_biomass"), 4);
        assert_eq!(count(&conn, "summary_log"), 1);
        assert_eq!(count(&conn, "summary_species_biomass"), 2);

        let name: String = conn
            .query_row("SELECT prescription FROM event_log WHERE event_id = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "rx(1)");
    }

    #[test]
    fn integration_sqlite() {
        let dir = tmp();
        let mut obs = run_with(SqliteWriter::new(dir.path(), &species()).unwrap());
        assert!(obs.take_error().is_none());

        let conn = Connection::open(dir.path().join("output.db")).unwrap();
        assert_eq!(count(&conn, "event_log"), 3);
        assert_eq!(count(&conn, "summary_log"), 3);
    }
}
