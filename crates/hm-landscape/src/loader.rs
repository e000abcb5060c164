//! CSV cohort-table loader.
//!
//! # CSV format
//!
//! One row per cohort.  A row with an empty `species` declares a site
//! without cohorts.  Sites are identified by their raster cell.
//!
//! ```csv
//! row,col,stand,mgmt_area,species,age,biomass
//! 0,0,1,1,pinubank,40,5200
//! 0,0,1,1,acersacc,15,800
//! 0,1,1,1,,,
//! 1,0,2,1,pinubank,70,9100
//! ```
//!
//! `biomass` is in g m⁻².  Every row of a site must repeat the same
//! `stand` and `mgmt_area` codes.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{Cohort, Landscape, LandscapeBuilder, LandscapeError, LandscapeResult, SpeciesList};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CohortRecord {
    row:       u32,
    col:       u32,
    stand:     u32,
    mgmt_area: u32,
    species:   Option<String>,
    age:       Option<u16>,
    biomass:   Option<u32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a landscape from a cohort CSV file.
pub fn load_landscape_csv(
    path:         &Path,
    species:      &SpeciesList,
    cell_area_ha: f64,
) -> LandscapeResult<Landscape> {
    let file = std::fs::File::open(path)?;
    load_landscape_reader(file, species, cell_area_ha)
}

/// Like [`load_landscape_csv`] but accepts any `Read` source.
pub fn load_landscape_reader<R: Read>(
    reader:       R,
    species:      &SpeciesList,
    cell_area_ha: f64,
) -> LandscapeResult<Landscape> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = LandscapeBuilder::new(cell_area_ha);

    for (line, result) in csv_reader.deserialize::<CohortRecord>().enumerate() {
        let rec = result.map_err(|e| LandscapeError::Parse(e.to_string()))?;

        let site = match builder.site_at(rec.row, rec.col) {
            Some(site) => site,
            None => builder.add_site(rec.row, rec.col, rec.stand, rec.mgmt_area)?,
        };

        let name = match rec.species.as_deref().map(str::trim) {
            None | Some("") => continue,
            Some(name) => name,
        };
        let (age, biomass) = match (rec.age, rec.biomass) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(LandscapeError::Parse(format!(
                    "row {}: cohort of {name:?} needs both age and biomass",
                    line + 2
                )));
            }
        };
        builder.add_cohort(site, Cohort { species: species.id_of(name)?, age, biomass });
    }

    Ok(builder.build())
}
