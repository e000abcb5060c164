//! Synthetic 12 × 12-cell forest: 36 stands of 2 × 2 cells, split into two
//! management areas down the middle.

use hm_core::{SpeciesId, Year};
use hm_landscape::{Cohort, ExternalSiteVars, Landscape, LandscapeBuilder, LandscapeResult, SpeciesList};

pub const GRID:          u32 = 12;
pub const STAND_CELLS:   u32 = 2;
pub const CELL_AREA_HA:  f64 = 1.0;

pub fn species() -> SpeciesList {
    SpeciesList::new(["pinubank", "acersacc", "betupapy"])
}

/// Stand codes run row-major from 1; area 1 is the west half, area 2 the east.
pub fn build_forest(species: &SpeciesList) -> LandscapeResult<Landscape> {
    let pine  = species.id_of("pinubank")?;
    let maple = species.id_of("acersacc")?;
    let birch = species.id_of("betupapy")?;

    let stands_per_row = GRID / STAND_CELLS;
    let mut b = LandscapeBuilder::new(CELL_AREA_HA);
    for row in 0..GRID {
        for col in 0..GRID {
            let stand_code = (row / STAND_CELLS) * stands_per_row + col / STAND_CELLS + 1;
            let area_code = if col < GRID / 2 { 1 } else { 2 };
            let site = b.add_site(row, col, stand_code, area_code)?;

            // Ages vary by stand so rankings differ; biomass grows with age.
            let age = 20 + ((stand_code * 37) % 90) as u16;
            b.add_cohort(site, cohort(pine, age));
            if (row + col) % 3 == 0 {
                b.add_cohort(site, cohort(maple, age / 2));
            }
            if stand_code % 4 == 0 {
                b.add_cohort(site, cohort(birch, age.saturating_sub(10)));
            }
        }
    }
    Ok(b.build())
}

fn cohort(species: SpeciesId, age: u16) -> Cohort {
    Cohort { species, age, biomass: age as u32 * 120 }
}

/// Fire history handed over by the host model: the north-east quarter burned
/// in `year`, everything else long ago.
pub fn fire_history(landscape: &Landscape, year: Year) -> ExternalSiteVars {
    let fires = (0..landscape.sites.count)
        .map(|i| {
            let (row, col) = (landscape.sites.row[i], landscape.sites.col[i]);
            if row < GRID / 2 && col >= GRID / 2 { year } else { Year(0) }
        })
        .collect();
    ExternalSiteVars { time_of_last_fire: Some(fires), ..ExternalSiteVars::default() }
}
