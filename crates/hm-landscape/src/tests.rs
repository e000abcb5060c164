//! Unit tests for hm-landscape.

use std::io::Cursor;

use hm_core::{MgmtAreaId, PrescriptionId, SiteId, SpeciesId, StandId, Year};

use crate::{
    Cohort, ExternalSiteVars, Landscape, LandscapeBuilder, LandscapeError, SpeciesList,
    load_landscape_reader,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cohort(species: u16, age: u16, biomass: u32) -> Cohort {
    Cohort { species: SpeciesId(species), age, biomass }
}

/// Two rows of cells:
///
/// ```text
///   col: 0  1  2
/// row 0: A  A  B
/// row 1: C  C  B
/// ```
///
/// A = stand 10, B = stand 20, C = stand 30; all in management area 1.
fn three_stands() -> Landscape {
    let mut b = LandscapeBuilder::new(2.0);
    let a0 = b.add_site(0, 0, 10, 1).unwrap();
    let a1 = b.add_site(0, 1, 10, 1).unwrap();
    let b0 = b.add_site(0, 2, 20, 1).unwrap();
    let c0 = b.add_site(1, 0, 30, 1).unwrap();
    let c1 = b.add_site(1, 1, 30, 1).unwrap();
    let b1 = b.add_site(1, 2, 20, 1).unwrap();
    b.add_cohort(a0, cohort(0, 40, 1000));
    b.add_cohort(a0, cohort(1, 10, 200));
    b.add_cohort(a1, cohort(0, 60, 3000));
    b.add_cohort(b0, cohort(1, 5, 100));
    b.add_cohort(b1, cohort(1, 15, 300));
    let _ = (c0, c1);
    b.build()
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn stand_ids_follow_first_appearance() {
        let land = three_stands();
        assert_eq!(land.stands.len(), 3);
        assert_eq!(land.stands.get(StandId(0)).map_code, 10);
        assert_eq!(land.stands.get(StandId(1)).map_code, 20);
        assert_eq!(land.stands.get(StandId(2)).map_code, 30);
        assert_eq!(land.stands.find(30), Some(StandId(2)));
        assert_eq!(land.stands.find(99), None);
    }

    #[test]
    fn adjacency_is_four_neighborhood_and_sorted() {
        let land = three_stands();
        assert_eq!(land.stands.get(StandId(0)).neighbors(), &[StandId(1), StandId(2)]);
        assert_eq!(land.stands.get(StandId(1)).neighbors(), &[StandId(0), StandId(2)]);
        assert_eq!(land.stands.get(StandId(2)).neighbors(), &[StandId(0), StandId(1)]);
    }

    #[test]
    fn diagonal_cells_are_not_neighbors() {
        let mut b = LandscapeBuilder::new(1.0);
        b.add_site(0, 0, 1, 1).unwrap();
        b.add_site(1, 1, 2, 1).unwrap();
        let land = b.build();
        assert!(land.stands.get(StandId(0)).neighbors().is_empty());
    }

    #[test]
    fn duplicate_cell_rejected() {
        let mut b = LandscapeBuilder::new(1.0);
        b.add_site(3, 4, 1, 1).unwrap();
        let err = b.add_site(3, 4, 2, 1).unwrap_err();
        assert!(matches!(err, LandscapeError::DuplicateSite { row: 3, col: 4 }));
    }

    #[test]
    fn stand_in_two_areas_rejected() {
        let mut b = LandscapeBuilder::new(1.0);
        b.add_site(0, 0, 1, 1).unwrap();
        let err = b.add_site(0, 1, 1, 2).unwrap_err();
        assert!(matches!(err, LandscapeError::StandInMultipleAreas { stand_code: 1, .. }));
    }

    #[test]
    fn management_areas_indexed_by_first_appearance() {
        let mut b = LandscapeBuilder::new(1.0);
        b.add_site(0, 0, 1, 7).unwrap();
        b.add_site(0, 1, 2, 3).unwrap();
        let land = b.build();
        assert_eq!(land.mgmt_area_codes, vec![7, 3]);
        assert_eq!(land.stands.get(StandId(1)).mgmt_area, MgmtAreaId(1));
        assert_eq!(land.stands_in(MgmtAreaId(0)).collect::<Vec<_>>(), vec![StandId(0)]);
    }

    #[test]
    fn declared_stand_may_stay_empty() {
        let mut b = LandscapeBuilder::new(1.0);
        let empty = b.add_stand(5, 1).unwrap();
        b.add_site(0, 0, 6, 1).unwrap();
        assert_eq!(b.add_stand(5, 1).unwrap(), empty);
        let site = b.add_site(0, 1, 7, 1).unwrap();
        let err = b.add_stand(5, 2).unwrap_err();
        assert!(matches!(err, LandscapeError::StandInMultipleAreas { stand_code: 5, first: 1, second: 2 }));

        let land = b.build();
        assert_eq!(land.stands.len(), 3);
        assert!(land.stands.get(empty).sites().is_empty());
        assert!(land.stands.get(empty).neighbors().is_empty());
        assert_eq!(land.stands_in(MgmtAreaId(0)).count(), 3);
        assert_eq!(land.sites.stand[site.index()], StandId(2));
    }

    #[test]
    fn site_lookup_by_cell() {
        let land = three_stands();
        assert_eq!(land.site_at(1, 2), Some(SiteId(5)));
        assert_eq!(land.site_at(5, 5), None);
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod statistics {
    use super::*;

    #[test]
    fn stand_age_is_mean_of_oldest_cohorts() {
        let land = three_stands();
        // Stand A: site maxima 40 and 60.
        assert_eq!(land.stand_age(StandId(0)), 50);
        // Stand C has no cohorts.
        assert_eq!(land.stand_age(StandId(2)), 0);
    }

    #[test]
    fn mean_biomass_over_sites() {
        let land = three_stands();
        // (1000 + 200 + 3000) / 2
        assert_eq!(land.mean_biomass(StandId(0)), Some(2100.0));
    }

    #[test]
    fn empty_stand_has_no_mean() {
        let mut b = LandscapeBuilder::new(1.0);
        b.add_site(0, 0, 1, 1).unwrap();
        let id = b.add_stand(2, 1).unwrap();
        let land = b.build();
        assert_eq!(land.mean_site_age(id), None);
        assert_eq!(land.stand_age(id), 0);
        assert_eq!(land.mean_biomass(id), None);
    }

    #[test]
    fn mean_over_sites_propagates_missing_data() {
        let land = three_stands();
        let vars = ExternalSiteVars::default();
        assert_eq!(
            land.mean_over_sites(StandId(0), |s| vars.last_fire(s).map(|y| y.0 as f64)),
            None
        );
    }

    #[test]
    fn stand_area_uses_cell_area() {
        let land = three_stands();
        assert_eq!(land.stand_area_ha(StandId(1)), 4.0);
    }
}

// ── Set-aside lifecycle ───────────────────────────────────────────────────────

#[cfg(test)]
mod set_aside {
    use super::*;

    #[test]
    fn set_aside_is_inclusive_of_until() {
        let mut land = three_stands();
        let stand = land.stands.get_mut(StandId(0));
        stand.set_aside_for(PrescriptionId(1), Year(10));
        assert!(stand.is_set_aside(Year(5)));
        assert!(stand.is_set_aside(Year(10)));
        assert!(!stand.is_set_aside(Year(11)));
        assert_eq!(stand.set_aside_until(), Some(Year(10)));
    }

    #[test]
    fn release_resets_repeat_counter() {
        let mut land = three_stands();
        let stand = land.stands.get_mut(StandId(0));
        stand.set_aside_for(PrescriptionId(1), Year(10));
        stand.repeat_number = 3;
        stand.release();
        assert!(!stand.is_set_aside(Year(0)));
        assert_eq!(stand.repeat_number, 0);
    }

    #[test]
    fn clear_only_by_owner() {
        let mut land = three_stands();
        let stand = land.stands.get_mut(StandId(0));
        stand.set_aside_for(PrescriptionId(1), Year(10));
        assert!(!stand.clear_set_aside(PrescriptionId(2)));
        assert!(stand.is_set_aside(Year(1)));
        assert!(stand.clear_set_aside(PrescriptionId(1)));
        assert!(!stand.is_set_aside(Year(1)));
    }

    #[test]
    fn harvest_history() {
        let mut land = three_stands();
        let stand = land.stands.get_mut(StandId(0));
        assert_eq!(stand.years_since_harvest(Year(5)), None);
        stand.time_last_harvested = Some(Year(5));
        assert!(stand.harvested_in(Year(5)));
        assert!(!stand.harvested_in(Year(10)));
        assert_eq!(stand.years_since_harvest(Year(12)), Some(7));
    }

    #[test]
    fn mark_harvested_records_site_state() {
        let mut land = three_stands();
        land.sites.mark_harvested(SiteId(0), PrescriptionId(4), Year(5), &[SpeciesId(1)], true);
        assert_eq!(land.sites.harvested_by[0], Some(PrescriptionId(4)));
        assert_eq!(land.sites.time_of_last_harvest[0], Some(Year(5)));
        assert_eq!(land.sites.species_to_plant[0], vec![SpeciesId(1)]);
        assert!(land.sites.prevent_establishment[0]);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    fn species() -> SpeciesList {
        SpeciesList::new(["pinubank", "acersacc"])
    }

    const CSV: &str = "\
row,col,stand,mgmt_area,species,age,biomass\n\
0,0,1,1,pinubank,40,5200\n\
0,0,1,1,acersacc,15,800\n\
0,1,1,1,,,\n\
1,0,2,1,pinubank,70,9100\n\
";

    #[test]
    fn loads_sites_and_cohorts() {
        let land = load_landscape_reader(Cursor::new(CSV), &species(), 1.0).unwrap();
        assert_eq!(land.sites.len(), 3);
        assert_eq!(land.stands.len(), 2);
        assert_eq!(land.sites.cohorts[0].len(), 2);
        assert!(land.sites.cohorts[1].is_empty());
        assert_eq!(land.sites.cohorts[2][0], cohort(0, 70, 9100));
    }

    #[test]
    fn unknown_species_is_an_error() {
        let csv = "row,col,stand,mgmt_area,species,age,biomass\n0,0,1,1,quercus,10,10\n";
        let err = load_landscape_reader(Cursor::new(csv), &species(), 1.0).unwrap_err();
        assert!(matches!(err, LandscapeError::UnknownSpecies(name) if name == "quercus"));
    }

    #[test]
    fn cohort_without_age_is_an_error() {
        let csv = "row,col,stand,mgmt_area,species,age,biomass\n0,0,1,1,pinubank,,10\n";
        assert!(load_landscape_reader(Cursor::new(csv), &species(), 1.0).is_err());
    }

    #[test]
    fn species_list_round_trip() {
        let list = species();
        assert_eq!(list.id_of("acersacc").unwrap(), SpeciesId(1));
        assert_eq!(list.name(SpeciesId(0)), Some("pinubank"));
        assert_eq!(list.iter().count(), 2);
    }
}
