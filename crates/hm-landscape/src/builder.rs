//! Fluent builder for [`Landscape`].
//!
//! # Stand adjacency
//!
//! Sites are bulk-loaded into an R-tree keyed by raster cell `[row, col]`.
//! Two stands are neighbors when any of their sites share an edge, i.e. when
//! a site of one lies within squared distance 1 of a site of the other
//! (4-neighborhood).  The adjacency lists are sorted ascending by `StandId`
//! so spreading selection visits neighbors in a reproducible order.

use std::collections::BTreeSet;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use hm_core::{MgmtAreaId, SiteId, StandId};

use crate::{
    CodeMap, Cohort, ExternalSiteVars, Landscape, LandscapeError, LandscapeResult, SiteStore,
    StandStore,
};

// ── R-tree cell entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a raster cell and the site occupying it.
#[derive(Clone, Debug)]
pub(crate) struct CellEntry {
    pub(crate) point: [i64; 2], // [row, col]
    pub(crate) site:  SiteId,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    /// Squared Euclidean distance in cell units.
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        let dr = self.point[0] - point[0];
        let dc = self.point[1] - point[1];
        dr * dr + dc * dc
    }
}

// ── LandscapeBuilder ──────────────────────────────────────────────────────────

/// Construct a [`Landscape`] site by site, then call [`build`](Self::build).
///
/// Stand and management-area ids are assigned in order of first appearance
/// of their map codes.
///
/// # Example
///
/// ```
/// use hm_landscape::LandscapeBuilder;
///
/// let mut b = LandscapeBuilder::new(1.0);
/// b.add_site(0, 0, /*stand*/ 10, /*area*/ 1).unwrap();
/// b.add_site(0, 1, /*stand*/ 11, /*area*/ 1).unwrap();
/// let land = b.build();
/// assert_eq!(land.stands.len(), 2);
/// assert_eq!(land.stands.get(hm_core::StandId(0)).neighbors(), &[hm_core::StandId(1)]);
/// ```
pub struct LandscapeBuilder {
    cell_area_ha: f64,
    sites:        SiteStore,
    stands:       StandStore,
    area_codes:   Vec<u32>,
    area_by_code: CodeMap<u32, MgmtAreaId>,
    occupied:     CodeMap<(u32, u32), SiteId>,
    external:     ExternalSiteVars,
}

impl LandscapeBuilder {
    pub fn new(cell_area_ha: f64) -> Self {
        Self {
            cell_area_ha,
            sites:        SiteStore::default(),
            stands:       StandStore::default(),
            area_codes:   Vec::new(),
            area_by_code: CodeMap::default(),
            occupied:     CodeMap::default(),
            external:     ExternalSiteVars::default(),
        }
    }

    /// Declare stand `stand_code` in management area `area_code` without any
    /// active sites.  Stands whose map cells are all inactive end up empty;
    /// they are ranked like any other stand and never meet a requirement.
    ///
    /// Returns the existing id if the stand was already declared.
    pub fn add_stand(&mut self, stand_code: u32, area_code: u32) -> LandscapeResult<StandId> {
        let area = match self.area_by_code.get(&area_code) {
            Some(&a) => a,
            None => {
                let a = MgmtAreaId::from_index(self.area_codes.len())
                    .ok_or(LandscapeError::TooManyManagementAreas(area_code))?;
                self.area_codes.push(area_code);
                self.area_by_code.insert(area_code, a);
                a
            }
        };

        match self.stands.find(stand_code) {
            Some(s) => {
                let existing = self.stands.get(s).mgmt_area;
                if existing != area {
                    return Err(LandscapeError::StandInMultipleAreas {
                        stand_code,
                        first:  self.area_codes[existing.index()],
                        second: area_code,
                    });
                }
                Ok(s)
            }
            None => Ok(self.stands.push(stand_code, area)),
        }
    }

    /// Add an active site at (`row`, `col`) belonging to stand `stand_code`
    /// within management area `area_code`.
    pub fn add_site(
        &mut self,
        row:        u32,
        col:        u32,
        stand_code: u32,
        area_code:  u32,
    ) -> LandscapeResult<SiteId> {
        if self.occupied.contains_key(&(row, col)) {
            return Err(LandscapeError::DuplicateSite { row, col });
        }
        let stand = self.add_stand(stand_code, area_code)?;

        let site = self.sites.push(row, col, stand);
        self.stands.get_mut(stand).push_site(site);
        self.occupied.insert((row, col), site);
        Ok(site)
    }

    /// The site previously added at (`row`, `col`).
    pub fn site_at(&self, row: u32, col: u32) -> Option<SiteId> {
        self.occupied.get(&(row, col)).copied()
    }

    /// Append a cohort to `site`.
    pub fn add_cohort(&mut self, site: SiteId, cohort: Cohort) {
        self.sites.cohorts[site.index()].push(cohort);
    }

    /// Attach external site variables (arrays must be indexed by `SiteId`).
    pub fn external(mut self, external: ExternalSiteVars) -> Self {
        self.external = external;
        self
    }

    pub fn site_count(&self) -> usize {
        self.sites.count
    }

    /// Consume the builder, compute stand adjacency, and produce a
    /// [`Landscape`].
    ///
    /// Time complexity: O(S log S) for the R-tree bulk load and neighbor
    /// queries, where S = sites.
    pub fn build(mut self) -> Landscape {
        let entries: Vec<CellEntry> = (0..self.sites.count)
            .map(|i| CellEntry {
                point: [self.sites.row[i] as i64, self.sites.col[i] as i64],
                site:  SiteId(i as u32),
            })
            .collect();
        let cell_index = RTree::bulk_load(entries);

        let mut adjacency: Vec<BTreeSet<StandId>> = vec![BTreeSet::new(); self.stands.len()];
        for i in 0..self.sites.count {
            let own = self.sites.stand[i];
            let point = [self.sites.row[i] as i64, self.sites.col[i] as i64];
            for entry in cell_index.locate_within_distance(point, 1) {
                let other = self.sites.stand[entry.site.index()];
                if other != own {
                    adjacency[own.index()].insert(other);
                }
            }
        }
        for (stand, neighbors) in self.stands.iter_mut().zip(adjacency) {
            stand.set_neighbors(neighbors.into_iter().collect());
        }

        Landscape {
            cell_area_ha:    self.cell_area_ha,
            sites:           self.sites,
            stands:          self.stands,
            external:        self.external,
            mgmt_area_codes: self.area_codes,
            cell_index,
        }
    }
}
