//! Cohort removal on selected sites.

use std::collections::BTreeMap;

use hm_core::{Percentage, SiteId, SpeciesId};
use hm_landscape::Cohort;

/// What a cut removed from one site (or, merged, from one selection).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CutOutcome {
    /// Cohorts that lost part of their biomass.
    pub cohorts_damaged: u32,
    /// Cohorts removed entirely.
    pub cohorts_killed: u32,
    /// g m⁻²
    pub biomass_removed: u64,
    pub biomass_by_species: BTreeMap<SpeciesId, u64>,
}

impl CutOutcome {
    /// `true` if any cohort was cut.
    pub fn is_damaged(&self) -> bool {
        self.cohorts_damaged + self.cohorts_killed > 0
    }

    fn record(&mut self, species: SpeciesId, removed: u64, killed: bool) {
        if killed {
            self.cohorts_killed += 1;
        } else {
            self.cohorts_damaged += 1;
        }
        self.biomass_removed += removed;
        *self.biomass_by_species.entry(species).or_default() += removed;
    }

    pub fn merge(&mut self, other: &CutOutcome) {
        self.cohorts_damaged += other.cohorts_damaged;
        self.cohorts_killed += other.cohorts_killed;
        self.biomass_removed += other.biomass_removed;
        for (&species, &b) in &other.biomass_by_species {
            *self.biomass_by_species.entry(species).or_default() += b;
        }
    }
}

/// Removes cohorts from one site.
pub trait CohortCutter: Send + Sync {
    fn cut(&self, site: SiteId, cohorts: &mut Vec<Cohort>) -> CutOutcome;
}

/// Remove every cohort.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearCut;

impl CohortCutter for ClearCut {
    fn cut(&self, _site: SiteId, cohorts: &mut Vec<Cohort>) -> CutOutcome {
        let mut outcome = CutOutcome::default();
        for c in cohorts.drain(..) {
            outcome.record(c.species, c.biomass as u64, true);
        }
        outcome
    }
}

/// Cut `fraction` of the biomass of `species` cohorts aged `min_age..=max_age`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CohortRule {
    pub species:  SpeciesId,
    pub min_age:  u16,
    pub max_age:  u16,
    pub fraction: Percentage,
}

impl CohortRule {
    fn matches(&self, cohort: &Cohort) -> bool {
        cohort.species == self.species && (self.min_age..=self.max_age).contains(&cohort.age)
    }
}

/// Rule-driven partial removal.  The first matching rule applies; a fraction
/// of 100 % removes the cohort.
#[derive(Clone, Debug, Default)]
pub struct SpeciesAgeCut {
    rules: Vec<CohortRule>,
}

impl SpeciesAgeCut {
    pub fn new(rules: Vec<CohortRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CohortRule] {
        &self.rules
    }
}

impl CohortCutter for SpeciesAgeCut {
    fn cut(&self, _site: SiteId, cohorts: &mut Vec<Cohort>) -> CutOutcome {
        let mut outcome = CutOutcome::default();
        cohorts.retain_mut(|c| {
            let Some(rule) = self.rules.iter().find(|r| r.matches(c)) else {
                return true;
            };
            if rule.fraction == Percentage::FULL {
                outcome.record(c.species, c.biomass as u64, true);
                return false;
            }
            let removed = rule.fraction.of(c.biomass as f64).round() as u32;
            if removed > 0 {
                c.biomass -= removed.min(c.biomass);
                outcome.record(c.species, removed as u64, false);
            }
            true
        });
        outcome
    }
}
