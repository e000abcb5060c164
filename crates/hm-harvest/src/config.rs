//! JSON prescription configuration.
//!
//! ```json
//! {
//!   "prescriptions": [
//!     {
//!       "name": "patch-cut",
//!       "ranking": { "method": "max_cohort_age" },
//!       "requirements": [ { "kind": "minimum_age", "years": 40 } ],
//!       "selection": { "strategy": "complete_stand_spreading", "min_area_ha": 4, "max_area_ha": 12 },
//!       "cutting": { "kind": "clear_cut" },
//!       "repeat": { "mode": "multiple", "interval": 10, "times": 2 }
//!     }
//!   ],
//!   "applied": [
//!     { "management_area": 1, "prescription": "patch-cut", "percent_area": 5 }
//!   ]
//! }
//! ```
//!
//! Percentages are written as percents (`0..=100`).  Species are referenced
//! by name and resolved against the run's [`SpeciesList`].

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use hm_core::{Percentage, PrescriptionId, RunConfig, SimRng, SpeciesId, Year};
use hm_landscape::SpeciesList;
use hm_ranking::{
    EconomicRank, EconomicRankParameters, EconomicRankTable, FireRiskRank, FireRiskTable,
    MaxCohortAge, MinimumBiomassRank, RandomRank, RankingMethod, Requirement, StandRanker,
    TimeSinceDisturbanceRank,
};

use crate::{
    AppliedPrescription, ClearCut, CohortCutter, CohortRule, CompleteStand, CompleteStandSpreading,
    HarvestConfig, HarvestError, HarvestResult, ManagementAreas, PartialStand, Prescription,
    PrescriptionBuilder, SiteSelector, SpeciesAgeCut,
};

// ── Serde specs ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct HarvestConfigFile {
    pub prescriptions: Vec<PrescriptionSpec>,
    #[serde(default)]
    pub applied: Vec<AppliedSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PrescriptionSpec {
    pub name: String,
    pub ranking: RankingSpec,
    #[serde(default)]
    pub requirements: Vec<RequirementSpec>,
    pub selection: SelectorSpec,
    pub cutting: CutterSpec,
    #[serde(default)]
    pub species_to_plant: Vec<String>,
    #[serde(default)]
    pub repeat: Option<RepeatSpec>,
    #[serde(default)]
    pub min_time_since_damage: u32,
    #[serde(default)]
    pub prevent_establishment: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RankingSpec {
    MaxCohortAge,
    Economic { species: Vec<EconomicSpec> },
    FireRisk { fuel_types: Vec<FireRiskSpec> },
    TimeSinceDisturbance,
    MinimumBiomass,
    Random,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EconomicSpec {
    pub species:     String,
    pub rank:        u8,
    pub minimum_age: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FireRiskSpec {
    pub fuel_type: usize,
    pub rank:      u8,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementSpec {
    MinimumAge { years: u16 },
    MinimumBiomass { g_per_m2: f64 },
    TimeSinceLastFire { years: u32 },
    TimeSinceLastWind { years: u32 },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SelectorSpec {
    CompleteStand,
    PartialStand { percent: f64 },
    CompleteStandSpreading { min_area_ha: f64, max_area_ha: f64 },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CutterSpec {
    ClearCut,
    SpeciesAge { rules: Vec<CohortRuleSpec> },
}

#[derive(Clone, Debug, Deserialize)]
pub struct CohortRuleSpec {
    pub species: String,
    #[serde(default)]
    pub min_age: u16,
    #[serde(default = "max_age_default")]
    pub max_age: u16,
    pub percent: f64,
}

fn max_age_default() -> u16 {
    u16::MAX
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RepeatSpec {
    Multiple {
        interval: u32,
        #[serde(default)]
        times: Option<u32>,
    },
    Single {
        interval: u32,
        #[serde(default)]
        additional: Option<AdditionalSpec>,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct AdditionalSpec {
    pub selection: SelectorSpec,
    pub cutting: CutterSpec,
    #[serde(default)]
    pub species_to_plant: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppliedSpec {
    pub management_area: u32,
    pub prescription:    String,
    pub percent_area:    f64,
    #[serde(default)]
    pub percent_stands:  Option<f64>,
    #[serde(default)]
    pub begin:           Option<u32>,
    #[serde(default)]
    pub end:             Option<u32>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

pub fn load_harvest_config(path: impl AsRef<Path>) -> HarvestResult<HarvestConfigFile> {
    let text = fs::read_to_string(path)?;
    HarvestConfigFile::from_json(&text)
}

impl HarvestConfigFile {
    pub fn from_json(text: &str) -> HarvestResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check that prescription names are unique.
    pub fn validate_names(&self) -> HarvestResult<()> {
        let mut seen = BTreeSet::new();
        for p in &self.prescriptions {
            if !seen.insert(p.name.as_str()) {
                return Err(HarvestError::DuplicatePrescription(p.name.clone()));
            }
        }
        Ok(())
    }

    /// Build every prescription once, ids in file order, without applying them.
    pub fn into_prescriptions(&self, species: &SpeciesList, seed: u64) -> HarvestResult<Vec<Prescription>> {
        self.validate_names()?;
        self.prescriptions
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.build(PrescriptionId(i as u16), species, seed))
            .collect()
    }

    /// Build one prescription per `applied` entry and attach it to its area.
    ///
    /// Each application gets its own `PrescriptionId` (its index in
    /// `applied`), so one prescription applied to two areas keeps two
    /// independent rankers and repeat queues.
    pub fn apply_to(
        &self,
        areas:   &mut ManagementAreas,
        species: &SpeciesList,
        run:     &RunConfig,
    ) -> HarvestResult<()> {
        self.validate_names()?;
        for (i, applied) in self.applied.iter().enumerate() {
            let spec = self
                .prescriptions
                .iter()
                .find(|p| p.name == applied.prescription)
                .ok_or_else(|| HarvestError::UnknownPrescription(applied.prescription.clone()))?;
            let prescription = spec.build(PrescriptionId(i as u16), species, run.seed)?;

            let percent_stands = applied.percent_stands.map(Percentage::from_percent).transpose()?;
            let ap = AppliedPrescription::new(
                prescription,
                Percentage::from_percent(applied.percent_area)?,
                percent_stands,
                applied.begin.map_or(run.start, Year),
                applied.end.map_or(run.end, Year),
            )?;
            areas
                .find_mut(applied.management_area)
                .ok_or(HarvestError::UnknownManagementArea(applied.management_area))?
                .apply(ap);
        }
        tracing::info!(applied = self.applied.len(), "harvest prescriptions applied");
        Ok(())
    }
}

// ── Spec → runtime conversion ─────────────────────────────────────────────────

fn species_ids(names: &[String], species: &SpeciesList) -> HarvestResult<Vec<SpeciesId>> {
    names
        .iter()
        .map(|n| -> HarvestResult<SpeciesId> { Ok(species.id_of(n)?) })
        .collect()
}

impl PrescriptionSpec {
    pub fn build(&self, id: PrescriptionId, species: &SpeciesList, seed: u64) -> HarvestResult<Prescription> {
        let ranker = StandRanker::new(
            self.ranking.build(species, seed, id)?,
            self.requirements.iter().map(|r| r.build()).collect(),
        );
        let initial = HarvestConfig::new(self.selection.build()?, self.cutting.build(species)?)
            .with_planting(species_ids(&self.species_to_plant, species)?);

        let mut builder = PrescriptionBuilder::new(id, self.name.clone(), ranker, initial)
            .min_time_since_damage(self.min_time_since_damage)
            .prevent_establishment(self.prevent_establishment);
        builder = match &self.repeat {
            None => builder,
            Some(RepeatSpec::Multiple { interval, times }) => builder.repeat_multiple(*interval, *times),
            Some(RepeatSpec::Single { interval, additional }) => {
                let additional = additional
                    .as_ref()
                    .map(|a| -> HarvestResult<HarvestConfig> {
                        Ok(HarvestConfig::new(a.selection.build()?, a.cutting.build(species)?)
                            .with_planting(species_ids(&a.species_to_plant, species)?))
                    })
                    .transpose()?;
                builder.repeat_single(*interval, additional)
            }
        };
        builder.build()
    }
}

impl RankingSpec {
    fn build(&self, species: &SpeciesList, seed: u64, id: PrescriptionId) -> HarvestResult<Box<dyn RankingMethod>> {
        Ok(match self {
            RankingSpec::MaxCohortAge => Box::new(MaxCohortAge),
            RankingSpec::Economic { species: entries } => {
                let mut table = EconomicRankTable::new();
                for e in entries {
                    table.set(
                        species.id_of(&e.species)?,
                        EconomicRankParameters { rank: e.rank, minimum_age: e.minimum_age },
                    )?;
                }
                Box::new(EconomicRank::new(table))
            }
            RankingSpec::FireRisk { fuel_types } => {
                let mut table = FireRiskTable::new();
                for f in fuel_types {
                    table.set(f.fuel_type, f.rank)?;
                }
                Box::new(FireRiskRank::new(table))
            }
            RankingSpec::TimeSinceDisturbance => Box::new(TimeSinceDisturbanceRank),
            RankingSpec::MinimumBiomass => Box::new(MinimumBiomassRank),
            RankingSpec::Random => Box::new(RandomRank::new(SimRng::for_offset(seed, id.0 as u64))),
        })
    }
}

impl RequirementSpec {
    fn build(self) -> Requirement {
        match self {
            RequirementSpec::MinimumAge { years } => Requirement::MinimumAge(years),
            RequirementSpec::MinimumBiomass { g_per_m2 } => Requirement::MinimumBiomass(g_per_m2),
            RequirementSpec::TimeSinceLastFire { years } => Requirement::TimeSinceLastFire(years),
            RequirementSpec::TimeSinceLastWind { years } => Requirement::TimeSinceLastWind(years),
        }
    }
}

impl SelectorSpec {
    fn build(self) -> HarvestResult<Box<dyn SiteSelector>> {
        Ok(match self {
            SelectorSpec::CompleteStand => Box::new(CompleteStand),
            SelectorSpec::PartialStand { percent } => {
                Box::new(PartialStand::new(Percentage::from_percent(percent)?))
            }
            SelectorSpec::CompleteStandSpreading { min_area_ha, max_area_ha } => {
                Box::new(CompleteStandSpreading::new(min_area_ha, max_area_ha)?)
            }
        })
    }
}

impl CutterSpec {
    fn build(&self, species: &SpeciesList) -> HarvestResult<Box<dyn CohortCutter>> {
        Ok(match self {
            CutterSpec::ClearCut => Box::new(ClearCut),
            CutterSpec::SpeciesAge { rules } => {
                let rules = rules
                    .iter()
                    .map(|r| -> HarvestResult<CohortRule> {
                        Ok(CohortRule {
                            species:  species.id_of(&r.species)?,
                            min_age:  r.min_age,
                            max_age:  r.max_age,
                            fraction: Percentage::from_percent(r.percent)?,
                        })
                    })
                    .collect::<HarvestResult<Vec<_>>>()?;
                Box::new(SpeciesAgeCut::new(rules))
            }
        })
    }
}
