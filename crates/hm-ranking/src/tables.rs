//! Per-species and per-fuel-type lookup tables for the parameterised ranks.

use hm_core::SpeciesId;

use crate::{RankingError, RankingResult};

/// Number of fuel types the fire-risk table covers (indices `0..150`).
pub const MAX_FUEL_TYPES: usize = 150;

/// Economic value of one species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EconomicRankParameters {
    /// Relative value, `0..=100`.
    pub rank: u8,

    /// Age at which a cohort becomes merchantable.  Must be positive when
    /// `rank > 0`.
    pub minimum_age: u16,
}

/// Economic parameters indexed by `SpeciesId`.  Species without an entry
/// contribute nothing.
#[derive(Clone, Debug, Default)]
pub struct EconomicRankTable {
    entries: Vec<Option<EconomicRankParameters>>,
}

impl EconomicRankTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, species: SpeciesId, params: EconomicRankParameters) -> RankingResult<()> {
        if params.rank > 0 && params.minimum_age == 0 {
            return Err(RankingError::ZeroMinimumAge {
                species: species.index(),
                rank:    params.rank,
            });
        }
        let i = species.index();
        if i >= self.entries.len() {
            self.entries.resize(i + 1, None);
        }
        self.entries[i] = Some(params);
        Ok(())
    }

    #[inline]
    pub fn get(&self, species: SpeciesId) -> Option<EconomicRankParameters> {
        self.entries.get(species.index()).copied().flatten()
    }

    /// Value of a cohort of `species` at `age`: `rank / minimum_age × age`
    /// once the cohort is merchantable, `0` before.
    pub fn cohort_value(&self, species: SpeciesId, age: u16) -> f64 {
        match self.get(species) {
            Some(p) if p.rank > 0 && p.minimum_age > 0 && age >= p.minimum_age => {
                p.rank as f64 / p.minimum_age as f64 * age as f64
            }
            _ => 0.0,
        }
    }
}

/// Fire-risk rank per fuel type.  Unset fuel types rank `0`.
#[derive(Clone, Debug)]
pub struct FireRiskTable {
    ranks: [u8; MAX_FUEL_TYPES],
}

impl Default for FireRiskTable {
    fn default() -> Self {
        Self { ranks: [0; MAX_FUEL_TYPES] }
    }
}

impl FireRiskTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, fuel_type: usize, rank: u8) -> RankingResult<()> {
        let slot = self
            .ranks
            .get_mut(fuel_type)
            .ok_or(RankingError::FuelTypeOutOfRange(fuel_type))?;
        *slot = rank;
        Ok(())
    }

    /// Rank of `fuel_type`; out-of-range fuel types rank `0`.
    #[inline]
    pub fn rank_of(&self, fuel_type: u16) -> u8 {
        self.ranks.get(fuel_type as usize).copied().unwrap_or(0)
    }
}
