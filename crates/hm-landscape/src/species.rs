//! `SpeciesList` — the run's species names in `SpeciesId` order.

use hm_core::SpeciesId;

use crate::{LandscapeError, LandscapeResult};

#[derive(Clone, Debug, Default)]
pub struct SpeciesList {
    names: Vec<String>,
}

impl SpeciesList {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: SpeciesId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Resolve a species name (exact match).
    pub fn id_of(&self, name: &str) -> LandscapeResult<SpeciesId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| SpeciesId(i as u16))
            .ok_or_else(|| LandscapeError::UnknownSpecies(name.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (SpeciesId(i as u16), n.as_str()))
    }
}
