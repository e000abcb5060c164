//! Fluent builder for constructing a [`HarvestSim`].

use hm_core::RunConfig;
use hm_harvest::{HarvestConfigFile, ManagementAreas};
use hm_landscape::{Landscape, SpeciesList};

use crate::{HarvestSim, SimError, SimResult};

/// Fluent builder for [`HarvestSim`].
///
/// # Required inputs
///
/// - [`RunConfig`]: years, timestep length, seed, cell area
/// - [`Landscape`]: from [`hm_landscape::LandscapeBuilder`] or the CSV loader
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                                   |
/// |----------------------------|-------------------------------------------|
/// | `.areas(a)`                | One area per landscape management code    |
/// | `.harvest_config(f, sp)`   | No prescriptions (nothing is harvested)   |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, landscape)
///     .harvest_config(file, species)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    RunConfig,
    landscape: Landscape,
    areas:     Option<ManagementAreas>,
    harvest:   Option<(HarvestConfigFile, SpeciesList)>,
}

impl SimBuilder {
    pub fn new(config: RunConfig, landscape: Landscape) -> Self {
        Self { config, landscape, areas: None, harvest: None }
    }

    /// Supply management areas with prescriptions already applied.
    pub fn areas(mut self, areas: ManagementAreas) -> Self {
        self.areas = Some(areas);
        self
    }

    /// Apply a JSON prescription config at build time, resolving species
    /// names against `species`.
    pub fn harvest_config(mut self, file: HarvestConfigFile, species: SpeciesList) -> Self {
        self.harvest = Some((file, species));
        self
    }

    /// Validate inputs, apply prescriptions, and return a ready-to-run
    /// [`HarvestSim`].
    pub fn build(self) -> SimResult<HarvestSim> {
        let config = self.config;

        // ── Validate run configuration ────────────────────────────────────
        if config.timestep_years == 0 {
            return Err(SimError::Config("timestep_years must be at least 1".into()));
        }
        if config.start > config.end {
            return Err(SimError::Config(format!(
                "start year {} is after end year {}",
                config.start.0, config.end.0
            )));
        }
        if (config.cell_area_ha - self.landscape.cell_area_ha).abs() > 1e-9 {
            return Err(SimError::CellAreaMismatch {
                config:    config.cell_area_ha,
                landscape: self.landscape.cell_area_ha,
            });
        }

        // ── Management areas and prescriptions ────────────────────────────
        let mut areas = self
            .areas
            .unwrap_or_else(|| ManagementAreas::from_landscape(&self.landscape));
        if let Some((file, species)) = &self.harvest {
            file.apply_to(&mut areas, species, &config)?;
        }

        tracing::info!(
            sites = self.landscape.sites.len(),
            stands = self.landscape.stands.len(),
            areas = areas.len(),
            prescriptions = areas.prescription_count(),
            start = config.start.0,
            end = config.end.0,
            "harvest simulation built"
        );

        Ok(HarvestSim {
            clock:         config.make_clock(),
            config,
            landscape:     self.landscape,
            areas,
            event_counter: 0,
        })
    }
}
