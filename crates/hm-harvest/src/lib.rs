//! `hm-harvest` — prescriptions, site selection, and repeat-harvest scheduling.
//!
//! # Crate layout
//!
//! | Module              | Contents                                                  |
//! |---------------------|-----------------------------------------------------------|
//! | [`context`]         | `HarvestContext` (mutable per-timestep state)             |
//! | [`events`]          | `HarvestEvents` sink, `StandHarvestRecord`, `RepeatFinished` |
//! | [`selection`]       | `SiteSelector` trait, `CompleteStand`, `PartialStand`, `CompleteStandSpreading` |
//! | [`cutting`]         | `CohortCutter` trait, `ClearCut`, `SpeciesAgeCut`, `CutOutcome` |
//! | [`prescription`]    | `Prescription`, `PrescriptionBuilder`, `HarvestConfig`, `RepeatPolicy` |
//! | [`queue`]           | `ReservedStand`, `ReservedStandQueue`                     |
//! | [`scheduler`]       | `RepeatScheduler` (set-aside policy, drain, chain events) |
//! | [`applied`]         | `AppliedPrescription` (budget, per-timestep ranking cursor) |
//! | [`management_area`] | `ManagementArea`, `ManagementAreas`                       |
//! | [`config`]          | JSON prescription config (`HarvestConfigFile`)            |
//! | [`error`]           | `HarvestError`, `HarvestResult<T>`                        |
//!
//! # Timestep order (per management area)
//!
//! ```text
//! for each applied prescription:  harvest_reserved_stands()   // due repeats first
//! for each active prescription:   begin_timestep()            // one ranking pass
//!                                 while budget remains:
//!                                     harvest_highest_ranked_stand()
//!                                     → set aside + enqueue (repeat prescriptions)
//! ```

pub mod applied;
pub mod config;
pub mod context;
pub mod cutting;
pub mod error;
pub mod events;
pub mod management_area;
pub mod prescription;
pub mod queue;
pub mod scheduler;
pub mod selection;


pub use applied::AppliedPrescription;
pub use config::{HarvestConfigFile, load_harvest_config};
pub use context::HarvestContext;
pub use cutting::{ClearCut, CohortCutter, CohortRule, CutOutcome, SpeciesAgeCut};
pub use error::{HarvestError, HarvestResult};
pub use events::{HarvestEvents, NoopEvents, RepeatFinished, StandHarvestRecord};
pub use management_area::{ManagementArea, ManagementAreas};
pub use prescription::{
    HarvestConfig, HarvestPhase, HarvestRequest, Prescription, PrescriptionBuilder, RepeatCount,
    RepeatMode, RepeatPolicy,
};
pub use queue::{ReservedStand, ReservedStandQueue};
pub use scheduler::{RepeatScheduler, SetAsidePolicy};
pub use selection::{
    CompleteStand, CompleteStandSpreading, PartialStand, Selection, SelectionContext, SiteSelector,
};
