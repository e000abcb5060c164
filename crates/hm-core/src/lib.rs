//! `hm-core` — foundational types for the harvest scheduling framework.
//!
//! This crate is a dependency of every other `hm-*` crate.  It has no `hm-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `SiteId`, `StandId`, `MgmtAreaId`, `SpeciesId`, `PrescriptionId` |
//! | [`time`]        | `Year`, `RunClock`, `RunConfig`                            |
//! | [`percentage`]  | `Percentage` (validated fraction in `[0, 1]`)              |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                           |
//! | [`error`]       | `HmError`, `HmResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod percentage;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{HmError, HmResult};
pub use ids::{MgmtAreaId, PrescriptionId, SiteId, SpeciesId, StandId};
pub use percentage::Percentage;
pub use rng::SimRng;
pub use time::{RunClock, RunConfig, Year};
