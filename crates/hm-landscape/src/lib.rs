//! `hm-landscape` — the spatial side of harvest scheduling.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`site`]     | `Cohort`, `SiteStore` (SoA per-site state)                   |
//! | [`external`] | `ExternalSiteVars` (fire/wind/fuel arrays owned by other extensions) |
//! | [`stand`]    | `Stand` (+ set-aside scheduling state), `StandStore`         |
//! | [`species`]  | `SpeciesList` (name ↔ `SpeciesId`)                           |
//! | [`landscape`]| `Landscape` (sites + stands + external vars) and stand statistics |
//! | [`builder`]  | `LandscapeBuilder` (stand ids, adjacency via R-tree)         |
//! | [`loader`]   | `load_landscape_csv`, `load_landscape_reader`                |
//! | [`error`]    | `LandscapeError`, `LandscapeResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for map-code lookups.            |
//! | `serde`   | Propagates serde derives to `hm-core` types.               |

pub mod builder;
pub mod error;
pub mod external;
pub mod landscape;
pub mod loader;
pub mod site;
pub mod species;
pub mod stand;

#[cfg(test)]
mod tests;

pub use builder::LandscapeBuilder;
pub use error::{LandscapeError, LandscapeResult};
pub use external::ExternalSiteVars;
pub use landscape::Landscape;
pub use loader::{load_landscape_csv, load_landscape_reader};
pub use site::{Cohort, SiteStore};
pub use species::SpeciesList;
pub use stand::{SetAside, Stand, StandStore};

#[cfg(feature = "fx-hash")]
pub(crate) type CodeMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type CodeMap<K, V> = std::collections::HashMap<K, V>;
