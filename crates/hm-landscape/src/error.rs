//! Landscape error type.

use thiserror::Error;

use hm_core::HmError;

/// Errors produced while building or loading a landscape.
#[derive(Debug, Error)]
pub enum LandscapeError {
    #[error("site at row {row}, col {col} defined twice")]
    DuplicateSite { row: u32, col: u32 },

    #[error("stand {stand_code} belongs to management areas {first} and {second}")]
    StandInMultipleAreas { stand_code: u32, first: u32, second: u32 },

    #[error("management area {0} exceeds the supported number of areas")]
    TooManyManagementAreas(u32),

    #[error("unknown species {0:?}")]
    UnknownSpecies(String),

    #[error("cohort parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] HmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LandscapeResult<T> = Result<T, LandscapeError>;
