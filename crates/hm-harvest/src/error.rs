use thiserror::Error;

use hm_core::HmError;
use hm_landscape::LandscapeError;
use hm_ranking::RankingError;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("prescription {prescription:?}: repeat interval must be at least 1 year")]
    ZeroInterval { prescription: String },

    #[error("prescription {prescription:?}: repeat count must be at least 1")]
    ZeroRepeatCount { prescription: String },

    #[error("prescription {prescription:?}: single repeat requires an additional harvest configuration")]
    MissingAdditionalConfig { prescription: String },

    #[error("spreading selection: minimum area {min} ha exceeds maximum area {max} ha")]
    SpreadingBounds { min: f64, max: f64 },

    #[error("prescription {prescription:?}: begin year {begin} is after end year {end}")]
    InvalidPeriod { prescription: String, begin: u32, end: u32 },

    #[error("duplicate prescription name {0:?}")]
    DuplicatePrescription(String),

    #[error("unknown prescription {0:?}")]
    UnknownPrescription(String),

    #[error("unknown management area map code {0}")]
    UnknownManagementArea(u32),

    #[error(transparent)]
    Core(#[from] HmError),

    #[error(transparent)]
    Landscape(#[from] LandscapeError),

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HarvestResult<T> = Result<T, HarvestError>;
