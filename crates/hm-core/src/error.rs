//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `HmError` as one variant
//! via `#[from]`.

use thiserror::Error;

use crate::{MgmtAreaId, StandId};

/// The top-level error type for `hm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HmError {
    #[error("stand {0} not found")]
    StandNotFound(StandId),

    #[error("management area {0} not found")]
    MgmtAreaNotFound(MgmtAreaId),

    #[error("percentage {0} is outside [0, 1]")]
    InvalidPercentage(f64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `hm-*` crates.
pub type HmResult<T> = Result<T, HmError>;
