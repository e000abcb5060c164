use hm_harvest::HarvestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("run cell area {config} ha does not match landscape cell area {landscape} ha")]
    CellAreaMismatch { config: f64, landscape: f64 },

    #[error("harvest configuration error: {0}")]
    Harvest(#[from] HarvestError),
}

pub type SimResult<T> = Result<T, SimError>;
