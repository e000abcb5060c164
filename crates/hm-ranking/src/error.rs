use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("fuel type {0} is outside the supported range 0..150")]
    FuelTypeOutOfRange(usize),

    #[error("economic rank for species index {species} has rank {rank} but minimum age 0")]
    ZeroMinimumAge { species: usize, rank: u8 },
}

pub type RankingResult<T> = Result<T, RankingError>;
