/// Simulation errors.
///
/// Every variant is fatal for the tick (or load) that produced it: the
/// simulation never retries and never applies a partial tick.

use thiserror::Error;

use crate::domain::pattern::Step;

/// Coarse classification reported to the host.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Corrupt movement pattern data.
    InvalidStep,
    /// A tile was driven off the grid.
    Bounds,
    /// Level data does not fit together.
    Configuration,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid step code {code:?} at offset {offset} of movement pattern")]
    InvalidStep { code: char, offset: usize },

    #[error("tile at ({x}, {y}) steps {step:?} off the {width}x{height} grid")]
    OutOfBounds { x: usize, y: usize, step: Step, width: usize, height: usize },

    #[error("grid has {cells} cells but pattern grid has {patterns}")]
    LengthMismatch { cells: usize, patterns: usize },

    #[error("{cells} cells do not form a {width}x{height} grid")]
    DimensionMismatch { width: usize, height: usize, cells: usize },

    #[error("level {level} has no spawn cell")]
    MissingSpawn { level: usize },

    #[error("level {index} requested but the level set holds {count}")]
    MissingLevel { index: usize, count: usize },

    #[error("level set is empty")]
    EmptyLevelSet,
}

impl SimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::InvalidStep { .. } => ErrorKind::InvalidStep,
            SimError::OutOfBounds { .. } => ErrorKind::Bounds,
            SimError::LengthMismatch { .. }
            | SimError::DimensionMismatch { .. }
            | SimError::MissingSpawn { .. }
            | SimError::MissingLevel { .. }
            | SimError::EmptyLevelSet => ErrorKind::Configuration,
        }
    }
}
