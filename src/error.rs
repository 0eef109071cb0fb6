//! Error types for the N-puzzle solver crate.
//!
//! Only precondition violations and driver-side I/O failures are errors.
//! An exhausted search is a regular outcome, see `solver::SearchOutcome`.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown heuristic '{name}' (expected one of: hamming, manhattan, zero)")]
    InvalidHeuristic { name: String },

    #[error("board must be a non-empty square grid: row {row} has {got} cells, expected {expected}")]
    InvalidBoardShape {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("board size must be between 1 and {max}, got {size}")]
    InvalidSize { size: usize, max: usize },

    #[error("a {size}x{size} board needs {expected} tiles, got {got}")]
    InvalidTileCount {
        size: usize,
        expected: usize,
        got: usize,
    },

    #[error("board of size {size} must contain every value 0..{max} exactly once (offending value {value})")]
    InvalidTileSet { size: usize, max: usize, value: u16 },

    #[error("initial board is {initial}x{initial} but goal board is {goal}x{goal}")]
    SizeMismatch { initial: usize, goal: usize },

    #[error("cannot parse '{token}' in row {row} as a tile value")]
    Parse { row: usize, token: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
