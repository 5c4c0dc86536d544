use std::path::PathBuf;

use chess_core::RulesError;

use crate::model::Mode;

pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// Errors surfaced by the evaluation core. Nothing here is retried: every
/// operation is deterministic, so a retry would fail the same way.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("feature array has shape {found:?}, expected {expected:?}")]
    Encoding {
        expected: (usize, usize, usize),
        found: Vec<usize>,
    },

    #[error("move '{mv}' is not legal in position {fen}")]
    InvalidMove { mv: String, fen: String },

    #[error("move {ply} ('{text}') cannot be played: {source}")]
    UnplayableMove {
        ply: usize,
        text: String,
        #[source]
        source: RulesError,
    },

    #[error("no legal moves in position {fen}")]
    NoLegalMoves { fen: String },

    #[error("model I/O error at {}: {reason}", .path.display())]
    ModelIo { path: PathBuf, reason: String },

    #[error("model is in {actual:?} mode, {expected:?} mode required")]
    WrongMode { expected: Mode, actual: Mode },

    #[error("target score {0} is not a finite value in [-1, 1]")]
    InvalidTarget(f32),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("dataset line {line}: {reason}")]
    Dataset { line: usize, reason: String },

    #[error("failed to read dataset {}: {reason}", .path.display())]
    DatasetIo { path: PathBuf, reason: String },

    #[error(transparent)]
    Rules(#[from] RulesError),
}
