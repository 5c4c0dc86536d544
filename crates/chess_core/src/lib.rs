//! Chess rules layer for the evaluation engine.
//!
//! Move generation, legality and FEN parsing are delegated to `cozy-chess`;
//! this crate wraps them behind a copy-on-write [`Position`] and adds the
//! notation the rest of the workspace speaks (standard UCI and SAN).

pub mod board;
pub mod error;
pub mod san;
pub mod types;
pub mod uci;

pub use board::*;
pub use error::RulesError;
pub use san::{parse_san, to_san};
pub use types::*;
pub use uci::{parse_uci, to_uci};

/// Parses a move written either in SAN or in UCI notation.
///
/// SAN is tried first; UCI is the named fallback. When both fail the SAN
/// error is returned, since SAN is what people type.
pub fn parse_move(pos: &Position, text: &str) -> Result<Move, RulesError> {
    match parse_san(pos, text) {
        Ok(mv) => Ok(mv),
        Err(san_err) => parse_uci(pos, text).map_err(|_| san_err),
    }
}
