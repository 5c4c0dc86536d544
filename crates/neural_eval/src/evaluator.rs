//! Position evaluation and one-ply move ranking.

use std::cmp::Ordering;

use chess_core::{to_uci, Color, Move, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EvalError, Result};
use crate::features::encode;
use crate::model::{AnyModel, Mode, ScoringModel};
use crate::training;

/// Scores with an absolute value below this are reported as equal.
pub const ADVANTAGE_THRESHOLD: f32 = 0.1;

/// A legal move and its score from the mover's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCandidate {
    pub mv: Move,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
    Equal,
}

/// Who is ahead, and by how much (0 to 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Advantage {
    pub side: Side,
    pub magnitude: f32,
}

impl Advantage {
    pub fn from_score(score: f32) -> Self {
        if score.abs() < ADVANTAGE_THRESHOLD {
            Advantage {
                side: Side::Equal,
                magnitude: 0.0,
            }
        } else if score > 0.0 {
            Advantage {
                side: Side::White,
                magnitude: score,
            }
        } else {
            Advantage {
                side: Side::Black,
                magnitude: score.abs(),
            }
        }
    }
}

/// Answers evaluation queries with an owned scoring model.
///
/// Every query switches the model to inference mode first, so a model left
/// in training mode by a previous update never leaks dropout or statistics
/// updates into an evaluation.
pub struct Evaluator<M = AnyModel> {
    model: M,
}

impl<M: ScoringModel> Evaluator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Raw score of a position: positive favours White, whoever is to move.
    pub fn evaluate_position(&mut self, pos: &Position) -> Result<f32> {
        let features = encode(pos);
        self.model.set_mode(Mode::Inference);
        self.model.forward(&features)
    }

    /// Score after playing `mv`, from the perspective of the side that plays it.
    pub fn evaluate_move(&mut self, pos: &Position, mv: Move) -> Result<f32> {
        let next = pos.play(mv).map_err(|_| EvalError::InvalidMove {
            mv: to_uci(pos, mv),
            fen: pos.fen(),
        })?;
        let score = self.evaluate_position(&next)?;
        Ok(match pos.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        })
    }

    /// Every legal move with its score, in generation order.
    pub(crate) fn score_moves(&mut self, pos: &Position) -> Result<Vec<MoveCandidate>> {
        let moves = pos.legal_moves();
        let mut out = Vec::with_capacity(moves.len());
        for mv in moves {
            let score = self.evaluate_move(pos, mv)?;
            out.push(MoveCandidate { mv, score });
        }
        Ok(out)
    }

    /// The `top_n` best moves for the side to move, best first.
    ///
    /// Equal scores keep generation order. A position without legal moves
    /// yields an empty list.
    pub fn find_best_moves(&mut self, pos: &Position, top_n: usize) -> Result<Vec<MoveCandidate>> {
        let ranked = best_of(self.score_moves(pos)?, top_n);
        if let Some(best) = ranked.first() {
            debug!(best = %to_uci(pos, best.mv), score = best.score, "ranked moves");
        }
        Ok(ranked)
    }

    /// The move that is worst for the side to move.
    ///
    /// Ties go to the earliest generated move.
    pub fn find_worst_move(&mut self, pos: &Position) -> Result<MoveCandidate> {
        worst_of(&self.score_moves(pos)?).ok_or_else(|| EvalError::NoLegalMoves { fen: pos.fen() })
    }

    pub fn position_advantage(&mut self, pos: &Position) -> Result<Advantage> {
        Ok(Advantage::from_score(self.evaluate_position(pos)?))
    }

    /// One training step on a single labelled position. See
    /// [`training::train_on_example`].
    pub fn train_on_example(
        &mut self,
        pos: &Position,
        target: f32,
        batch_size: Option<usize>,
    ) -> Result<f32> {
        training::train_on_example(&mut self.model, pos, target, batch_size)
    }
}

/// Sorts scored moves best first and keeps `top_n` of them.
pub(crate) fn best_of(mut scored: Vec<MoveCandidate>, top_n: usize) -> Vec<MoveCandidate> {
    // Stable sort: ties stay in generation order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}

/// Lowest-scored move, earliest generated on ties. `None` when empty.
pub(crate) fn worst_of(scored: &[MoveCandidate]) -> Option<MoveCandidate> {
    scored.iter().copied().reduce(|worst, cand| {
        if cand.score.total_cmp(&worst.score) == Ordering::Less {
            cand
        } else {
            worst
        }
    })
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
