//! Serialisable analysis reports built on top of [`Evaluator`].

use chess_core::{parse_move, to_san, to_uci, Position, RulesError};
use serde::Serialize;
use tracing::debug;

use crate::error::{EvalError, Result};
use crate::evaluator::{best_of, worst_of, Advantage, Evaluator, MoveCandidate, Side};
use crate::model::ScoringModel;

/// A scored move. `evaluation` is from the mover's point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveReport {
    pub san: String,
    pub uci: String,
    pub evaluation: f32,
    pub is_best: bool,
    pub is_worst: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub fen: String,
    /// Raw score, positive favours White
    pub evaluation: f32,
    pub advantage: Side,
    pub advantage_score: f32,
    pub best_moves: Vec<MoveReport>,
    /// `None` when the side to move has no legal moves.
    pub worst_move: Option<MoveReport>,
}

/// One played move of a line, with the analysis of the position it was
/// played from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlyReport {
    /// 1-based
    pub ply: usize,
    pub san: String,
    pub uci: String,
    /// Score after the move, from the mover's point of view
    pub evaluation: f32,
    /// Whether the move was the top-ranked move of `before`
    pub was_best_move: bool,
    pub before: PositionReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineReport {
    pub plies: Vec<PlyReport>,
    pub final_position: PositionReport,
}

fn move_report(pos: &Position, cand: &MoveCandidate) -> MoveReport {
    MoveReport {
        san: to_san(pos, cand.mv),
        uci: to_uci(pos, cand.mv),
        evaluation: cand.score,
        is_best: false,
        is_worst: false,
    }
}

impl<M: ScoringModel> Evaluator<M> {
    /// Evaluation, advantage, the `depth` best moves and the worst move.
    pub fn analyze_position(&mut self, pos: &Position, depth: usize) -> Result<PositionReport> {
        let evaluation = self.evaluate_position(pos)?;
        let advantage = Advantage::from_score(evaluation);
        // One scoring pass serves both the ranking and the worst move.
        let scored = self.score_moves(pos)?;
        let worst = worst_of(&scored);
        let best = best_of(scored, depth);

        let best_moves = best
            .iter()
            .enumerate()
            .map(|(i, cand)| MoveReport {
                is_best: i == 0,
                is_worst: worst.is_some_and(|w| w.mv == cand.mv),
                ..move_report(pos, cand)
            })
            .collect();

        let worst_move = worst.map(|w| MoveReport {
            is_best: best.first().is_some_and(|b| b.mv == w.mv),
            is_worst: true,
            ..move_report(pos, &w)
        });

        Ok(PositionReport {
            fen: pos.fen(),
            evaluation,
            advantage: advantage.side,
            advantage_score: advantage.magnitude,
            best_moves,
            worst_move,
        })
    }

    /// Plays `moves` (SAN or UCI) from `start`, analysing every position on
    /// the way.
    ///
    /// With `depth == 0` no move is ranked, so `was_best_move` is always
    /// false. The first move that cannot be parsed or played stops the
    /// analysis.
    pub fn analyze_line(
        &mut self,
        start: &Position,
        moves: &[&str],
        depth: usize,
    ) -> Result<LineReport> {
        let mut pos = start.clone();
        let mut plies = Vec::with_capacity(moves.len());

        for (idx, text) in moves.iter().enumerate() {
            let ply = idx + 1;
            let unplayable = |source: RulesError| EvalError::UnplayableMove {
                ply,
                text: text.to_string(),
                source,
            };

            let mv = parse_move(&pos, text).map_err(unplayable)?;
            let before = self.analyze_position(&pos, depth)?;
            let evaluation = self.evaluate_move(&pos, mv)?;
            let uci = to_uci(&pos, mv);
            let was_best_move = before.best_moves.first().is_some_and(|b| b.uci == uci);

            debug!(ply, mv = %uci, evaluation, was_best_move, "analysed ply");
            plies.push(PlyReport {
                ply,
                san: to_san(&pos, mv),
                uci,
                evaluation,
                was_best_move,
                before,
            });
            pos = pos.play(mv).map_err(unplayable)?;
        }

        let final_position = self.analyze_position(&pos, depth)?;
        Ok(LineReport {
            plies,
            final_position,
        })
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;
