use std::fmt;

use cozy_chess::Board;

use crate::error::RulesError;
use crate::types::*;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A chess position.
///
/// Values are never mutated after construction: [`Position::play`] returns a
/// fresh position and leaves the receiver untouched, so callers can keep the
/// original around (e.g. to know whose turn it was before a trial move).
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        Self {
            board: Board::default(),
        }
    }

    /// Forsyth-Edwards Notation parser. This is the only place text turns into
    /// a position; everything downstream takes `&Position`.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let trimmed = fen.trim();
        Board::from_fen(trimmed, false)
            .map(|board| Self { board })
            .map_err(|e| RulesError::Fen {
                fen: trimmed.to_string(),
                reason: format!("{:?}", e),
            })
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some((color, piece))
    }

    /// All occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Color, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|(c, p)| (sq, c, p)))
    }

    /// Legal moves in the generator's order. The order is deterministic for a
    /// given position, which ranking relies on to break ties.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            out.extend(piece_moves);
            false
        });
        out
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.board.is_legal(mv)
    }

    /// Applies `mv` to a copy of this position.
    pub fn play(&self, mv: Move) -> Result<Position, RulesError> {
        if !self.board.is_legal(mv) {
            return Err(RulesError::IllegalMove {
                mv: mv.to_string(),
                fen: self.fen(),
            });
        }
        let mut board = self.board.clone();
        board.play_unchecked(mv);
        Ok(Position { board })
    }

    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// True when `mv` is a castling move. The backing generator encodes
    /// castling as the king moving onto its own rook.
    pub fn is_castle(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to) == Some(self.side_to_move())
    }

    pub fn is_capture(&self, mv: Move) -> bool {
        if self.is_castle(mv) {
            return false;
        }
        if self.board.color_on(mv.to) == Some(!self.side_to_move()) {
            return true;
        }
        // En passant: a pawn changing file onto an empty square.
        self.board.piece_on(mv.from) == Some(Piece::Pawn) && mv.from.file() != mv.to.file()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl std::str::FromStr for Position {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
