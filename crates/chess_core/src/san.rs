//! Standard Algebraic Notation.

use crate::{board::Position, error::RulesError, types::*};

/// Formats a legal move of `pos` in SAN, including the `+`/`#` suffix.
pub fn to_san(pos: &Position, mv: Move) -> String {
    let mut s = san_body(pos, mv);
    if let Ok(next) = pos.play(mv) {
        if next.is_checkmate() {
            s.push('#');
        } else if next.in_check() {
            s.push('+');
        }
    }
    s
}

/// Parses SAN by matching it against the SAN of every legal move.
///
/// Check/mate markers and annotation glyphs are ignored, `0-0` is accepted
/// for `O-O`, and the `=` before a promotion piece is optional.
pub fn parse_san(pos: &Position, text: &str) -> Result<Move, RulesError> {
    let wanted = normalize(text);
    if wanted.is_empty() {
        return Err(RulesError::MoveSyntax(text.to_string()));
    }
    pos.legal_moves()
        .into_iter()
        .find(|&m| normalize(&san_body(pos, m)) == wanted)
        .ok_or_else(|| RulesError::UnknownMove {
            text: text.trim().to_string(),
            fen: pos.fen(),
        })
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
        .replace('0', "O")
        .replace('=', "")
}

/// SAN without the check suffix.
fn san_body(pos: &Position, mv: Move) -> String {
    if pos.is_castle(mv) {
        return if mv.to.file() as u8 > mv.from.file() as u8 {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let Some((_, piece)) = pos.piece_at(mv.from) else {
        return sq_to_coord(mv.from) + &sq_to_coord(mv.to);
    };
    let capture = pos.is_capture(mv);
    let mut s = String::with_capacity(7);

    if piece == Piece::Pawn {
        if capture {
            s.push(file_char(mv.from.file()));
            s.push('x');
        }
        s.push_str(&sq_to_coord(mv.to));
        if let Some(p) = mv.promotion {
            s.push('=');
            s.push_str(san_letter(p));
        }
        return s;
    }

    s.push_str(san_letter(piece));
    s.push_str(&disambiguation(pos, mv, piece));
    if capture {
        s.push('x');
    }
    s.push_str(&sq_to_coord(mv.to));
    s
}

fn disambiguation(pos: &Position, mv: Move, piece: Piece) -> String {
    if piece == Piece::King {
        return String::new();
    }
    let rivals: Vec<Square> = pos
        .legal_moves()
        .into_iter()
        .filter(|m| m.to == mv.to && m.from != mv.from)
        .filter(|m| pos.piece_at(m.from).map(|(_, p)| p) == Some(piece))
        .map(|m| m.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
        file_char(mv.from.file()).to_string()
    } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
        rank_char(mv.from.rank()).to_string()
    } else {
        sq_to_coord(mv.from)
    }
}

#[cfg(test)]
#[path = "san_tests.rs"]
mod tests;
