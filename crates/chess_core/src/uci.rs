use crate::{board::Position, error::RulesError, types::*};

/// Formats a legal move of `pos` in UCI coordinate notation.
///
/// Castling is written as the king's two-square step (`e1g1`), not as the
/// king-onto-rook form the move generator uses internally.
pub fn to_uci(pos: &Position, mv: Move) -> String {
    let to = if pos.is_castle(mv) {
        let file = if mv.to.file() as u8 > mv.from.file() as u8 {
            File::G
        } else {
            File::C
        };
        Square::new(file, mv.from.rank())
    } else {
        mv.to
    };

    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(to));
    if let Some(p) = mv.promotion {
        s.push(promo_char(p));
    }
    s
}

pub fn parse_uci(pos: &Position, txt: &str) -> Result<Move, RulesError> {
    let txt = txt.trim();
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return Err(RulesError::MoveSyntax(txt.to_string()));
    }
    if coord_to_sq(&txt[0..2]).is_none() || coord_to_sq(&txt[2..4]).is_none() {
        return Err(RulesError::MoveSyntax(txt.to_string()));
    }
    if txt.len() == 5 && !matches!(txt.as_bytes()[4].to_ascii_lowercase(), b'q' | b'r' | b'b' | b'n')
    {
        return Err(RulesError::MoveSyntax(txt.to_string()));
    }

    // Match against legal moves so castling comes back in the generator's form.
    let wanted = txt.to_ascii_lowercase();
    pos.legal_moves()
        .into_iter()
        .find(|&m| to_uci(pos, m) == wanted)
        .ok_or_else(|| RulesError::UnknownMove {
            text: txt.to_string(),
            fen: pos.fen(),
        })
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod tests;
