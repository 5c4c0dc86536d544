pub use cozy_chess::{Color, File, GameStatus, Move, Piece, Rank, Square};

/// Index of a piece kind in the fixed order pawn, knight, bishop, rook, queen, king.
pub fn piece_index(piece: Piece) -> usize {
    match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    }
}

// Helpers
pub fn file_char(file: File) -> char {
    (b'a' + file as u8) as char
}
pub fn rank_char(rank: Rank) -> char {
    (b'1' + rank as u8) as char
}

pub fn sq_to_coord(sq: Square) -> String {
    format!("{}{}", file_char(sq.file()), rank_char(sq.rank()))
}

pub fn coord_to_sq(c: &str) -> Option<Square> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0].to_ascii_lowercase();
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    let file = File::ALL[(f - b'a') as usize];
    let rank = Rank::ALL[(r - b'1') as usize];
    Some(Square::new(file, rank))
}

/// Upper-case SAN letter for a piece. Pawns have none.
pub fn san_letter(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "",
        Piece::Knight => "N",
        Piece::Bishop => "B",
        Piece::Rook => "R",
        Piece::Queen => "Q",
        Piece::King => "K",
    }
}

/// Lower-case promotion suffix used by UCI.
pub fn promo_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        _ => 'q',
    }
}
