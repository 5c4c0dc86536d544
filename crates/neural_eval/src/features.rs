//! Feature extraction for neural network input
//!
//! Converts a chess position into the tensor the scoring model consumes:
//! 12 planes of 8×8, one plane per (color, piece kind).
//!
//! - Planes 0-5: White pieces (Pawn, Knight, Bishop, Rook, Queen, King)
//! - Planes 6-11: Black pieces (Pawn, Knight, Bishop, Rook, Queen, King)
//!
//! Rows run top to bottom as White sees the board (rank 8 is row 0, rank 1
//! is row 7); columns run a to h. The encoding is absolute, never flipped for
//! the side to move, which is what keeps scores White-positive.

use chess_core::{piece_index, Color, Piece, Position};
use ndarray::{Array1, Array3};

use crate::error::EvalError;

/// Number of feature planes: 6 piece types × 2 colors
pub const NUM_PLANES: usize = 12;

/// Board edge length.
pub const BOARD_SIZE: usize = 8;

/// Shape of a [`FeatureArray`]: (plane, row, column).
pub const FEATURE_SHAPE: (usize, usize, usize) = (NUM_PLANES, BOARD_SIZE, BOARD_SIZE);

/// Total number of features: 12 × 8 × 8 = 768
pub const NUM_FEATURES: usize = NUM_PLANES * BOARD_SIZE * BOARD_SIZE;

/// Encoded position, values in {0.0, 1.0}.
pub type FeatureArray = Array3<f32>;

/// Plane holding pieces of the given color and kind.
pub fn plane_index(color: Color, piece: Piece) -> usize {
    let color_offset = if color == Color::White { 0 } else { 6 };
    piece_index(piece) + color_offset
}

/// Encodes a position. Pure and deterministic: the same position always gives
/// a bit-identical array.
pub fn encode(pos: &Position) -> FeatureArray {
    let mut features = FeatureArray::zeros(FEATURE_SHAPE);

    for (sq, color, piece) in pos.pieces() {
        let row = BOARD_SIZE - 1 - sq.rank() as usize;
        let col = sq.file() as usize;
        features[[plane_index(color, piece), row, col]] = 1.0;
    }

    features
}

/// Rejects arrays that do not have the (12, 8, 8) shape.
pub fn check_shape(features: &FeatureArray) -> Result<(), EvalError> {
    if features.dim() != FEATURE_SHAPE {
        return Err(EvalError::Encoding {
            expected: FEATURE_SHAPE,
            found: features.shape().to_vec(),
        });
    }
    Ok(())
}

/// Row-major flattening used as the input vector of the dense models.
pub fn flatten(features: &FeatureArray) -> Array1<f32> {
    features.iter().copied().collect()
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod tests;
