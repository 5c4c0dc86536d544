/// Errors raised by the rules layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("invalid FEN '{fen}': {reason}")]
    Fen { fen: String, reason: String },

    #[error("move {mv} is not legal in position {fen}")]
    IllegalMove { mv: String, fen: String },

    #[error("malformed move text: '{0}'")]
    MoveSyntax(String),

    #[error("no legal move matches '{text}' in position {fen}")]
    UnknownMove { text: String, fen: String },
}
