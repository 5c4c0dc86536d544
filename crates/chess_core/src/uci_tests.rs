use super::*;

#[test]
fn test_parse_and_format_simple_move() {
    let pos = Position::startpos();
    let mv = parse_uci(&pos, "g1f3").unwrap();
    assert_eq!(mv.from, Square::G1);
    assert_eq!(mv.to, Square::F3);
    assert_eq!(to_uci(&pos, mv), "g1f3");
}

#[test]
fn test_castling_uses_king_step() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

    let short = parse_uci(&pos, "e1g1").unwrap();
    assert!(pos.is_castle(short));
    assert_eq!(to_uci(&pos, short), "e1g1");

    let long = parse_uci(&pos, "e1c1").unwrap();
    assert!(pos.is_castle(long));
    assert_eq!(to_uci(&pos, long), "e1c1");
}

#[test]
fn test_promotion_suffix() {
    let pos = Position::from_fen("8/P7/8/8/8/8/8/k1K5 w - - 0 1").unwrap();
    let mv = parse_uci(&pos, "a7a8n").unwrap();
    assert_eq!(mv.promotion, Some(Piece::Knight));
    assert_eq!(to_uci(&pos, mv), "a7a8n");
}

#[test]
fn test_malformed_text_is_a_syntax_error() {
    let pos = Position::startpos();
    assert!(matches!(parse_uci(&pos, "e2"), Err(RulesError::MoveSyntax(_))));
    assert!(matches!(parse_uci(&pos, "z9e4"), Err(RulesError::MoveSyntax(_))));
    assert!(matches!(parse_uci(&pos, "e7e8x"), Err(RulesError::MoveSyntax(_))));
}

#[test]
fn test_illegal_coordinates_are_unknown() {
    let pos = Position::startpos();
    assert!(matches!(
        parse_uci(&pos, "e2e5"),
        Err(RulesError::UnknownMove { .. })
    ));
}
