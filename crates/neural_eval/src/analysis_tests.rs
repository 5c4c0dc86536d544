use super::*;
use crate::features::FeatureArray;
use crate::model::Mode;

/// Counts material straight off the planes, like a one-ply "grab what you can".
struct MaterialModel;

impl ScoringModel for MaterialModel {
    fn mode(&self) -> Mode {
        Mode::Inference
    }
    fn set_mode(&mut self, _mode: Mode) {}
    fn forward(&mut self, features: &FeatureArray) -> Result<f32> {
        const VALUES: [f32; 6] = [1.0, 3.0, 3.0, 5.0, 9.0, 0.0];
        let balance: f32 = features
            .outer_iter()
            .enumerate()
            .map(|(plane, counts)| {
                let value = VALUES[plane % 6] * counts.sum();
                if plane < 6 {
                    value
                } else {
                    -value
                }
            })
            .sum();
        Ok((balance / 10.0).tanh())
    }
    fn update(&mut self, _features: &FeatureArray, _target: f32) -> Result<f32> {
        Ok(0.0)
    }
}

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

#[test]
fn test_position_report() {
    let mut evaluator = Evaluator::new(MaterialModel);
    let p = pos("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");

    let report = evaluator.analyze_position(&p, 3).unwrap();
    assert_eq!(report.fen, p.fen());
    assert_eq!(report.advantage, Side::Black);
    assert!((report.advantage_score - 0.8f32.tanh()).abs() < 1e-6);

    assert_eq!(report.best_moves.len(), 3);
    let best = &report.best_moves[0];
    assert_eq!(best.san, "exd5");
    assert_eq!(best.uci, "e4d5");
    assert!(best.is_best && !best.is_worst);
    assert!(report.best_moves[1..].iter().all(|m| !m.is_best));

    let worst = report.worst_move.unwrap();
    assert!(worst.is_worst && !worst.is_best);
    assert!(worst.evaluation < best.evaluation);
}

#[test]
fn test_terminal_position_has_no_worst_move() {
    let mut evaluator = Evaluator::new(MaterialModel);
    let mate = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");

    let report = evaluator.analyze_position(&mate, 3).unwrap();
    assert!(report.best_moves.is_empty());
    assert!(report.worst_move.is_none());
    assert_eq!(report.advantage, Side::Equal);
}

#[test]
fn test_single_legal_move_is_best_and_worst() {
    let mut evaluator = Evaluator::new(MaterialModel);
    // Black king in the corner, only Kb8 is legal
    let p = pos("k7/8/1K6/8/8/8/8/7R b - - 0 1");
    assert_eq!(p.legal_moves().len(), 1);

    let report = evaluator.analyze_position(&p, 3).unwrap();
    assert_eq!(report.best_moves.len(), 1);
    assert!(report.best_moves[0].is_best && report.best_moves[0].is_worst);
    let worst = report.worst_move.unwrap();
    assert!(worst.is_best && worst.is_worst);
}

#[test]
fn test_report_serialises() {
    let mut evaluator = Evaluator::new(MaterialModel);
    let report = evaluator.analyze_position(&Position::startpos(), 1).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["advantage"], "equal");
    assert_eq!(json["best_moves"].as_array().unwrap().len(), 1);
    assert!(json["worst_move"]["uci"].is_string());
}

#[test]
fn test_analyze_line_mixed_notation() {
    let mut evaluator = Evaluator::new(MaterialModel);
    let start = Position::startpos();

    let line = evaluator
        .analyze_line(&start, &["e4", "d7d5", "exd5"], 3)
        .unwrap();

    assert_eq!(line.plies.len(), 3);
    assert_eq!(line.plies[0].ply, 1);
    assert_eq!(line.plies[0].uci, "e2e4");
    assert_eq!(line.plies[1].san, "d5");
    assert_eq!(line.plies[2].uci, "e4d5");
    assert_eq!(line.plies[0].before.fen, start.fen());

    // Winning a pawn is the only material-gaining move there
    assert!(line.plies[2].was_best_move);
    assert!(line.plies[2].evaluation > 0.0);

    assert_eq!(
        line.final_position.fen,
        "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2"
    );
    assert_eq!(line.final_position.advantage, Side::Equal);
}

#[test]
fn test_analyze_line_stops_at_bad_move() {
    let mut evaluator = Evaluator::new(MaterialModel);

    let err = evaluator
        .analyze_line(&Position::startpos(), &["e4", "e5", "Ke3"], 3)
        .unwrap_err();
    match err {
        EvalError::UnplayableMove { ply, text, .. } => {
            assert_eq!(ply, 3);
            assert_eq!(text, "Ke3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_analyze_empty_line() {
    let mut evaluator = Evaluator::new(MaterialModel);
    let line = evaluator.analyze_line(&Position::startpos(), &[], 0).unwrap();
    assert!(line.plies.is_empty());
    assert!(line.final_position.best_moves.is_empty());
    assert!(line.final_position.worst_move.is_some());
}

/// Scores every position 0 and counts forward passes.
#[derive(Default)]
struct CountingModel {
    forwards: usize,
}

impl ScoringModel for CountingModel {
    fn mode(&self) -> Mode {
        Mode::Inference
    }
    fn set_mode(&mut self, _mode: Mode) {}
    fn forward(&mut self, _features: &FeatureArray) -> Result<f32> {
        self.forwards += 1;
        Ok(0.0)
    }
    fn update(&mut self, _features: &FeatureArray, _target: f32) -> Result<f32> {
        Ok(0.0)
    }
}

#[test]
fn test_position_report_scores_each_move_once() {
    let mut evaluator = Evaluator::new(CountingModel::default());
    let report = evaluator.analyze_position(&Position::startpos(), 3).unwrap();

    assert_eq!(report.best_moves.len(), 3);
    assert!(report.worst_move.is_some());
    // One for the position itself, one per legal move
    assert_eq!(evaluator.model().forwards, 1 + 20);
}
