use super::*;
use crate::error::EvalError;
use crate::features::encode;
use chess_core::Position;

fn small_config(dropout: f32) -> ModelConfig {
    ModelConfig {
        hidden1: 32,
        hidden2: 16,
        dropout,
        ..ModelConfig::default()
    }
}

fn positions() -> Vec<Position> {
    [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
        "4k3/8/8/8/8/8/8/4K2R w K - 0 1",
        "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1",
    ]
    .iter()
    .map(|fen| Position::from_fen(fen).unwrap())
    .collect()
}

#[test]
fn test_output_is_bounded() {
    let mut model = NetworkModel::new(&small_config(0.3));
    for pos in positions() {
        let score = model.forward(&encode(&pos)).unwrap();
        assert!((-1.0..=1.0).contains(&score), "score {} out of range", score);
    }
}

#[test]
fn test_inference_is_deterministic() {
    let mut model = NetworkModel::new(&small_config(0.3));
    model.set_mode(Mode::Inference);
    let x = encode(&Position::startpos());

    let first = model.forward(&x).unwrap();
    for _ in 0..5 {
        assert_eq!(model.forward(&x).unwrap().to_bits(), first.to_bits());
    }
}

#[test]
fn test_same_seed_same_parameters() {
    let cfg = small_config(0.3);
    let mut a = NetworkModel::new(&cfg);
    let mut b = NetworkModel::new(&cfg);
    let x = encode(&Position::startpos());
    assert_eq!(a.forward(&x).unwrap(), b.forward(&x).unwrap());
}

#[test]
fn test_training_mode_is_stochastic() {
    let mut model = NetworkModel::new(&small_config(0.5));
    model.set_mode(Mode::Training);
    let x = encode(&Position::startpos());

    let first = model.forward(&x).unwrap();
    let varied = (0..10).any(|_| model.forward(&x).unwrap() != first);
    assert!(varied, "training-mode forwards should not all agree");
}

#[test]
fn test_update_requires_training_mode() {
    let mut model = NetworkModel::new(&small_config(0.0));
    model.set_mode(Mode::Inference);
    let x = encode(&Position::startpos());

    let err = model.update(&x, 0.5).unwrap_err();
    assert!(matches!(
        err,
        EvalError::WrongMode {
            expected: Mode::Training,
            actual: Mode::Inference
        }
    ));
    assert_eq!(model.steps(), 0);
}

#[test]
fn test_update_rejects_bad_target() {
    let mut model = NetworkModel::new(&small_config(0.0));
    model.set_mode(Mode::Training);
    let x = encode(&Position::startpos());

    assert!(matches!(model.update(&x, 1.5), Err(EvalError::InvalidTarget(_))));
    assert!(matches!(
        model.update(&x, f32::NAN),
        Err(EvalError::InvalidTarget(_))
    ));
}

#[test]
fn test_wrong_shape_is_an_encoding_error() {
    let mut model = NetworkModel::new(&small_config(0.0));
    let bad = FeatureArray::zeros((6, 8, 8));
    assert!(matches!(model.forward(&bad), Err(EvalError::Encoding { .. })));
}

#[test]
fn test_repeated_updates_reduce_loss() {
    let mut model = NetworkModel::new(&small_config(0.0));
    let x = encode(&Position::startpos());

    model.set_mode(Mode::Inference);
    let initial = model.forward(&x).unwrap();
    let target = if initial > 0.0 { -0.5 } else { 0.5 };

    model.set_mode(Mode::Training);
    let first_loss = model.update(&x, target).unwrap();
    let mut last_loss = first_loss;
    for _ in 0..300 {
        last_loss = model.update(&x, target).unwrap();
    }

    assert!(
        last_loss < first_loss,
        "loss did not decrease: {} -> {}",
        first_loss,
        last_loss
    );
    assert_eq!(model.steps(), 301);
}

#[test]
fn test_fresh_model_validates() {
    let model = NetworkModel::new(&small_config(0.3));
    assert!(model.validate().is_ok());
    assert_eq!(model.widths(), (32, 16));
}
