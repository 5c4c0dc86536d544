use super::*;
use crate::config::ModelConfig;
use crate::model::{LinearModel, NetworkModel};

const DATASET: &str = "\
# opening positions
rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1;0.0

4k3/8/8/8/8/8/8/4K2R w K - 0 1;0.9
4k3/8/8/3q4/8/8/8/4K3 w - - 0 1 ; -0.8
";

#[test]
fn test_parse_dataset() {
    let set = TrainingSet::parse(DATASET).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.examples[1].target, 0.9);
    assert_eq!(set.examples[2].target, -0.8);
    assert_eq!(
        set.examples[2].position.fen(),
        "4k3/8/8/3q4/8/8/8/4K3 w - - 0 1"
    );
}

#[test]
fn test_parse_reports_line_numbers() {
    let err = TrainingSet::parse("# header\n\nnot a line").unwrap_err();
    assert!(matches!(err, EvalError::Dataset { line: 3, .. }));

    let err = TrainingSet::parse("8/8/8/8/8/8/8/8 w - - 0 1;1.5").unwrap_err();
    assert!(matches!(err, EvalError::Dataset { line: 1, .. }));

    let err = TrainingSet::parse("garbage fen;0.5").unwrap_err();
    assert!(matches!(err, EvalError::Dataset { line: 1, .. }));

    let err = TrainingSet::parse(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1;abc",
    )
    .unwrap_err();
    assert!(err.to_string().contains("bad target"));
}

#[test]
fn test_missing_dataset_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    let err = TrainingSet::load(&path).unwrap_err();
    assert!(matches!(&err, EvalError::DatasetIo { path: p, .. } if p == &path));
    let msg = err.to_string();
    assert!(msg.starts_with("failed to read dataset"));
    assert!(!msg.contains("dataset line"));
}

#[test]
fn test_train_on_example_switches_to_training() {
    let mut model = LinearModel::new(0.01);
    assert_eq!(model.mode(), Mode::Inference);

    let loss = train_on_example(&mut model, &Position::startpos(), 0.5, None).unwrap();
    assert!((loss - 0.25).abs() < 1e-6);
    assert_eq!(model.mode(), Mode::Training);
}

#[test]
fn test_batch_size_is_ignored() {
    let pos = Position::startpos();
    let mut a = LinearModel::new(0.01);
    let mut b = LinearModel::new(0.01);

    for _ in 0..3 {
        let la = train_on_example(&mut a, &pos, -0.4, None).unwrap();
        let lb = train_on_example(&mut b, &pos, -0.4, Some(64)).unwrap();
        assert_eq!(la, lb);
    }
    assert_eq!(a.bias(), b.bias());
}

#[test]
fn test_repeated_steps_reduce_loss() {
    let mut model = LinearModel::new(0.01);
    let pos = Position::startpos();

    let first = train_on_example(&mut model, &pos, 0.6, None).unwrap();
    let mut last = first;
    for _ in 0..50 {
        last = train_on_example(&mut model, &pos, 0.6, None).unwrap();
    }
    assert!(last < first, "loss {} did not drop below {}", last, first);
}

#[test]
fn test_invalid_target_is_rejected() {
    let mut model = LinearModel::new(0.01);
    let err = train_on_example(&mut model, &Position::startpos(), 2.0, None).unwrap_err();
    assert!(matches!(err, EvalError::InvalidTarget(_)));
}

#[test]
fn test_train_epochs_report() {
    let set = TrainingSet::parse(DATASET).unwrap();
    let mut model = LinearModel::new(0.01);

    let report = train_epochs(&mut model, &set, 20).unwrap();
    assert_eq!(report.epochs, 20);
    assert_eq!(report.examples, 3);
    assert_eq!(report.mean_loss_per_epoch.len(), 20);
    assert!(report.mean_loss_per_epoch[19] < report.mean_loss_per_epoch[0]);
    assert_eq!(model.mode(), Mode::Inference);
}

#[test]
fn test_train_epochs_network() {
    let set = TrainingSet::parse(DATASET).unwrap();
    let mut model = NetworkModel::new(&ModelConfig {
        hidden1: 16,
        hidden2: 8,
        dropout: 0.0,
        learning_rate: 0.003,
        ..ModelConfig::default()
    });

    let report = train_epochs(&mut model, &set, 50).unwrap();
    let losses = &report.mean_loss_per_epoch;
    assert!(losses.iter().all(|l| l.is_finite()));
    assert!(losses[49] < losses[0]);
}

#[test]
fn test_empty_set() {
    let mut model = LinearModel::new(0.01);
    let report = train_epochs(&mut model, &TrainingSet::default(), 2).unwrap();
    assert_eq!(report.mean_loss_per_epoch, vec![0.0, 0.0]);
}
