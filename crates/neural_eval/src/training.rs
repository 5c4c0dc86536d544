//! Online training: single-example steps and a small epoch loop over a
//! labelled position file.
//!
//! Dataset format, one example per line:
//!
//! ```text
//! # comment
//! rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1;0.05
//! ```

use std::path::Path;

use chess_core::Position;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{EvalError, Result};
use crate::features::encode;
use crate::model::{Mode, ScoringModel};

/// One gradient step on `pos` towards `target`, returning the loss measured
/// before the step.
///
/// `batch_size` has no effect: every call is a single-example update. It is
/// accepted so callers written against batched trainers keep working.
pub fn train_on_example<M: ScoringModel>(
    model: &mut M,
    pos: &Position,
    target: f32,
    batch_size: Option<usize>,
) -> Result<f32> {
    if let Some(n) = batch_size {
        debug!(batch_size = n, "batch_size ignored, training on a single example");
    }

    let features = encode(pos);
    model.set_mode(Mode::Training);
    let loss = model.update(&features, target)?;

    debug!(fen = %pos, target, loss, "training step");
    Ok(loss)
}

#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub position: Position,
    pub target: f32,
}

/// Labelled positions, in file order.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub examples: Vec<TrainingExample>,
}

impl TrainingSet {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EvalError::DatasetIo {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text)
    }

    /// Parses `FEN;target` lines. Blank lines and lines starting with `#`
    /// are skipped. Line numbers in errors are 1-based.
    pub fn parse(text: &str) -> Result<Self> {
        let mut examples = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let dataset_err = |reason: String| EvalError::Dataset {
                line: idx + 1,
                reason,
            };

            let (fen, target) = line
                .rsplit_once(';')
                .ok_or_else(|| dataset_err("expected 'FEN;target'".into()))?;

            let target: f32 = target
                .trim()
                .parse()
                .map_err(|e| dataset_err(format!("bad target '{}': {}", target.trim(), e)))?;
            if !target.is_finite() || !(-1.0..=1.0).contains(&target) {
                return Err(dataset_err(format!("target {} outside [-1, 1]", target)));
            }

            let position = Position::from_fen(fen.trim()).map_err(|e| dataset_err(e.to_string()))?;
            examples.push(TrainingExample { position, target });
        }

        Ok(Self { examples })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub epochs: usize,
    pub examples: usize,
    /// Mean pre-update loss of each epoch, in order
    pub mean_loss_per_epoch: Vec<f32>,
}

/// Runs `epochs` passes over `set`, one single-example step per position,
/// in file order.
///
/// The model is left in inference mode.
pub fn train_epochs<M: ScoringModel>(
    model: &mut M,
    set: &TrainingSet,
    epochs: usize,
) -> Result<TrainingReport> {
    let mut mean_loss_per_epoch = Vec::with_capacity(epochs);

    for epoch in 0..epochs {
        let mut total = 0.0;
        for ex in &set.examples {
            total += train_on_example(model, &ex.position, ex.target, None)?;
        }
        let mean = if set.is_empty() {
            0.0
        } else {
            total / set.len() as f32
        };
        info!(epoch = epoch + 1, epochs, mean_loss = mean, "epoch finished");
        mean_loss_per_epoch.push(mean);
    }

    model.set_mode(Mode::Inference);
    Ok(TrainingReport {
        epochs,
        examples: set.len(),
        mean_loss_per_epoch,
    })
}

#[cfg(test)]
#[path = "training_tests.rs"]
mod tests;
