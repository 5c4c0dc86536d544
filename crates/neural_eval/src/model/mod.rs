//! Scoring models: feature array in, bounded White-positive score out.
//!
//! Callers must hold at most one in-flight call per model. All entry points
//! take `&mut self`, so the borrow checker enforces this within a process;
//! a host sharing a model across threads wraps it in its own lock.

mod adam;
mod linear;
mod network;

pub use adam::{Adam, AdamConfig};
pub use linear::LinearModel;
pub use network::NetworkModel;

use serde::{Deserialize, Serialize};

use crate::config::{Architecture, ModelConfig};
use crate::error::{EvalError, Result};
use crate::features::FeatureArray;

/// Execution mode of a model.
///
/// Inference freezes normalisation statistics and disables dropout, so
/// repeated forwards with unchanged parameters are bit-identical. Training
/// updates statistics per example and samples dropout masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Inference,
    Training,
}

/// A trainable scalar evaluator.
pub trait ScoringModel {
    fn mode(&self) -> Mode;

    /// Switches mode. Must be called before every `forward`/`update` whose
    /// mode matters; models never switch on their own.
    fn set_mode(&mut self, mode: Mode);

    /// Scores one feature array. The result is in [-1, 1].
    fn forward(&mut self, features: &FeatureArray) -> Result<f32>;

    /// One gradient step on the squared error against `target`.
    ///
    /// Returns the loss measured before the step. Requires training mode.
    fn update(&mut self, features: &FeatureArray, target: f32) -> Result<f32>;
}

pub(crate) fn require_training(mode: Mode) -> Result<()> {
    if mode != Mode::Training {
        tracing::warn!("update called while the model is in inference mode");
        return Err(EvalError::WrongMode {
            expected: Mode::Training,
            actual: mode,
        });
    }
    Ok(())
}

pub(crate) fn check_target(target: f32) -> Result<()> {
    if !target.is_finite() || !(-1.0..=1.0).contains(&target) {
        return Err(EvalError::InvalidTarget(target));
    }
    Ok(())
}

/// Any of the shipped architectures, as selected by configuration and as
/// stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "architecture", rename_all = "snake_case")]
pub enum AnyModel {
    Network(NetworkModel),
    Linear(LinearModel),
}

impl AnyModel {
    /// Freshly initialised parameters for the configured architecture.
    pub fn from_config(cfg: &ModelConfig) -> Self {
        match cfg.architecture {
            Architecture::Network => AnyModel::Network(NetworkModel::new(cfg)),
            Architecture::Linear => AnyModel::Linear(LinearModel::new(cfg.learning_rate)),
        }
    }

    pub fn architecture(&self) -> Architecture {
        match self {
            AnyModel::Network(_) => Architecture::Network,
            AnyModel::Linear(_) => Architecture::Linear,
        }
    }

    /// Rebuilds state that is not stored on disk.
    pub(crate) fn restore_transient_state(&mut self) {
        if let AnyModel::Network(m) = self {
            m.reseed_dropout();
        }
    }

    /// Checks that every tensor has the shape its neighbours expect and holds
    /// only finite values.
    pub(crate) fn validate(&self) -> Result<(), String> {
        match self {
            AnyModel::Network(m) => m.validate(),
            AnyModel::Linear(m) => m.validate(),
        }
    }
}

impl ScoringModel for AnyModel {
    fn mode(&self) -> Mode {
        match self {
            AnyModel::Network(m) => m.mode(),
            AnyModel::Linear(m) => m.mode(),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        match self {
            AnyModel::Network(m) => m.set_mode(mode),
            AnyModel::Linear(m) => m.set_mode(mode),
        }
    }

    fn forward(&mut self, features: &FeatureArray) -> Result<f32> {
        match self {
            AnyModel::Network(m) => m.forward(features),
            AnyModel::Linear(m) => m.forward(features),
        }
    }

    fn update(&mut self, features: &FeatureArray, target: f32) -> Result<f32> {
        match self {
            AnyModel::Network(m) => m.update(features, target),
            AnyModel::Linear(m) => m.update(features, target),
        }
    }
}
