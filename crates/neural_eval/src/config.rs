//! Configuration, loaded from TOML.
//!
//! ```toml
//! [model]
//! architecture = "network"
//! hidden1 = 128
//! hidden2 = 32
//! dropout = 0.3
//!
//! [engine]
//! model_path = "models/chess_evaluator.json"
//! default_depth = 3
//!
//! [training]
//! epochs = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    #[default]
    Network,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub model: ModelConfig,
    pub engine: EngineConfig,
    pub training: TrainingConfig,
}

/// Architecture and optimizer settings for freshly created models.
/// A model loaded from disk keeps the settings it was saved with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub architecture: Architecture,
    pub hidden1: usize,
    pub hidden2: usize,
    pub dropout: f32,
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    /// Weight of the newest example in the running normalisation statistics
    pub norm_momentum: f32,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            architecture: Architecture::Network,
            hidden1: 128,
            hidden2: 32,
            dropout: 0.3,
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            norm_momentum: 0.1,
            seed: 0x5eed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where the model is loaded from and saved to. `None` always starts
    /// from fresh parameters.
    pub model_path: Option<PathBuf>,
    /// Number of best moves reported when the caller does not ask for a depth
    pub default_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: Some(PathBuf::from("models/chess_evaluator.json")),
            default_depth: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { epochs: 1 }
    }
}

impl EvalConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EvalError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let cfg: EvalConfig =
            toml::from_str(text).map_err(|e| EvalError::Config(format!("failed to parse: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.model;
        if m.architecture == Architecture::Network && (m.hidden1 == 0 || m.hidden2 == 0) {
            return Err(EvalError::Config("hidden layer widths must be positive".into()));
        }
        if !(0.0..1.0).contains(&m.dropout) {
            return Err(EvalError::Config(format!(
                "dropout must be in [0, 1), got {}",
                m.dropout
            )));
        }
        if !(m.learning_rate > 0.0 && m.learning_rate.is_finite()) {
            return Err(EvalError::Config(format!(
                "learning_rate must be positive, got {}",
                m.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&m.beta1) || !(0.0..1.0).contains(&m.beta2) {
            return Err(EvalError::Config("Adam betas must be in [0, 1)".into()));
        }
        if !(m.norm_momentum > 0.0 && m.norm_momentum <= 1.0) {
            return Err(EvalError::Config(format!(
                "norm_momentum must be in (0, 1], got {}",
                m.norm_momentum
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
