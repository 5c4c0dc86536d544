use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{check_target, require_training, Mode, ScoringModel};
use crate::error::Result;
use crate::features::{check_shape, flatten, FeatureArray, NUM_FEATURES};

/// `tanh(w·x + b)` trained with plain SGD.
///
/// Small enough to reason about by hand, which makes it the model of choice
/// for exercising the training loop. It has no normalisation statistics or
/// dropout, so both modes compute the same function; only `update` cares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Array1<f32>,
    bias: f32,
    learning_rate: f32,
    #[serde(skip)]
    mode: Mode,
}

impl LinearModel {
    /// Zero weights: every position scores 0 until trained.
    pub fn new(learning_rate: f32) -> Self {
        Self {
            weights: Array1::zeros(NUM_FEATURES),
            bias: 0.0,
            learning_rate,
            mode: Mode::Inference,
        }
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.weights.len() != NUM_FEATURES {
            return Err(format!(
                "linear model has {} weights, expected {}",
                self.weights.len(),
                NUM_FEATURES
            ));
        }
        if !self.bias.is_finite() || !self.weights.iter().all(|w| w.is_finite()) {
            return Err("parameters contain non-finite values".to_string());
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(format!("learning rate {} is not positive", self.learning_rate));
        }
        Ok(())
    }

    fn score(&self, x: &Array1<f32>) -> f32 {
        (self.weights.dot(x) + self.bias).tanh()
    }
}

impl ScoringModel for LinearModel {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn forward(&mut self, features: &FeatureArray) -> Result<f32> {
        check_shape(features)?;
        Ok(self.score(&flatten(features)))
    }

    fn update(&mut self, features: &FeatureArray, target: f32) -> Result<f32> {
        require_training(self.mode)?;
        check_target(target)?;
        check_shape(features)?;

        let x = flatten(features);
        let y = self.score(&x);
        let diff = y - target;
        let grad = 2.0 * diff * (1.0 - y * y);

        self.weights.scaled_add(-self.learning_rate * grad, &x);
        self.bias -= self.learning_rate * grad;
        Ok(diff * diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::encode;
    use chess_core::Position;

    #[test]
    fn test_zero_model_scores_zero() {
        let mut model = LinearModel::new(0.01);
        let x = encode(&Position::startpos());
        assert_eq!(model.forward(&x).unwrap(), 0.0);
    }

    #[test]
    fn test_update_moves_towards_target() {
        let mut model = LinearModel::new(0.01);
        let x = encode(&Position::startpos());
        model.set_mode(Mode::Training);

        let first = model.update(&x, 0.5).unwrap();
        assert!((first - 0.25).abs() < 1e-6);

        model.set_mode(Mode::Inference);
        let y = model.forward(&x).unwrap();
        assert!(y > 0.0 && y < 0.5);
    }
}
