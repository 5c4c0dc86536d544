use ndarray::{Array, Dimension, Zip};
use serde::{Deserialize, Serialize};

/// Adam hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// Adam optimizer state shared by all parameters of one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adam {
    pub config: AdamConfig,
    /// Number of steps taken so far
    pub step: u64,
}

/// A tensor together with its first and second moment estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Param<D: Dimension> {
    pub value: Array<f32, D>,
    m: Array<f32, D>,
    v: Array<f32, D>,
}

impl<D: Dimension> Param<D> {
    pub fn new(value: Array<f32, D>) -> Self {
        let m = Array::zeros(value.raw_dim());
        let v = Array::zeros(value.raw_dim());
        Self { value, m, v }
    }

    /// Moments must have the same shape as the value.
    pub fn is_consistent(&self) -> bool {
        self.m.shape() == self.value.shape() && self.v.shape() == self.value.shape()
    }

    /// Value and both moments hold only finite numbers.
    pub fn is_finite(&self) -> bool {
        [&self.value, &self.m, &self.v]
            .iter()
            .all(|a| a.iter().all(|x| x.is_finite()))
    }
}

impl Adam {
    pub fn new(config: AdamConfig) -> Self {
        Self { config, step: 0 }
    }

    /// Advances the step counter. Call once per update, before [`Adam::apply`].
    pub fn begin_step(&mut self) {
        self.step += 1;
    }

    pub(crate) fn apply<D: Dimension>(&self, param: &mut Param<D>, grad: &Array<f32, D>) {
        let AdamConfig {
            learning_rate,
            beta1,
            beta2,
            epsilon,
        } = self.config;
        let t = self.step.min(i32::MAX as u64) as i32;
        let bias1 = 1.0 - beta1.powi(t);
        let bias2 = 1.0 - beta2.powi(t);

        Zip::from(&mut param.value)
            .and(&mut param.m)
            .and(&mut param.v)
            .and(grad)
            .for_each(|w, m, v, &g| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / bias1;
                let v_hat = *v / bias2;
                *w -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });
    }
}
