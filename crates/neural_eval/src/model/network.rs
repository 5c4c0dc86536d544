//! Multilayer perceptron over the 768 board features.
//!
//! ```text
//! input(768) -> dense(H1) -> running norm -> relu -> dropout
//!            -> dense(H2) -> relu -> dropout -> dense(1) -> tanh
//! ```
//!
//! The running norm layer keeps exponential moving averages of each hidden
//! unit's mean and variance. Training mode folds the current example into the
//! averages before normalising; inference mode reads them only. The averages
//! are treated as constants when back-propagating.

use ndarray::{Array1, Array2, Axis, Ix1, Ix2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::adam::{Adam, AdamConfig, Param};
use super::{check_target, require_training, Mode, ScoringModel};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::features::{check_shape, flatten, FeatureArray, NUM_FEATURES};

const NORM_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Dense {
    /// (outputs, inputs)
    weights: Param<Ix2>,
    bias: Param<Ix1>,
}

impl Dense {
    /// Uniform init in [-bound, bound].
    fn new(inputs: usize, outputs: usize, bound: f32, rng: &mut StdRng) -> Self {
        let weights = Array2::from_shape_fn((outputs, inputs), |_| rng.gen_range(-bound..=bound));
        Self {
            weights: Param::new(weights),
            bias: Param::new(Array1::zeros(outputs)),
        }
    }

    fn forward(&self, x: &Array1<f32>) -> Array1<f32> {
        self.weights.value.dot(x) + &self.bias.value
    }

    fn inputs(&self) -> usize {
        self.weights.value.ncols()
    }

    fn outputs(&self) -> usize {
        self.weights.value.nrows()
    }

    fn is_consistent(&self) -> bool {
        self.weights.is_consistent()
            && self.bias.is_consistent()
            && self.bias.value.len() == self.outputs()
    }

    fn is_finite(&self) -> bool {
        self.weights.is_finite() && self.bias.is_finite()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RunningNorm {
    gamma: Param<Ix1>,
    beta: Param<Ix1>,
    running_mean: Array1<f32>,
    running_var: Array1<f32>,
    momentum: f32,
}

impl RunningNorm {
    fn new(width: usize, momentum: f32) -> Self {
        Self {
            gamma: Param::new(Array1::ones(width)),
            beta: Param::new(Array1::zeros(width)),
            running_mean: Array1::zeros(width),
            running_var: Array1::ones(width),
            momentum,
        }
    }

    fn observe(&mut self, z: &Array1<f32>) {
        let m = self.momentum;
        self.running_mean = &self.running_mean * (1.0 - m) + z * m;
        let dev = z - &self.running_mean;
        self.running_var = &self.running_var * (1.0 - m) + dev.mapv(|d| d * d) * m;
    }

    fn inv_std(&self) -> Array1<f32> {
        self.running_var.mapv(|v| 1.0 / (v + NORM_EPSILON).sqrt())
    }

    fn width(&self) -> usize {
        self.gamma.value.len()
    }

    fn is_consistent(&self) -> bool {
        let w = self.width();
        self.gamma.is_consistent()
            && self.beta.is_consistent()
            && self.beta.value.len() == w
            && self.running_mean.len() == w
            && self.running_var.len() == w
    }

    /// Finite parameters and statistics, with a non-negative variance.
    fn is_finite(&self) -> bool {
        self.gamma.is_finite()
            && self.beta.is_finite()
            && self.running_mean.iter().all(|x| x.is_finite())
            && self.running_var.iter().all(|&v| v.is_finite() && v >= 0.0)
    }
}

/// Activations kept from a forward pass for back-propagation.
struct Trace {
    input: Array1<f32>,
    normalized: Array1<f32>,
    inv_std: Array1<f32>,
    pre_relu1: Array1<f32>,
    mask1: Array1<f32>,
    hidden1: Array1<f32>,
    pre_relu2: Array1<f32>,
    mask2: Array1<f32>,
    hidden2: Array1<f32>,
    output: f32,
}

/// The default scoring model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkModel {
    l1: Dense,
    norm: RunningNorm,
    l2: Dense,
    out: Dense,
    dropout: f32,
    optimizer: Adam,
    /// Seed of the initial weights, also the root of the dropout stream
    seed: u64,
    #[serde(skip)]
    mode: Mode,
    /// Rebuilt by [`NetworkModel::reseed_dropout`] after loading.
    #[serde(skip, default = "unseeded_rng")]
    rng: StdRng,
}

fn unseeded_rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

impl NetworkModel {
    pub fn new(cfg: &ModelConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let he = |fan_in: usize| (6.0 / fan_in as f32).sqrt();
        let glorot = |fan_in: usize, fan_out: usize| (6.0 / (fan_in + fan_out) as f32).sqrt();

        let l1 = Dense::new(NUM_FEATURES, cfg.hidden1, he(NUM_FEATURES), &mut rng);
        let l2 = Dense::new(cfg.hidden1, cfg.hidden2, he(cfg.hidden1), &mut rng);
        let out = Dense::new(cfg.hidden2, 1, glorot(cfg.hidden2, 1), &mut rng);

        Self {
            l1,
            norm: RunningNorm::new(cfg.hidden1, cfg.norm_momentum),
            l2,
            out,
            dropout: cfg.dropout,
            optimizer: Adam::new(AdamConfig {
                learning_rate: cfg.learning_rate,
                beta1: cfg.beta1,
                beta2: cfg.beta2,
                epsilon: cfg.epsilon,
            }),
            seed: cfg.seed,
            mode: Mode::Inference,
            rng,
        }
    }

    /// Restarts the dropout stream from the stored seed and step count, so a
    /// reloaded model samples the same masks every time it is loaded.
    pub(crate) fn reseed_dropout(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.optimizer.step));
    }

    /// Number of optimizer steps applied so far.
    pub fn steps(&self) -> u64 {
        self.optimizer.step
    }

    /// Hidden layer widths (H1, H2).
    pub fn widths(&self) -> (usize, usize) {
        (self.l1.outputs(), self.l2.outputs())
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let (h1, h2) = self.widths();
        if self.l1.inputs() != NUM_FEATURES {
            return Err(format!(
                "first layer takes {} inputs, expected {}",
                self.l1.inputs(),
                NUM_FEATURES
            ));
        }
        if self.norm.width() != h1 || self.l2.inputs() != h1 {
            return Err(format!("hidden layer 1 width mismatch (expected {})", h1));
        }
        if self.out.inputs() != h2 || self.out.outputs() != 1 {
            return Err(format!("output layer shape mismatch (expected {}x1)", h2));
        }
        if ![&self.l1, &self.l2, &self.out]
            .iter()
            .all(|d| d.is_consistent())
            || !self.norm.is_consistent()
        {
            return Err("parameter and optimizer moment shapes disagree".to_string());
        }
        if ![&self.l1, &self.l2, &self.out]
            .iter()
            .all(|d| d.is_finite())
            || !self.norm.is_finite()
        {
            return Err("parameters contain non-finite values".to_string());
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(format!("dropout {} outside [0, 1)", self.dropout));
        }
        Ok(())
    }

    fn dropout_mask(&mut self, width: usize, training: bool) -> Array1<f32> {
        if !training || self.dropout == 0.0 {
            return Array1::ones(width);
        }
        let keep = 1.0 - self.dropout;
        let rng = &mut self.rng;
        Array1::from_shape_fn(width, |_| {
            if rng.gen::<f32>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        })
    }

    fn pass(&mut self, features: &FeatureArray, training: bool) -> Result<Trace> {
        check_shape(features)?;
        let input = flatten(features);

        let z1 = self.l1.forward(&input);
        if training {
            self.norm.observe(&z1);
        }
        let inv_std = self.norm.inv_std();
        let normalized = (&z1 - &self.norm.running_mean) * &inv_std;
        let pre_relu1 = &normalized * &self.norm.gamma.value + &self.norm.beta.value;
        let mask1 = self.dropout_mask(pre_relu1.len(), training);
        let hidden1 = pre_relu1.mapv(relu) * &mask1;

        let pre_relu2 = self.l2.forward(&hidden1);
        let mask2 = self.dropout_mask(pre_relu2.len(), training);
        let hidden2 = pre_relu2.mapv(relu) * &mask2;

        let output = self.out.forward(&hidden2)[0].tanh();

        Ok(Trace {
            input,
            normalized,
            inv_std,
            pre_relu1,
            mask1,
            hidden1,
            pre_relu2,
            mask2,
            hidden2,
            output,
        })
    }

    fn backward(&mut self, trace: &Trace, target: f32) {
        // d(loss)/d(pre-tanh)
        let d_out = 2.0 * (trace.output - target) * (1.0 - trace.output * trace.output);
        let d_out = Array1::from_elem(1, d_out);

        let g_out_w = outer(&d_out, &trace.hidden2);
        let d_hidden2 = self.out.weights.value.t().dot(&d_out);
        let d_pre2 = d_hidden2 * &trace.mask2 * trace.pre_relu2.mapv(relu_grad);

        let g_l2_w = outer(&d_pre2, &trace.hidden1);
        let d_hidden1 = self.l2.weights.value.t().dot(&d_pre2);
        let d_pre1 = d_hidden1 * &trace.mask1 * trace.pre_relu1.mapv(relu_grad);

        let g_gamma = &d_pre1 * &trace.normalized;
        let d_z1 = &d_pre1 * &self.norm.gamma.value * &trace.inv_std;
        let g_l1_w = outer(&d_z1, &trace.input);

        self.optimizer.begin_step();
        let opt = &self.optimizer;
        opt.apply(&mut self.out.weights, &g_out_w);
        opt.apply(&mut self.out.bias, &d_out);
        opt.apply(&mut self.l2.weights, &g_l2_w);
        opt.apply(&mut self.l2.bias, &d_pre2);
        opt.apply(&mut self.norm.gamma, &g_gamma);
        opt.apply(&mut self.norm.beta, &d_pre1);
        opt.apply(&mut self.l1.weights, &g_l1_w);
        opt.apply(&mut self.l1.bias, &d_z1);
    }
}

impl ScoringModel for NetworkModel {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn forward(&mut self, features: &FeatureArray) -> Result<f32> {
        let training = self.mode == Mode::Training;
        Ok(self.pass(features, training)?.output)
    }

    fn update(&mut self, features: &FeatureArray, target: f32) -> Result<f32> {
        require_training(self.mode)?;
        check_target(target)?;

        let trace = self.pass(features, true)?;
        let diff = trace.output - target;
        let loss = diff * diff;
        self.backward(&trace, target);
        Ok(loss)
    }
}

fn relu(x: f32) -> f32 {
    x.max(0.0)
}

fn relu_grad(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

fn outer(a: &Array1<f32>, b: &Array1<f32>) -> Array2<f32> {
    let col = a.view().insert_axis(Axis(1));
    let row = b.view().insert_axis(Axis(0));
    col.dot(&row)
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
