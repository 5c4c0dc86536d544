//! Neural position evaluation for chess
//!
//! This crate scores chess positions with a small trainable network and
//! builds one-ply move ranking on top of that score. There is no tree
//! search: every move is judged by the position it leads to.
//!
//! # Overview
//!
//! 1. [`features::encode`] turns a position into a 12×8×8 occupancy array.
//! 2. A [`ScoringModel`] maps that array to a score in [-1, 1]; positive
//!    favours White regardless of who is to move.
//! 3. [`Evaluator`] ranks legal moves from the mover's point of view and
//!    classifies the advantage.
//! 4. [`training`] nudges the model towards labelled scores one example at
//!    a time.
//!
//! Models are persisted with [`store::save_model`] and restored with
//! [`store::load_model`] or [`store::load_or_init`].
//!
//! ```ignore
//! let cfg = EvalConfig::default();
//! let (model, _) = load_or_init(cfg.engine.model_path.as_deref(), &cfg.model)?;
//! let mut evaluator = Evaluator::new(model);
//! let best = evaluator.find_best_moves(&Position::startpos(), 3)?;
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod features;
pub mod model;
pub mod store;
pub mod training;

pub use analysis::{LineReport, MoveReport, PlyReport, PositionReport};
pub use config::{Architecture, EngineConfig, EvalConfig, ModelConfig, TrainingConfig};
pub use error::{EvalError, Result};
pub use evaluator::{Advantage, Evaluator, MoveCandidate, Side, ADVANTAGE_THRESHOLD};
pub use features::{encode, FeatureArray, FEATURE_SHAPE};
pub use model::{AnyModel, LinearModel, Mode, NetworkModel, ScoringModel};
pub use store::{load_model, load_or_init, save_model, ModelOrigin};
pub use training::{train_epochs, train_on_example, TrainingReport, TrainingSet};
