//! Model persistence.
//!
//! Parameters (including optimizer moments and normalisation statistics)
//! are stored as JSON inside a versioned envelope. Saves go through a
//! temporary sibling file and a rename, so a crash never leaves a half
//! written model behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ModelConfig;
use crate::error::{EvalError, Result};
use crate::model::{AnyModel, Mode, ScoringModel};

/// Bumped whenever the on-disk layout changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ModelFileRef<'a> {
    format_version: u32,
    model: &'a AnyModel,
}

#[derive(Deserialize)]
struct ModelFile {
    format_version: u32,
    model: AnyModel,
}

/// Where the evaluator's parameters came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOrigin {
    Loaded(PathBuf),
    Fresh,
}

fn io_error(path: &Path, reason: impl ToString) -> EvalError {
    EvalError::ModelIo {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Writes the full parameter set to `path`, creating parent directories.
pub fn save_model(model: &AnyModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
    }

    let file = ModelFileRef {
        format_version: FORMAT_VERSION,
        model,
    };
    let json = serde_json::to_vec(&file).map_err(|e| io_error(path, e))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json).map_err(|e| io_error(path, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(path, e));
    }

    info!(path = %path.display(), architecture = ?model.architecture(), "model saved");
    Ok(())
}

/// Reads a model saved by [`save_model`]. The model comes back in inference
/// mode. Missing, unreadable or inconsistent files are errors.
pub fn load_model(path: &Path) -> Result<AnyModel> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    let file: ModelFile = serde_json::from_slice(&bytes).map_err(|e| io_error(path, e))?;

    if file.format_version != FORMAT_VERSION {
        return Err(io_error(
            path,
            format!(
                "unsupported format version {} (expected {})",
                file.format_version, FORMAT_VERSION
            ),
        ));
    }

    let mut model = file.model;
    model.validate().map_err(|e| io_error(path, e))?;
    model.restore_transient_state();
    model.set_mode(Mode::Inference);

    info!(path = %path.display(), architecture = ?model.architecture(), "model loaded");
    Ok(model)
}

/// Loads the model at `path`, or creates a fresh one when there is nothing
/// to load.
///
/// This is the only place a fallback happens, and it is logged. A file that
/// exists but cannot be loaded is an error, not a reason to start over.
pub fn load_or_init(path: Option<&Path>, cfg: &ModelConfig) -> Result<(AnyModel, ModelOrigin)> {
    match path {
        Some(p) if p.exists() => {
            let model = load_model(p)?;
            Ok((model, ModelOrigin::Loaded(p.to_path_buf())))
        }
        Some(p) => {
            info!(path = %p.display(), "no model file found, creating a new model");
            Ok((AnyModel::from_config(cfg), ModelOrigin::Fresh))
        }
        None => {
            info!("no model path configured, creating a new model");
            Ok((AnyModel::from_config(cfg), ModelOrigin::Fresh))
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
