//! chess-eval
//!
//! Evaluate positions, analyse move sequences and train the evaluation
//! model from the command line. Reports are printed as JSON on stdout;
//! logs go to stderr (filter with `RUST_LOG`).

mod cli;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chess_core::Position;
use cli::{parse_args, print_usage, Command};
use neural_eval::{
    load_or_init, save_model, train_epochs, EvalConfig, Evaluator, ModelOrigin, TrainingSet,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn start_position(fen: Option<&str>) -> Result<Position> {
    match fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("invalid FEN '{}'", fen)),
        None => Ok(Position::startpos()),
    }
}

fn run(args: &[String]) -> Result<()> {
    let cli = parse_args(args)?;
    if cli.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => EvalConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EvalConfig::default(),
    };
    let model_path: Option<PathBuf> = cli.model.clone().or_else(|| config.engine.model_path.clone());

    let (model, origin) = load_or_init(model_path.as_deref(), &config.model)?;
    if origin == ModelOrigin::Fresh {
        info!("evaluating with untrained parameters");
    }
    let mut evaluator = Evaluator::new(model);

    match cli.command {
        Command::Eval { fen, depth } => {
            let pos = start_position(fen.as_deref())?;
            let depth = depth.unwrap_or(config.engine.default_depth);
            print_json(&evaluator.analyze_position(&pos, depth)?)
        }
        Command::Line { fen, depth, moves } => {
            let pos = start_position(fen.as_deref())?;
            let depth = depth.unwrap_or(config.engine.default_depth);
            let moves: Vec<&str> = moves.iter().map(String::as_str).collect();
            print_json(&evaluator.analyze_line(&pos, &moves, depth)?)
        }
        Command::Train {
            dataset,
            epochs,
            save,
        } => {
            let out = save
                .or(model_path)
                .context("no path to save the trained model: pass --save or set engine.model_path")?;
            let set = TrainingSet::load(&dataset)
                .with_context(|| format!("loading dataset {}", dataset.display()))?;
            let epochs = epochs.unwrap_or(config.training.epochs);
            info!(examples = set.len(), epochs, "training");

            let report = train_epochs(evaluator.model_mut(), &set, epochs)?;
            save_model(evaluator.model(), &out)?;
            print_json(&report)
        }
        Command::Help => Ok(()),
    }
}

fn main() -> ExitCode {
    init_logging();
    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
