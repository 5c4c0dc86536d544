//! Argument parsing for `chess-eval`.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Analyse a single position (start position when no FEN is given).
    Eval {
        fen: Option<String>,
        depth: Option<usize>,
    },
    /// Play a sequence of SAN/UCI moves and analyse every position.
    Line {
        fen: Option<String>,
        depth: Option<usize>,
        moves: Vec<String>,
    },
    /// Train on a `FEN;target` file and save the result.
    Train {
        dataset: PathBuf,
        epochs: Option<usize>,
        save: Option<PathBuf>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub config: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub command: Command,
}

pub fn print_usage() {
    println!("chess-eval: neural position evaluation");
    println!();
    println!("Usage:");
    println!("  chess-eval eval [FEN] [--depth N]");
    println!("  chess-eval line [--fen FEN] [--depth N] <move>...");
    println!("  chess-eval train <dataset> [--epochs N] [--save PATH]");
    println!();
    println!("Options:");
    println!("  --config PATH   TOML configuration file");
    println!("  --model PATH    model file (overrides engine.model_path)");
    println!();
    println!("Moves may be given in SAN (Nf3, O-O) or UCI (g1f3, e1g1).");
    println!("Dataset lines are 'FEN;target' with target in [-1, 1].");
    println!("Set RUST_LOG=debug for per-move logging.");
    println!();
    println!("Examples:");
    println!("  chess-eval eval \"r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3\"");
    println!("  chess-eval line e4 e5 Nf3 Nc6 --depth 5");
    println!("  chess-eval train data/positions.txt --epochs 10");
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn number(text: &str, flag: &str) -> Result<usize> {
    text.parse()
        .with_context(|| format!("{} expects a non-negative integer, got '{}'", flag, text))
}

/// Parses the arguments that follow the program name.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config = None;
    let mut model = None;
    let mut fen = None;
    let mut depth = None;
    let mut epochs = None;
    let mut save = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => config = Some(PathBuf::from(value(args, &mut i, "--config")?)),
            "--model" | "-m" => model = Some(PathBuf::from(value(args, &mut i, "--model")?)),
            "--fen" | "-f" => fen = Some(value(args, &mut i, "--fen")?.to_string()),
            "--depth" | "-d" => depth = Some(number(value(args, &mut i, "--depth")?, "--depth")?),
            "--epochs" | "-e" => {
                epochs = Some(number(value(args, &mut i, "--epochs")?, "--epochs")?)
            }
            "--save" | "-s" => save = Some(PathBuf::from(value(args, &mut i, "--save")?)),
            "help" | "--help" | "-h" => {
                return Ok(Cli {
                    config,
                    model,
                    command: Command::Help,
                })
            }
            flag if flag.starts_with("--") => bail!("unknown option: {}", flag),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let Some((name, rest)) = positional.split_first() else {
        return Ok(Cli {
            config,
            model,
            command: Command::Help,
        });
    };

    let command = match name.as_str() {
        "eval" => {
            if rest.len() > 1 {
                bail!("eval takes at most one FEN; quote it as a single argument");
            }
            Command::Eval {
                fen: rest.first().cloned().or(fen),
                depth,
            }
        }
        "line" => Command::Line {
            fen,
            depth,
            moves: rest.to_vec(),
        },
        "train" => {
            let [dataset] = rest else {
                bail!("train requires exactly one dataset path");
            };
            Command::Train {
                dataset: PathBuf::from(dataset),
                epochs,
                save,
            }
        }
        other => bail!("unknown command: {}", other),
    };

    Ok(Cli {
        config,
        model,
        command,
    })
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
