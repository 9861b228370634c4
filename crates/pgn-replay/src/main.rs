//! pgn-replay - replays one PGN game and prints a record per move.
//!
//! Tag pairs are split off and logged. The movetext is replayed through
//! [`chess_engine::Game`] and each move is written to stdout as JSON, SAN or
//! FEN. A move that cannot be decoded stops the replay with a non-zero exit.

mod config;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chess_engine::pgn::split_tags;
use chess_engine::{Game, GameResult, MoveRecord};
use clap::Parser;
use config::{OutputFormat, ReplayConfig};
use tracing_subscriber::EnvFilter;

/// Replays a PGN game and prints one record per move.
#[derive(Parser)]
#[command(name = "pgn-replay")]
#[command(about = "Replays a PGN game and prints one record per move")]
struct Args {
    /// PGN file to read, or `-` for stdin
    input: PathBuf,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only accept standard SAN
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,

    /// Leave the board snapshot out of JSON records
    #[arg(long)]
    no_board: bool,
}

impl Args {
    fn apply(&self, config: &mut ReplayConfig) {
        if self.strict {
            config.permissive = false;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.no_board {
            config.include_board = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = ReplayConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Replaying {}", args.input.display());
    let text = read_input(&args.input)?;
    let (tags, movetext) = split_tags(&text);
    for tag in &tags {
        tracing::debug!("Tag: {}", tag);
    }

    let mut game = Game::with_options(config.replay_options());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut replay = game.load_pgn(&movetext);
    let mut applied = 0;
    while let Some(record) = replay.next() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Replay failed after {} moves: {}", applied, e);
                return Err(e.into());
            }
        };
        let line = render(&record, &replay.board().to_fen(), &config)?;
        writeln!(out, "{}", line)?;
        applied += 1;
    }

    tracing::info!(
        "Replayed {} moves, result {}",
        applied,
        game.result().map_or("*", GameResult::marker)
    );
    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

/// Formats one record as an output line. `fen` is the position after the
/// move.
fn render(
    record: &MoveRecord,
    fen: &str,
    config: &ReplayConfig,
) -> Result<String, serde_json::Error> {
    match config.output {
        OutputFormat::Jsonl if config.include_board => serde_json::to_string(record),
        OutputFormat::Jsonl => serde_json::to_string(&serde_json::json!({
            "ply": record.ply,
            "move": record.mv,
        })),
        OutputFormat::San => Ok(format!("{} {}", record.ply, record.mv.san)),
        OutputFormat::Fen => Ok(fen.to_string()),
    }
}
