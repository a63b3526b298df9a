//! Plays seeded games with the decision engine and reports how it fared.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p minewise-sim -- --width 16 --height 16 --mines 40 --games 200
//! ```
//!
//! Engine tuning is read from a TOML file whose keys mirror `EngineConfig`:
//!
//! ```sh
//! cargo run -p minewise-sim -- --config engine.toml --json
//! ```
//!
//! `--baseline` also plays every board by revealing random cells, for comparison.
//! Pass `-vv` to print every board and probability matrix along the way.

use std::{fs, path::Path, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minewise_core::{DecisionEngine, EngineConfig, GameConfig, StartTile};

mod render;
mod runner;

use runner::{Simulation, Summary, Tally};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartTileArg {
    Random,
    SimpleSafe,
    AlwaysZero,
}

impl From<StartTileArg> for StartTile {
    fn from(arg: StartTileArg) -> Self {
        match arg {
            StartTileArg::Random => StartTile::Random,
            StartTileArg::SimpleSafe => StartTile::SimpleSafe,
            StartTileArg::AlwaysZero => StartTile::AlwaysZero,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Board width in cells.
    #[arg(long, default_value_t = 9)]
    width: u8,

    /// Board height in cells.
    #[arg(long, default_value_t = 9)]
    height: u8,

    /// Mines per board.
    #[arg(short, long, default_value_t = 10)]
    mines: u16,

    /// Number of games to play.
    #[arg(short = 'n', long, default_value_t = 100)]
    games: u64,

    /// Seed of the first game; game `i` uses `seed + i`.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Actions per game before it counts as stalled.
    #[arg(long, value_name = "COUNT", default_value_t = 10_000)]
    max_steps: usize,

    /// Guarantee for the opening cell in the centre of the board.
    #[arg(long, value_name = "KIND", default_value = "simple-safe")]
    start_tile: StartTileArg,

    /// Engine configuration in TOML.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also play every board with a player revealing random hidden cells.
    #[arg(long)]
    baseline: bool,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn parse_engine_config(text: &str) -> anyhow::Result<EngineConfig> {
    Ok(toml::from_str(text)?)
}

fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_engine_config(&text).with_context(|| format!("Invalid engine config {}", path.display()))
}

fn print_tally(name: &str, tally: &Tally) {
    println!("{name}:");
    println!("  Wins:      {}", tally.wins);
    println!("  Losses:    {}", tally.losses);
    println!("  Stalls:    {}", tally.stalls);
    println!("  Win rate:  {:.2}%", tally.win_rate * 100.0);
    println!("  Avg steps: {:.2}", tally.average_steps);
}

fn print_summary(summary: &Summary) {
    println!("Games: {}", summary.games);
    print_tally("Engine", &summary.engine);
    if let Some(baseline) = &summary.baseline {
        print_tally("Random baseline", baseline);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let engine_config = load_engine_config(args.config.as_deref())?;
    log::debug!("Engine config: {engine_config:?}");

    let game_config = GameConfig::new((args.width, args.height), args.mines);
    if game_config != GameConfig::new_unchecked((args.width, args.height), args.mines) {
        log::warn!("Board adjusted to {game_config:?}");
    }

    let simulation = Simulation {
        engine: DecisionEngine::new(engine_config),
        game_config,
        start_tile: args.start_tile.into(),
        max_steps: args.max_steps,
    };
    let summary = simulation.run(args.seed, args.games, args.baseline)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}
