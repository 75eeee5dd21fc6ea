use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use hanabi_bench::logging::init_logging;
use hanabi_bench::simulator::{GameConfig, GameSummary, run_game, write_jsonl};

/// Deterministic self-play harness for the hanabi agent.
#[derive(Debug, Parser)]
#[command(
    name = "hanabi-bench",
    author,
    version,
    about = "Deterministic hanabi self-play harness"
)]
struct Cli {
    /// Number of games to run; game i uses seed base_seed + i.
    #[arg(long, value_name = "COUNT", default_value_t = 20)]
    games: u64,

    /// Base RNG seed for deals and agent sampling (random if omitted).
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Players per table (2-5).
    #[arg(long, value_name = "COUNT", default_value_t = 3)]
    players: usize,

    /// Write per-game JSONL rows to this file.
    #[arg(long, value_name = "FILE")]
    jsonl: Option<PathBuf>,

    /// Raise the default log level to debug.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if cli.games == 0 {
        bail!("nothing to do: --games must be at least 1");
    }
    let base_seed = cli.seed.unwrap_or_else(rand::random);

    let mut rows: Vec<GameSummary> = Vec::with_capacity(cli.games as usize);
    for offset in 0..cli.games {
        let config = GameConfig {
            players: cli.players,
            seed: base_seed.wrapping_add(offset),
        };
        let summary = run_game(&config)
            .with_context(|| format!("running game with seed {}", config.seed))?;
        tracing::info!(
            target: "hanabi_bench::game",
            seed = summary.seed,
            score = summary.score,
            turns = summary.turns,
            misplays = summary.misplays,
            hints = summary.hints_given,
        );
        rows.push(summary);
    }

    let scores: Vec<u8> = rows.iter().map(|row| row.score).collect();
    let mean = scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64;
    let min = scores.iter().min().copied().unwrap_or(0);
    let max = scores.iter().max().copied().unwrap_or(0);

    println!(
        "{} games × {} players (base seed {base_seed}): mean score {mean:.2}, min {min}, max {max}",
        cli.games, cli.players
    );

    if let Some(path) = cli.jsonl.as_ref() {
        write_jsonl(path, &rows)?;
        println!("Per-game rows: {}", path.display());
    }

    Ok(())
}
