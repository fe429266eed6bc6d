//! Simulate CLI: random self-play over the score engine.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --series 1000 --games 3
//!   cargo run --release --bin simulate -- --players 4 --mode 101 --toggle 0.02

use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use abacus_score_engine::engine::models::{GameMode, MatchMode, ScoreDisplayMode};
use abacus_score_engine::engine::simulator::{run_simulation, SimulationParams};

#[derive(Parser)]
#[command(name = "simulate", about = "Run randomised abacus sessions and check engine invariants")]
struct Cli {
    /// Number of series (each series ends with one history entry)
    #[arg(long, default_value = "200")]
    series: usize,

    /// Games per series (each closed by a shake)
    #[arg(long, default_value = "3")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Entrants: 2 (teams) or 4 (free-for-all)
    #[arg(long, default_value = "2")]
    players: usize,

    /// Game mode: "365" or "101"
    #[arg(long, default_value = "365")]
    mode: String,

    /// Score on a per-team board instead of the shared board
    #[arg(long)]
    per_team: bool,

    /// Probability per move of a mode-toggle gesture
    #[arg(long, default_value = "0.0")]
    toggle: f64,

    /// Move cap per game
    #[arg(long, default_value = "400")]
    max_moves: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();

    let match_mode = match cli.players {
        2 => MatchMode::Pairs2,
        4 => MatchMode::FreeForAll4,
        other => {
            eprintln!("Error: --players must be 2 or 4, got {}", other);
            std::process::exit(1);
        }
    };
    let game_mode = GameMode::from_tag(&cli.mode).unwrap_or_else(|| {
        eprintln!("Error: unknown mode '{}', expected 365 or 101", cli.mode);
        std::process::exit(1);
    });
    if !(0.0..=1.0).contains(&cli.toggle) {
        eprintln!("Error: --toggle must be within [0, 1]");
        std::process::exit(1);
    }

    let params = SimulationParams {
        num_series: cli.series,
        games_per_series: cli.games,
        match_mode,
        score_display: if cli.per_team {
            ScoreDisplayMode::PerTeam
        } else {
            ScoreDisplayMode::SharedBoard
        },
        game_mode,
        toggle_probability: cli.toggle,
        max_moves_per_game: cli.max_moves,
    };

    eprintln!(
        "Simulate: {} series x {} games, seed={}, entrants={}, mode={}, toggle={}",
        params.num_series,
        params.games_per_series,
        cli.seed,
        match_mode.players_count(),
        game_mode.tag(),
        params.toggle_probability
    );

    let t0 = Instant::now();
    let result = run_simulation(&params, cli.seed);
    let elapsed = t0.elapsed().as_secs_f64();

    println!("{}", result.summary());
    println!("  Total: {:.2}s", elapsed);

    if !result.is_clean() {
        std::process::exit(2);
    }
    Ok(())
}
