use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use abacus_score_engine::config::{load_config, load_default_config};
use abacus_score_engine::storage::FileStore;
use abacus_score_engine::{AbacusApp, MatchEvent};

#[derive(Parser)]
#[command(name = "abacus", about = "Domino scoring abacus: replay sessions and manage history")]
struct Cli {
    /// Path to abacus.toml (default: auto-discover)
    #[arg(long, env = "ABACUS_CONFIG")]
    config: Option<PathBuf>,

    /// Store file (overrides store_path from the config)
    #[arg(long, env = "ABACUS_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON array of match events and print the resulting board
    Play {
        /// File holding the events, e.g. [{"type": "shake"}]
        script: PathBuf,
    },
    /// Inspect or edit saved match history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved matches, oldest first
    List,
    /// Delete one saved match by id
    Delete { id: Uuid },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path).map_err(|e| format!("Failed to load config: {}", e))?,
        None => load_default_config(),
    };
    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path.clone());
    let store = FileStore::open(&store_path)?;
    let mut app = AbacusApp::open(store, &config);

    match cli.command {
        Command::Play { script } => {
            let content = std::fs::read_to_string(&script)
                .map_err(|e| format!("Failed to read {}: {}", script.display(), e))?;
            let events: Vec<MatchEvent> = serde_json::from_str(&content)
                .map_err(|e| format!("Failed to parse {}: {}", script.display(), e))?;
            tracing::info!(events = events.len(), store = %store_path.display(), "replaying script");

            for event in events {
                for notice in app.handle(event, Instant::now()) {
                    eprintln!("warning: {:?}", notice);
                }
            }

            let controller = app.controller();
            let board = serde_json::json!({
                "phase": controller.phase(),
                "match_mode": controller.match_mode(),
                "game_mode": controller.game_mode(),
                "score_display": controller.score_display(),
                "entrants": controller.entrant_views(),
                "games_in_series": controller.sessions().len(),
            });
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        Command::History { action: HistoryAction::List } => {
            let entries = app.history();
            if entries.is_empty() {
                println!("No saved matches.");
            }
            for entry in &entries {
                let seats: Vec<String> = entry
                    .scores
                    .iter()
                    .enumerate()
                    .map(|(i, score)| {
                        let marker = if entry.winner == Some(i) { "*" } else { "" };
                        format!("{}{}={} (wins {})", marker, entry.label(i), score, entry.wins_for(i))
                    })
                    .collect();
                println!(
                    "{}  {}  {:>3}  {:<11}  {}",
                    entry.id,
                    entry.date.format("%Y-%m-%d %H:%M"),
                    entry.game_mode.tag(),
                    entry.match_mode.tag(),
                    seats.join(", ")
                );
            }
        }
        Command::History { action: HistoryAction::Delete { id } } => {
            if app.delete_history(id)? {
                println!("Deleted {}", id);
            } else {
                println!("No saved match with id {}", id);
            }
        }
    }

    Ok(())
}
