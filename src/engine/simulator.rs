//! Randomised self-play over the match controller.
//!
//! Plays many series of games with random bead moves, checking after every
//! move that rods stay in range and that carries conserve score. Series run
//! in parallel via rayon, each with its own seeded RNG.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::engine::controller::{MatchController, MatchEffect, MatchEvent, MatchPhase};
use crate::engine::debounce::ModeSwitchGate;
use crate::engine::models::*;
use crate::engine::scoring::compute_score;
use crate::engine::winner::determine_winner;
use crate::storage::history::HistoryRepository;
use crate::storage::MemoryStore;

#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub num_series: usize,
    pub games_per_series: usize,
    pub match_mode: MatchMode,
    pub score_display: ScoreDisplayMode,
    pub game_mode: GameMode,
    /// Chance per move of a mode-toggle gesture.
    pub toggle_probability: f64,
    /// Moves after which a game with no winner is shaken clear anyway.
    pub max_moves_per_game: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_series: 100,
            games_per_series: 3,
            match_mode: MatchMode::Pairs2,
            score_display: ScoreDisplayMode::SharedBoard,
            game_mode: GameMode::Phone365,
            toggle_probability: 0.0,
            max_moves_per_game: 400,
        }
    }
}

/// Aggregated results from a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationResult {
    pub num_series: usize,
    pub num_games: usize,
    pub wins: Vec<usize>,
    pub no_winner: usize,
    pub carries: usize,
    pub discarded_beads: u64,
    pub mode_switches: usize,
    pub moves_per_game: Vec<usize>,
    pub history_entries: usize,
    pub violations: Vec<String>,
}

impl SimulationResult {
    fn new(entrants: usize) -> Self {
        Self {
            wins: vec![0; entrants],
            ..Default::default()
        }
    }

    pub fn merge(mut self, other: SimulationResult) -> SimulationResult {
        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (i, w) in other.wins.iter().enumerate() {
            self.wins[i] += w;
        }
        self.num_series += other.num_series;
        self.num_games += other.num_games;
        self.no_winner += other.no_winner;
        self.carries += other.carries;
        self.discarded_beads += other.discarded_beads;
        self.mode_switches += other.mode_switches;
        self.moves_per_game.extend(other.moves_per_game);
        self.history_entries += other.history_entries;
        self.violations.extend(other.violations);
        self
    }

    pub fn win_rate(&self, entrant: usize) -> f64 {
        *self.wins.get(entrant).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_moves(&self) -> f64 {
        if self.moves_per_game.is_empty() {
            return 0.0;
        }
        self.moves_per_game.iter().sum::<usize>() as f64 / self.moves_per_game.len() as f64
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Simulation Results ({} series, {} games)",
            self.num_series, self.num_games
        )];
        lines.push("=".repeat(60));
        for (i, wins) in self.wins.iter().enumerate() {
            lines.push(format!(
                "  {:>10}: {:4} wins ({:5.1}%)",
                format!("entrant {}", i),
                wins,
                self.win_rate(i) * 100.0
            ));
        }
        lines.push(format!("  {:>10}: {}", "No winner", self.no_winner));
        lines.push(format!(
            "  Avg moves/game: {:.1}  |  Carries: {}  |  Discarded beads: {}  |  Mode switches: {}",
            self.avg_moves(),
            self.carries,
            self.discarded_beads,
            self.mode_switches
        ));
        lines.push(format!("  History entries written: {}", self.history_entries));
        if self.violations.is_empty() {
            lines.push("  Invariants: ok".to_string());
        } else {
            lines.push(format!("  Invariant violations: {}", self.violations.len()));
            for v in self.violations.iter().take(10) {
                lines.push(format!("    - {}", v));
            }
        }
        lines.join("\n")
    }
}

/// Run every series in parallel and merge the results.
pub fn run_simulation(params: &SimulationParams, base_seed: u64) -> SimulationResult {
    let entrants = params.match_mode.players_count();
    (0..params.num_series)
        .into_par_iter()
        .map(|i| run_series(params, base_seed.wrapping_add(i as u64)))
        .reduce(|| SimulationResult::new(entrants), SimulationResult::merge)
}

/// Pick a rod, biased toward the low rods the way real scoring is.
fn pick_rod(rng: &mut StdRng) -> usize {
    match rng.gen_range(0..10) {
        0..=6 => 0,
        7..=8 => 1,
        _ => 2,
    }
}

/// Play one series: several games closed by shaking, then a confirmed end.
pub fn run_series(params: &SimulationParams, seed: u64) -> SimulationResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = MemoryStore::new();
    let mut result = SimulationResult::new(params.match_mode.players_count());
    result.num_series = 1;

    let mut controller = MatchController::new(ModeSwitchGate::default())
        .with_game_mode(params.game_mode)
        .with_score_display(params.score_display);

    // Synthetic clock: 100ms between gestures.
    let t0 = Instant::now();
    let mut tick: u64 = 0;
    let mut now = || {
        tick += 1;
        t0 + Duration::from_millis(tick * 100)
    };

    controller.apply(MatchEvent::SelectMatchMode { mode: params.match_mode }, now());
    let entrants = params.match_mode.players_count();

    for game in 0..params.games_per_series {
        let mut moves = 0;
        let winner = loop {
            let scores = controller.scores();
            if let Some(w) = determine_winner(&scores, controller.game_mode()) {
                break Some(w);
            }
            if moves >= params.max_moves_per_game {
                break None;
            }
            moves += 1;

            if rng.gen_bool(params.toggle_probability) {
                let fx = controller.apply(MatchEvent::ToggleMode, now());
                result.mode_switches += fx.len();
                continue;
            }

            let entrant = rng.gen_range(0..entrants);
            let rod = pick_rod(&mut rng);
            let before_rods = controller.rods()[entrant];
            let current = before_rods.get(rod);
            let count = (current + rng.gen_range(1..=4)).min(ROD_CAPACITY);

            let multipliers = controller.game_mode().multipliers();
            let before = compute_score(&before_rods, &multipliers);
            let effects = controller.apply(MatchEvent::SetBeads { entrant, rod, count }, now());
            let after_rods = controller.rods()[entrant];
            let after = compute_score(&after_rods, &multipliers);

            if after_rods.values().iter().any(|&v| v > ROD_CAPACITY) {
                result.violations.push(format!("seed {seed} game {game}: rod over capacity {:?}", after_rods));
            }

            let mut discarded = 0;
            for effect in &effects {
                if let MatchEffect::Carried { outcome, .. } = effect {
                    result.carries += 1;
                    discarded += outcome.discarded;
                }
            }
            result.discarded_beads += discarded as u64;

            let added = (count - current) as u32 * multipliers[rod];
            let expected = before + added - discarded * multipliers[ROD_COUNT - 1];
            if after != expected {
                result.violations.push(format!(
                    "seed {seed} game {game}: score {before} + {added} became {after}, expected {expected}"
                ));
            }
        };

        result.num_games += 1;
        result.moves_per_game.push(moves);
        match winner {
            Some(w) => result.wins[w] += 1,
            None => result.no_winner += 1,
        }

        controller.apply(MatchEvent::Shake, now());
        if controller.rods().iter().any(|r| !r.is_empty()) {
            result.violations.push(format!("seed {seed} game {game}: shake left beads on the board"));
        }
    }

    controller.apply(MatchEvent::RequestEndGame, now());
    for effect in controller.apply(MatchEvent::ConfirmEndGame, now()) {
        if let MatchEffect::RecordHistory(entry) = effect {
            match HistoryRepository::new(&mut store).append(entry) {
                Ok(()) => result.history_entries += 1,
                Err(e) => result.violations.push(format!("seed {seed}: history write failed: {e}")),
            }
        }
    }
    if controller.phase() != MatchPhase::Active || controller.team_wins().iter().any(|&w| w != 0) {
        result.violations.push(format!("seed {seed}: match did not reset after ending"));
    }

    result
}
