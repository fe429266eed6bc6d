//! Match controller: the state machine that sequences bead edits, carries,
//! resets, series bookkeeping and end-of-match history.
//!
//! The controller is a reducer. `apply` takes an event and returns the effects
//! a host must act on (persist a setting, write a history entry). It does no
//! I/O of its own.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::carry::{perform_carry, CarryOutcome};
use super::debounce::ModeSwitchGate;
use super::models::*;
use super::records::{GameSession, HistoryEntry};
use super::scoring::entrant_scores;
use super::winner::{determine_winner, live_leader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// No match configuration chosen; the host must prompt for one.
    Unconfigured,
    Active,
    /// Waiting for the player to confirm or cancel ending the match.
    EndConfirmPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Input events, as delivered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    SelectMatchMode { mode: MatchMode },
    /// A bead drag was released leaving `count` beads on the rod.
    SetBeads { entrant: usize, rod: usize, count: u8 },
    Focus { entrant: usize },
    ToggleMode,
    Swipe { direction: SwipeDirection },
    ResetFocused,
    ResetAll,
    Shake,
    RequestEndGame,
    ConfirmEndGame,
    CancelEndGame,
    Rename { entrant: usize, name: String },
    /// Hand-corrected series tally for one team on the shared board.
    SetWins { entrant: usize, count: u32 },
    SetScoreDisplay { display: ScoreDisplayMode },
}

/// Side effects for the host to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEffect {
    MatchConfigured(MatchMode),
    ScoreDisplayChanged(ScoreDisplayMode),
    ModeSwitched(GameMode),
    Carried {
        entrant: usize,
        rod: usize,
        outcome: CarryOutcome,
    },
    GameRecorded(GameSession),
    RecordHistory(HistoryEntry),
}

/// What the UI needs to render one entrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrantView {
    pub index: usize,
    pub rods: [u8; ROD_COUNT],
    pub score: u32,
    pub highlighted: bool,
    pub wins: u32,
    pub custom_name: Option<String>,
    pub label_key: &'static str,
}

#[derive(Debug, Clone)]
pub struct MatchController {
    phase: MatchPhase,
    match_mode: Option<MatchMode>,
    game_mode: GameMode,
    score_display: ScoreDisplayMode,
    rods: Vec<RodSet>,
    team_wins: Vec<u32>,
    custom_names: Vec<String>,
    sessions: Vec<GameSession>,
    focused: usize,
    gate: ModeSwitchGate,
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new(ModeSwitchGate::default())
    }
}

impl MatchController {
    pub fn new(gate: ModeSwitchGate) -> Self {
        Self {
            phase: MatchPhase::Unconfigured,
            match_mode: None,
            game_mode: GameMode::default(),
            score_display: ScoreDisplayMode::default(),
            rods: Vec::new(),
            team_wins: Vec::new(),
            custom_names: Vec::new(),
            sessions: Vec::new(),
            focused: 0,
            gate,
        }
    }

    pub fn with_game_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }

    pub fn with_score_display(mut self, display: ScoreDisplayMode) -> Self {
        self.score_display = display;
        self
    }

    /// Resume with a previously persisted match configuration, if any.
    pub fn restored(mut self, match_mode: Option<MatchMode>) -> Self {
        if let Some(mode) = match_mode {
            self.configure(mode);
        }
        self
    }

    // -- queries ------------------------------------------------------------

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn match_mode(&self) -> Option<MatchMode> {
        self.match_mode
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn score_display(&self) -> ScoreDisplayMode {
        self.score_display
    }

    pub fn rods(&self) -> &[RodSet] {
        &self.rods
    }

    pub fn team_wins(&self) -> &[u32] {
        &self.team_wins
    }

    pub fn sessions(&self) -> &[GameSession] {
        &self.sessions
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn scores(&self) -> Vec<u32> {
        entrant_scores(&self.rods, self.game_mode)
    }

    pub fn custom_name(&self, index: usize) -> Option<&str> {
        self.custom_names
            .get(index)
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }

    pub fn entrant_views(&self) -> Vec<EntrantView> {
        let scores = self.scores();
        let leader = live_leader(&scores, self.game_mode);
        let match_mode = self.match_mode.unwrap_or(MatchMode::Pairs2);
        self.rods
            .iter()
            .zip(&scores)
            .enumerate()
            .map(|(index, (rods, &score))| EntrantView {
                index,
                rods: rods.values(),
                score,
                highlighted: leader == Some(index),
                wins: self.team_wins.get(index).copied().unwrap_or(0),
                custom_name: self.custom_name(index).map(str::to_string),
                label_key: match_mode.default_label_key(index),
            })
            .collect()
    }

    // -- reducer ------------------------------------------------------------

    pub fn apply(&mut self, event: MatchEvent, now: Instant) -> Vec<MatchEffect> {
        use MatchEvent::*;

        match (self.phase, event) {
            (_, SelectMatchMode { mode }) => self.select_match_mode(mode),
            (_, SetScoreDisplay { display }) => self.set_score_display(display),
            (MatchPhase::Unconfigured, event) => {
                tracing::debug!(?event, "ignoring event before a match is configured");
                Vec::new()
            }

            (MatchPhase::EndConfirmPending, ConfirmEndGame) => self.confirm_end_game(),
            (MatchPhase::EndConfirmPending, CancelEndGame) => {
                self.phase = MatchPhase::Active;
                Vec::new()
            }
            (MatchPhase::EndConfirmPending, Swipe { direction: SwipeDirection::Up }) => {
                if self.gate.is_cooling_down(now) {
                    tracing::debug!("swipe ignored during mode-switch cool-down");
                } else {
                    self.phase = MatchPhase::Active;
                }
                Vec::new()
            }
            (MatchPhase::EndConfirmPending, event) => {
                tracing::debug!(?event, "ignoring event while end-game confirmation is open");
                Vec::new()
            }

            (MatchPhase::Active, SetBeads { entrant, rod, count }) => self.set_beads(entrant, rod, count),
            (MatchPhase::Active, Focus { entrant }) => {
                self.focus(entrant);
                Vec::new()
            }
            (MatchPhase::Active, ToggleMode) => self.switch_mode(self.game_mode.toggled(), now),
            (MatchPhase::Active, Swipe { direction }) => self.swipe(direction, now),
            (MatchPhase::Active, ResetFocused) => {
                self.reset_focused();
                Vec::new()
            }
            (MatchPhase::Active, ResetAll) => {
                self.reset_all();
                Vec::new()
            }
            (MatchPhase::Active, Shake) => self.shake(),
            (MatchPhase::Active, RequestEndGame) => {
                self.phase = MatchPhase::EndConfirmPending;
                Vec::new()
            }
            (MatchPhase::Active, Rename { entrant, name }) => {
                self.rename(entrant, name);
                Vec::new()
            }
            (MatchPhase::Active, SetWins { entrant, count }) => {
                self.set_wins(entrant, count);
                Vec::new()
            }
            (MatchPhase::Active, event @ (ConfirmEndGame | CancelEndGame)) => {
                tracing::debug!(?event, "no end-game confirmation pending");
                Vec::new()
            }
        }
    }

    // -- transitions --------------------------------------------------------

    /// Size every per-entrant array for `mode` and start from a clean board.
    fn configure(&mut self, mode: MatchMode) {
        let count = mode.players_count();
        self.match_mode = Some(mode);
        self.rods = vec![RodSet::new(); count];
        self.team_wins = vec![0; count];
        self.sessions.clear();
        if self.focused >= count {
            self.focused = 0;
        }
        self.phase = MatchPhase::Active;
    }

    /// Forget the match configuration and return to the setup prompt.
    pub fn clear_configuration(&mut self) {
        self.phase = MatchPhase::Unconfigured;
        self.match_mode = None;
        self.rods.clear();
        self.team_wins.clear();
        self.sessions.clear();
        self.focused = 0;
    }

    pub fn select_match_mode(&mut self, mode: MatchMode) -> Vec<MatchEffect> {
        self.configure(mode);
        tracing::info!(match_mode = mode.tag(), entrants = mode.players_count(), "match configured");
        vec![MatchEffect::MatchConfigured(mode)]
    }

    pub fn set_score_display(&mut self, display: ScoreDisplayMode) -> Vec<MatchEffect> {
        if self.score_display == display {
            return Vec::new();
        }
        self.score_display = display;
        vec![MatchEffect::ScoreDisplayChanged(display)]
    }

    fn set_beads(&mut self, entrant: usize, rod: usize, count: u8) -> Vec<MatchEffect> {
        let multipliers = self.game_mode.multipliers();
        let Some(rods) = self.rods.get_mut(entrant) else {
            tracing::debug!(entrant, "bead edit for unknown entrant");
            return Vec::new();
        };
        if rod >= ROD_COUNT {
            tracing::debug!(entrant, rod, "bead edit for unknown rod");
            return Vec::new();
        }

        let previous = rods.get(rod);
        let count = count.min(ROD_CAPACITY);
        rods.set(rod, count);

        if count == ROD_CAPACITY && previous < ROD_CAPACITY {
            if let Some(outcome) = perform_carry(rods, &multipliers, rod) {
                if outcome.discarded > 0 {
                    tracing::debug!(entrant, discarded = outcome.discarded, "top rod full, carry clamped");
                }
                return vec![MatchEffect::Carried { entrant, rod, outcome }];
            }
        }
        Vec::new()
    }

    fn focus(&mut self, entrant: usize) {
        self.focused = if entrant < self.rods.len() { entrant } else { 0 };
    }

    /// Swipes of any direction are dropped while a mode switch cools down.
    fn swipe(&mut self, direction: SwipeDirection, now: Instant) -> Vec<MatchEffect> {
        if self.gate.is_cooling_down(now) {
            tracing::debug!(?direction, "swipe ignored during mode-switch cool-down");
            return Vec::new();
        }
        match (direction, self.game_mode) {
            (SwipeDirection::Down, _) => {
                self.phase = MatchPhase::EndConfirmPending;
                Vec::new()
            }
            (SwipeDirection::Left, GameMode::Phone365) => self.switch_mode(GameMode::OneOOne, now),
            (SwipeDirection::Right, GameMode::OneOOne) => self.switch_mode(GameMode::Phone365, now),
            _ => Vec::new(),
        }
    }

    /// Reinterpret the rods under another mode. Rod values are untouched.
    pub fn switch_mode(&mut self, target: GameMode, now: Instant) -> Vec<MatchEffect> {
        if target == self.game_mode {
            return Vec::new();
        }
        if !self.gate.try_begin(now) {
            tracing::debug!(target = target.tag(), "mode switch suppressed during cool-down");
            return Vec::new();
        }
        self.game_mode = target;
        tracing::info!(mode = target.tag(), "switched game mode");
        vec![MatchEffect::ModeSwitched(target)]
    }

    fn reset_focused(&mut self) {
        if let Some(rods) = self.rods.get_mut(self.focused) {
            rods.clear();
        }
    }

    fn reset_all(&mut self) {
        for rods in &mut self.rods {
            rods.clear();
        }
    }

    fn is_pairs(&self) -> bool {
        self.match_mode == Some(MatchMode::Pairs2)
    }

    /// Close one game of a series: score it, bank the win, clear the board.
    fn shake(&mut self) -> Vec<MatchEffect> {
        if self.rods.is_empty() {
            return Vec::new();
        }
        let scores = self.scores();
        let winner = determine_winner(&scores, self.game_mode);

        if let Some(w) = winner {
            if self.is_pairs() && self.score_display == ScoreDisplayMode::SharedBoard {
                if let Some(wins) = self.team_wins.get_mut(w) {
                    *wins += 1;
                }
            }
        }

        let mut effects = Vec::new();
        if self.is_pairs() {
            let session = GameSession::new(scores, winner);
            tracing::info!(?winner, games = self.sessions.len() + 1, "game recorded in series");
            self.sessions.push(session.clone());
            effects.push(MatchEffect::GameRecorded(session));
        }

        self.reset_all();
        effects
    }

    /// The shared board shows each team's wins as a bead rod the players can drag.
    fn set_wins(&mut self, entrant: usize, count: u32) {
        if !self.is_pairs() || self.score_display != ScoreDisplayMode::SharedBoard {
            tracing::debug!(entrant, "win tallies are only editable on the shared two-team board");
            return;
        }
        let Some(wins) = self.team_wins.get_mut(entrant) else {
            tracing::debug!(entrant, "win edit for unknown entrant");
            return;
        };
        *wins = count.min(ROD_CAPACITY as u32);
    }

    fn make_history_entry(&mut self, match_mode: MatchMode, winner: Option<usize>) -> HistoryEntry {
        let count = self.rods.len();
        let (names, total_wins, game_sessions) = if match_mode == MatchMode::Pairs2 {
            self.ensure_names_capacity();
            let names: Vec<String> = self.custom_names.iter().take(count).cloned().collect();
            let wins: Option<Vec<u32>> = (!self.team_wins.is_empty())
                .then(|| self.team_wins.iter().take(count).copied().collect());
            let sessions = (!self.sessions.is_empty()).then(|| self.sessions.clone());
            (Some(names), wins, sessions)
        } else {
            (None, None, None)
        };

        HistoryEntry {
            id: uuid::Uuid::new_v4(),
            date: chrono::Utc::now(),
            match_mode,
            game_mode: self.game_mode,
            score_display_mode: self.score_display,
            scores: self.scores(),
            names,
            winner,
            total_wins,
            game_sessions,
        }
    }

    /// End the match: emit its history entry and start over from zero.
    fn confirm_end_game(&mut self) -> Vec<MatchEffect> {
        self.phase = MatchPhase::Active;
        let Some(match_mode) = self.match_mode else {
            return Vec::new();
        };

        let winner = determine_winner(&self.scores(), self.game_mode);
        let entry = self.make_history_entry(match_mode, winner);
        tracing::info!(?winner, scores = ?entry.scores, "match finished");

        self.sessions.clear();
        self.reset_all();
        self.team_wins.iter_mut().for_each(|w| *w = 0);
        vec![MatchEffect::RecordHistory(entry)]
    }

    fn ensure_names_capacity(&mut self) {
        if self.custom_names.len() < self.rods.len() {
            self.custom_names.resize(self.rods.len(), String::new());
        }
    }

    fn rename(&mut self, entrant: usize, name: String) {
        if !self.is_pairs() || entrant >= self.rods.len() {
            tracing::debug!(entrant, "custom names are only kept for two-team matches");
            return;
        }
        self.ensure_names_capacity();
        self.custom_names[entrant] = name;
    }
}
