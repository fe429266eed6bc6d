//! Finished-game records: per-game session snapshots and persisted history
//! entries. The serialized field names are the stored format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{GameMode, MatchMode, ScoreDisplayMode};
use super::winner::series_leaders;

/// One game inside a multi-game series, captured when the board is shaken clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub scores: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<usize>,
}

impl GameSession {
    pub fn new(scores: Vec<u32>, winner: Option<usize>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            scores,
            winner,
        }
    }
}

/// A finished match as written to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub match_mode: MatchMode,
    pub game_mode: GameMode,
    pub score_display_mode: ScoreDisplayMode,
    pub scores: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_wins: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_sessions: Option<Vec<GameSession>>,
}

impl HistoryEntry {
    /// Custom name for an entrant, if one was recorded and is not blank.
    pub fn display_name(&self, index: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }

    /// Recorded name, or the default label key for that seat.
    pub fn label(&self, index: usize) -> &str {
        self.display_name(index)
            .unwrap_or_else(|| self.match_mode.default_label_key(index))
    }

    /// Entrants holding the most series wins (empty when nobody won a game).
    pub fn series_leaders(&self) -> Vec<usize> {
        self.total_wins
            .as_deref()
            .map(series_leaders)
            .unwrap_or_default()
    }

    pub fn wins_for(&self, index: usize) -> u32 {
        self.total_wins
            .as_ref()
            .and_then(|w| w.get(index).copied())
            .unwrap_or(0)
    }
}
