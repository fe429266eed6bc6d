//! Core engine data types: game modes, match configuration and rod sets.

use serde::{Deserialize, Serialize};

/// Rods per entrant, ordered low -> high significance.
pub const ROD_COUNT: usize = 3;

/// Beads per rod.
pub const ROD_CAPACITY: u8 = 10;

/// Per-rod value multipliers, paired with rod indices.
pub type Multipliers = [u32; ROD_COUNT];

/// Domino scoring variant. Determines rod multipliers and the win rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    #[serde(rename = "365")]
    Phone365,
    #[serde(rename = "101")]
    OneOOne,
}

/// Threshold a score must cross to be eligible for the win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRule {
    /// Strictly greater than the threshold.
    Above(u32),
    /// Greater than or equal to the threshold.
    AtLeast(u32),
}

impl WinRule {
    pub fn is_met(self, score: u32) -> bool {
        match self {
            WinRule::Above(t) => score > t,
            WinRule::AtLeast(t) => score >= t,
        }
    }
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Phone365, GameMode::OneOOne];

    pub fn multipliers(self) -> Multipliers {
        match self {
            GameMode::Phone365 => [5, 10, 100],
            GameMode::OneOOne => [1, 10, 100],
        }
    }

    pub fn win_rule(self) -> WinRule {
        match self {
            GameMode::Phone365 => WinRule::Above(365),
            GameMode::OneOOne => WinRule::AtLeast(101),
        }
    }

    pub fn toggled(self) -> GameMode {
        match self {
            GameMode::Phone365 => GameMode::OneOOne,
            GameMode::OneOOne => GameMode::Phone365,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            GameMode::Phone365 => "365",
            GameMode::OneOOne => "101",
        }
    }

    pub fn from_tag(tag: &str) -> Option<GameMode> {
        GameMode::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

/// Entrant layout for a match: two teams or four individual players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    Pairs2,
    FreeForAll4,
}

impl MatchMode {
    pub const ALL: [MatchMode; 2] = [MatchMode::Pairs2, MatchMode::FreeForAll4];

    pub fn players_count(self) -> usize {
        match self {
            MatchMode::Pairs2 => 2,
            MatchMode::FreeForAll4 => 4,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            MatchMode::Pairs2 => "pairs2",
            MatchMode::FreeForAll4 => "freeForAll4",
        }
    }

    pub fn from_tag(tag: &str) -> Option<MatchMode> {
        MatchMode::ALL.into_iter().find(|m| m.tag() == tag)
    }

    /// Localization key of the default entrant label.
    pub fn default_label_key(self, index: usize) -> &'static str {
        match self {
            MatchMode::Pairs2 => match index {
                1 => "team_2",
                _ => "team_1",
            },
            MatchMode::FreeForAll4 => match index {
                1 => "player_2",
                2 => "player_3",
                3 => "player_4",
                _ => "player_1",
            },
        }
    }
}

/// How scores are laid out on screen. Only affects win-counter bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ScoreDisplayMode {
    #[default]
    PerTeam,
    SharedBoard,
}

impl ScoreDisplayMode {
    pub const ALL: [ScoreDisplayMode; 2] = [ScoreDisplayMode::PerTeam, ScoreDisplayMode::SharedBoard];

    pub fn tag(self) -> &'static str {
        match self {
            ScoreDisplayMode::PerTeam => "perTeam",
            ScoreDisplayMode::SharedBoard => "sharedBoard",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ScoreDisplayMode> {
        ScoreDisplayMode::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

/// Visual theme tag. Persisted only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AbacusStyle {
    #[default]
    Classic,
    Stone,
    Neon,
    Wooden,
}

impl AbacusStyle {
    pub const ALL: [AbacusStyle; 4] = [
        AbacusStyle::Classic,
        AbacusStyle::Stone,
        AbacusStyle::Neon,
        AbacusStyle::Wooden,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            AbacusStyle::Classic => "classic",
            AbacusStyle::Stone => "stone",
            AbacusStyle::Neon => "neon",
            AbacusStyle::Wooden => "wooden",
        }
    }

    pub fn from_tag(tag: &str) -> Option<AbacusStyle> {
        AbacusStyle::ALL.into_iter().find(|s| s.tag() == tag)
    }
}

/// UI language tag. Persisted only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
    Az,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ru, Language::En, Language::Az];

    pub fn tag(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Az => "az",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.tag() == tag)
    }
}

/// Bead counts for one entrant, one per rod. Every value stays within
/// `0..=ROD_CAPACITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RodSet([u8; ROD_COUNT]);

impl RodSet {
    pub fn new() -> Self {
        Self([0; ROD_COUNT])
    }

    /// Build from raw counts, clamping each to capacity.
    pub fn from_values(values: [u8; ROD_COUNT]) -> Self {
        let mut rods = Self::new();
        for (i, v) in values.into_iter().enumerate() {
            rods.set(i, v);
        }
        rods
    }

    pub fn values(&self) -> [u8; ROD_COUNT] {
        self.0
    }

    pub fn get(&self, rod: usize) -> u8 {
        self.0[rod]
    }

    /// Set a rod, clamping to capacity. Out-of-range rods are ignored.
    pub fn set(&mut self, rod: usize, value: u8) {
        if let Some(slot) = self.0.get_mut(rod) {
            *slot = value.min(ROD_CAPACITY);
        }
    }

    pub fn clear(&mut self) {
        self.0 = [0; ROD_COUNT];
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }
}
