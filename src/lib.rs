//! Score engine for a domino scoring abacus: rod scoring, carries between
//! rods, win detection, match sequencing and persisted history.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod storage;

pub use app::{AbacusApp, AppNotice};
pub use engine::controller::{EntrantView, MatchController, MatchEvent, MatchPhase};
pub use engine::models::{GameMode, MatchMode, RodSet, ScoreDisplayMode};
pub use error::StorageError;
