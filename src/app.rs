//! Application facade: owns the store, the persisted settings and the match
//! controller, and carries out the controller's effects.

use std::time::Instant;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::engine::controller::{MatchController, MatchEffect, MatchEvent};
use crate::engine::debounce::ModeSwitchGate;
use crate::engine::models::{AbacusStyle, Language};
use crate::engine::records::HistoryEntry;
use crate::error::StorageError;
use crate::storage::history::{load_history, HistoryRepository};
use crate::storage::settings::{Settings, SettingsRepository, MATCH_MODE_KEY, SCORE_DISPLAY_KEY};
use crate::storage::KeyValueStore;

/// Non-fatal problems the UI may want to surface. The match state has
/// already advanced when one of these is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppNotice {
    HistoryNotSaved { entry_id: Uuid, reason: String },
    SettingNotSaved { key: &'static str, reason: String },
}

pub struct AbacusApp<S: KeyValueStore> {
    store: S,
    settings: Settings,
    controller: MatchController,
}

impl<S: KeyValueStore> AbacusApp<S> {
    /// Load settings from `store` and resume the stored match configuration.
    pub fn open(mut store: S, config: &AppConfig) -> Self {
        let settings = SettingsRepository::new(&mut store).load();
        let controller = MatchController::new(ModeSwitchGate::new(config.mode_switch_cooldown()))
            .with_game_mode(config.default_game_mode)
            .with_score_display(settings.score_display)
            .restored(settings.match_mode);
        tracing::info!(
            match_mode = ?settings.match_mode,
            game_mode = config.default_game_mode.tag(),
            "app opened"
        );
        Self {
            store,
            settings,
            controller,
        }
    }

    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Feed one UI event through the controller and persist what it produced.
    pub fn handle(&mut self, event: MatchEvent, now: Instant) -> Vec<AppNotice> {
        let effects = self.controller.apply(event, now);
        let mut notices = Vec::new();

        for effect in effects {
            match effect {
                MatchEffect::MatchConfigured(mode) => {
                    self.settings.match_mode = Some(mode);
                    if let Err(e) = SettingsRepository::new(&mut self.store).save_match_mode(Some(mode)) {
                        notices.push(setting_not_saved(MATCH_MODE_KEY, e));
                    }
                }
                MatchEffect::ScoreDisplayChanged(display) => {
                    self.settings.score_display = display;
                    if let Err(e) = SettingsRepository::new(&mut self.store).save_score_display(display) {
                        notices.push(setting_not_saved(SCORE_DISPLAY_KEY, e));
                    }
                }
                MatchEffect::RecordHistory(entry) => {
                    let entry_id = entry.id;
                    if let Err(e) = HistoryRepository::new(&mut self.store).append(entry) {
                        tracing::warn!(%entry_id, error = %e, "history entry not saved");
                        notices.push(AppNotice::HistoryNotSaved {
                            entry_id,
                            reason: e.to_string(),
                        });
                    }
                }
                MatchEffect::ModeSwitched(_)
                | MatchEffect::Carried { .. }
                | MatchEffect::GameRecorded(_) => {}
            }
        }
        notices
    }

    /// Drop the stored match configuration; the next launch prompts again.
    pub fn clear_match_mode(&mut self) -> Result<(), StorageError> {
        self.controller.clear_configuration();
        self.settings.match_mode = None;
        SettingsRepository::new(&mut self.store).save_match_mode(None)
    }

    pub fn set_style(&mut self, style: AbacusStyle) -> Result<(), StorageError> {
        SettingsRepository::new(&mut self.store).save_style(style)?;
        self.settings.style = style;
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), StorageError> {
        SettingsRepository::new(&mut self.store).save_language(language)?;
        self.settings.language = language;
        Ok(())
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        load_history(&self.store)
    }

    pub fn delete_history(&mut self, id: Uuid) -> Result<bool, StorageError> {
        HistoryRepository::new(&mut self.store).delete(id)
    }
}

fn setting_not_saved(key: &'static str, e: StorageError) -> AppNotice {
    tracing::warn!(key, error = %e, "setting not saved");
    AppNotice::SettingNotSaved {
        key,
        reason: e.to_string(),
    }
}
