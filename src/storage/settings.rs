//! Persisted scalar settings. Each key is read, defaulted and written on its
//! own; an unknown tag reads as that key's default.

use super::KeyValueStore;
use crate::engine::models::{AbacusStyle, Language, MatchMode, ScoreDisplayMode};
use crate::error::StorageError;

pub const MATCH_MODE_KEY: &str = "matchMode";
pub const SCORE_DISPLAY_KEY: &str = "scoreDisplayMode";
pub const STYLE_KEY: &str = "abacusStyle";
pub const LANGUAGE_KEY: &str = "appLanguage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// `None` until the player picks a match layout.
    pub match_mode: Option<MatchMode>,
    pub score_display: ScoreDisplayMode,
    pub style: AbacusStyle,
    pub language: Language,
}

pub struct SettingsRepository<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> SettingsRepository<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn read<T>(&self, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.store.get(key)?;
        let parsed = parse(&raw);
        if parsed.is_none() && !raw.is_empty() {
            tracing::warn!(key, value = %raw, "unknown setting value, using default");
        }
        parsed
    }

    pub fn load(&self) -> Settings {
        Settings {
            match_mode: self.read(MATCH_MODE_KEY, MatchMode::from_tag),
            score_display: self
                .read(SCORE_DISPLAY_KEY, ScoreDisplayMode::from_tag)
                .unwrap_or_default(),
            style: self.read(STYLE_KEY, AbacusStyle::from_tag).unwrap_or_default(),
            language: self.read(LANGUAGE_KEY, Language::from_tag).unwrap_or_default(),
        }
    }

    pub fn save_match_mode(&mut self, mode: Option<MatchMode>) -> Result<(), StorageError> {
        match mode {
            Some(m) => self.store.set(MATCH_MODE_KEY, m.tag().to_string()),
            None => self.store.remove(MATCH_MODE_KEY),
        }
    }

    pub fn save_score_display(&mut self, display: ScoreDisplayMode) -> Result<(), StorageError> {
        self.store.set(SCORE_DISPLAY_KEY, display.tag().to_string())
    }

    pub fn save_style(&mut self, style: AbacusStyle) -> Result<(), StorageError> {
        self.store.set(STYLE_KEY, style.tag().to_string())
    }

    pub fn save_language(&mut self, language: Language) -> Result<(), StorageError> {
        self.store.set(LANGUAGE_KEY, language.tag().to_string())
    }
}
