//! File-backed store behaviour: round trips across reopen, corrupt files,
//! and history blobs that no longer decode.

use std::fs;
use std::time::Instant;

use abacus_score_engine::app::AbacusApp;
use abacus_score_engine::config::AppConfig;
use abacus_score_engine::engine::models::{AbacusStyle, Language};
use abacus_score_engine::storage::history::{load_history, HISTORY_KEY};
use abacus_score_engine::storage::settings::{SettingsRepository, MATCH_MODE_KEY, STYLE_KEY};
use abacus_score_engine::storage::{FileStore, KeyValueStore};
use abacus_score_engine::{MatchEvent, MatchMode, MatchPhase, ScoreDisplayMode};

#[test]
fn missing_file_opens_empty_and_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let mut store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("anything"), None);
    assert!(!path.exists());

    store.set("k", "v".into()).unwrap();
    assert!(path.exists());
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("k").as_deref(), Some("v"));
}

#[test]
fn empty_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, "  \n").unwrap();
    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(HISTORY_KEY), None);
}

#[test]
fn corrupt_file_opens_empty_and_is_kept_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let truncated = r#"{"gameHistory": "[]", "matchMode": "pai"#;
    fs::write(&path, truncated).unwrap();

    let mut store = FileStore::open(&path).unwrap();
    assert!(load_history(&store).is_empty());
    assert_eq!(store.get(MATCH_MODE_KEY), None);
    let aside = dir.path().join("store.json.corrupt");
    assert_eq!(fs::read_to_string(&aside).unwrap(), truncated);

    store.set("k", "v".into()).unwrap();
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("k").as_deref(), Some("v"));
}

#[test]
fn app_opens_over_corrupt_store_unconfigured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, "[1, 2,").unwrap();
    let app = AbacusApp::open(FileStore::open(&path).unwrap(), &AppConfig::default());
    assert_eq!(app.controller().phase(), MatchPhase::Unconfigured);
    assert!(app.history().is_empty());
}

#[test]
fn remove_deletes_key_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut store = FileStore::open(&path).unwrap();
    store.set("a", "1".into()).unwrap();
    store.set("b", "2".into()).unwrap();
    store.remove("a").unwrap();
    store.remove("never-set").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("a"), None);
    assert_eq!(reopened.get("b").as_deref(), Some("2"));
}

#[test]
fn settings_and_history_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let config = AppConfig::default();

    {
        let store = FileStore::open(&path).unwrap();
        let mut app = AbacusApp::open(store, &config);
        app.handle(MatchEvent::SetScoreDisplay { display: ScoreDisplayMode::SharedBoard }, Instant::now());
        app.handle(MatchEvent::SelectMatchMode { mode: MatchMode::Pairs2 }, Instant::now());
        app.set_style(AbacusStyle::Neon).unwrap();
        app.set_language(Language::Az).unwrap();
        app.handle(MatchEvent::SetBeads { entrant: 0, rod: 2, count: 4 }, Instant::now());
        app.handle(MatchEvent::Shake, Instant::now());
        app.handle(MatchEvent::RequestEndGame, Instant::now());
        assert!(app.handle(MatchEvent::ConfirmEndGame, Instant::now()).is_empty());
    }

    let store = FileStore::open(&path).unwrap();
    let app = AbacusApp::open(store, &config);
    let settings = app.settings();
    assert_eq!(settings.match_mode, Some(MatchMode::Pairs2));
    assert_eq!(settings.score_display, ScoreDisplayMode::SharedBoard);
    assert_eq!(settings.style, AbacusStyle::Neon);
    assert_eq!(settings.language, Language::Az);
    assert_eq!(app.controller().phase(), MatchPhase::Active);

    let history = app.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total_wins, Some(vec![1, 0]));
    assert_eq!(history[0].scores, vec![0, 0]);
    assert_eq!(history[0].winner, None);
    let sessions = history[0].game_sessions.as_ref().unwrap();
    assert_eq!(sessions[0].scores, vec![400, 0]);
}

#[test]
fn stored_history_uses_camel_case_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut app = AbacusApp::open(FileStore::open(&path).unwrap(), &AppConfig::default());
    app.handle(MatchEvent::SelectMatchMode { mode: MatchMode::FreeForAll4 }, Instant::now());
    app.handle(MatchEvent::RequestEndGame, Instant::now());
    app.handle(MatchEvent::ConfirmEndGame, Instant::now());

    let raw = FileStore::open(&path).unwrap().get(HISTORY_KEY).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json[0];
    assert_eq!(entry["matchMode"], "freeForAll4");
    assert_eq!(entry["gameMode"], "365");
    assert_eq!(entry["scoreDisplayMode"], "perTeam");
    assert!(entry.get("names").is_none());
    assert!(entry.get("totalWins").is_none());
}

#[test]
fn unreadable_history_reads_as_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut store = FileStore::open(&path).unwrap();
    store.set(HISTORY_KEY, "{\"oops\": true}".into()).unwrap();
    assert!(load_history(&store).is_empty());

    let mut app = AbacusApp::open(store, &AppConfig::default());
    app.handle(MatchEvent::SelectMatchMode { mode: MatchMode::Pairs2 }, Instant::now());
    app.handle(MatchEvent::RequestEndGame, Instant::now());
    app.handle(MatchEvent::ConfirmEndGame, Instant::now());
    assert_eq!(app.history().len(), 1);
}

#[test]
fn unknown_setting_values_fall_back_per_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(
        &path,
        r#"{"matchMode": "sixPlayers", "abacusStyle": "stone", "appLanguage": "xx"}"#,
    )
    .unwrap();

    let mut store = FileStore::open(&path).unwrap();
    let settings = SettingsRepository::new(&mut store).load();
    assert_eq!(settings.match_mode, None);
    assert_eq!(settings.style, AbacusStyle::Stone);
    assert_eq!(settings.language, Language::Ru);
    assert_eq!(store.get(STYLE_KEY).as_deref(), Some("stone"));
}
