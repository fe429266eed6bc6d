//! Persisted match history: one JSON list under a single key, read and
//! rewritten whole on every change.

use uuid::Uuid;

use super::KeyValueStore;
use crate::engine::records::HistoryEntry;
use crate::error::StorageError;

pub const HISTORY_KEY: &str = "gameHistory";

/// Decode a stored history blob. Empty or malformed data yields an empty list.
pub fn decode_history(raw: &str) -> Vec<HistoryEntry> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable game history");
            Vec::new()
        }
    }
}

/// Current history in `store`, oldest first.
pub fn load_history<S: KeyValueStore + ?Sized>(store: &S) -> Vec<HistoryEntry> {
    store
        .get(HISTORY_KEY)
        .map(|raw| decode_history(&raw))
        .unwrap_or_default()
}

pub fn encode_history(entries: &[HistoryEntry]) -> Result<String, StorageError> {
    serde_json::to_string(entries).map_err(|source| StorageError::Serialize {
        key: HISTORY_KEY.to_string(),
        source,
    })
}

pub struct HistoryRepository<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> HistoryRepository<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Vec<HistoryEntry> {
        load_history(&*self.store)
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        let raw = encode_history(entries)?;
        self.store.set(HISTORY_KEY, raw)
    }

    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut entries = self.load();
        let id = entry.id;
        entries.push(entry);
        self.save(&entries)?;
        tracing::info!(%id, total = entries.len(), "history entry saved");
        Ok(())
    }

    /// Remove the entry with `id`, keeping the rest in order.
    /// Returns whether anything was removed.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let entries = self.load();
        let before = entries.len();
        let remaining: Vec<HistoryEntry> = entries.into_iter().filter(|e| e.id != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.save(&remaining)?;
        tracing::info!(%id, remaining = remaining.len(), "history entry deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::models::{GameMode, MatchMode, ScoreDisplayMode};
    use crate::storage::MemoryStore;

    fn entry(scores: Vec<u32>) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            date: chrono::Utc::now(),
            match_mode: MatchMode::Pairs2,
            game_mode: GameMode::OneOOne,
            score_display_mode: ScoreDisplayMode::PerTeam,
            scores,
            names: None,
            winner: None,
            total_wins: None,
            game_sessions: None,
        }
    }

    #[test]
    fn test_missing_and_malformed_decode_to_empty() {
        assert!(decode_history("").is_empty());
        assert!(decode_history("{not json").is_empty());
        assert!(decode_history("{\"a\": 1}").is_empty());

        let mut store = MemoryStore::new();
        assert!(HistoryRepository::new(&mut store).load().is_empty());
        store.set(HISTORY_KEY, "garbage".into()).unwrap();
        assert!(HistoryRepository::new(&mut store).load().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = MemoryStore::new();
        let mut repo = HistoryRepository::new(&mut store);
        repo.append(entry(vec![1, 2])).unwrap();
        repo.append(entry(vec![3, 4])).unwrap();
        let loaded = repo.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].scores, vec![1, 2]);
        assert_eq!(loaded[1].scores, vec![3, 4]);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut store = MemoryStore::new();
        let mut repo = HistoryRepository::new(&mut store);
        let entries: Vec<HistoryEntry> = (0..4).map(|i| entry(vec![i, i])).collect();
        for e in &entries {
            repo.append(e.clone()).unwrap();
        }

        assert!(repo.delete(entries[1].id).unwrap());
        let left = repo.load();
        assert_eq!(left, vec![entries[0].clone(), entries[2].clone(), entries[3].clone()]);

        assert!(!repo.delete(Uuid::new_v4()).unwrap());
        assert_eq!(repo.load().len(), 3);
    }

    #[test]
    fn test_append_after_corruption_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{\"broken\":".into()).unwrap();
        let mut repo = HistoryRepository::new(&mut store);
        repo.append(entry(vec![7, 0])).unwrap();
        assert_eq!(repo.load().len(), 1);
    }
}
