use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{load_list, save_list, KeyValueStore};
use crate::model::ClueDevice;
use crate::util::now_millis;

pub const HISTORY_KEY: &str = "clue_history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub clue: String,
    pub answer: String,
    pub definition: String,
    pub clue_type: ClueDevice,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// A history entry before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub clue: String,
    pub answer: String,
    pub definition: String,
    pub clue_type: ClueDevice,
    pub setter: Option<String>,
    pub theme: Option<String>,
}

fn example_entries() -> Vec<HistoryEntry> {
    let now = now_millis();
    let examples = [
        (
            "Silent rearrangement to pay attention (6)",
            "LISTEN",
            "Pay attention",
            ClueDevice::Anagram,
            "Araucaria",
        ),
        (
            "Vehicle's companion is a floor covering (6)",
            "CARPET",
            "Floor covering",
            ClueDevice::Charade,
            "Rufus",
        ),
        (
            "Royal Academician in rubbish container provides mind (5)",
            "BRAIN",
            "Mind",
            ClueDevice::Container,
            "Ximenes",
        ),
        (
            "A game to start a fire (5)",
            "MATCH",
            "Game or light",
            ClueDevice::DoubleDefinition,
            "Pasquale",
        ),
        (
            "Reverend's melted butter becomes a quiet complaint that's been struck (6,6)",
            "BELTED MUTTER",
            "Struck quiet complaint",
            ClueDevice::Spoonerism,
            "Bunthorne",
        ),
    ];

    examples
        .iter()
        .enumerate()
        .map(|(i, (clue, answer, definition, clue_type, setter))| {
            let stamp = now.saturating_sub(i as u64);
            HistoryEntry {
                id: stamp,
                clue: clue.to_string(),
                answer: answer.to_string(),
                definition: definition.to_string(),
                clue_type: *clue_type,
                timestamp: stamp,
                setter: Some(setter.to_string()),
                theme: None,
            }
        })
        .collect()
}

/// Newest-first list of generated clues.
pub struct HistoryRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> HistoryRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        load_list(self.store, HISTORY_KEY, example_entries)
    }

    /// Prepend an entry. Ids are unique and strictly increasing.
    pub fn add(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        let mut history = self.list()?;
        let now = now_millis();
        let id = history
            .iter()
            .map(|e| e.id.saturating_add(1))
            .max()
            .map_or(now, |next| next.max(now));

        let entry = HistoryEntry {
            id,
            clue: entry.clue,
            answer: entry.answer,
            definition: entry.definition,
            clue_type: entry.clue_type,
            timestamp: now,
            setter: entry.setter,
            theme: entry.theme,
        };
        history.insert(0, entry.clone());
        save_list(self.store, HISTORY_KEY, &history)?;
        Ok(entry)
    }

    pub fn clear(&self) -> Result<()> {
        info!("Clearing clue history");
        // An empty list, not a removed key, so the examples are not seeded again
        save_list::<HistoryEntry>(self.store, HISTORY_KEY, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_entry(clue: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            clue: clue.to_string(),
            answer: "LISTEN".to_string(),
            definition: "Hear".to_string(),
            clue_type: ClueDevice::Anagram,
            setter: None,
            theme: Some("Music".to_string()),
        }
    }

    #[test]
    fn test_first_load_seeds_examples() {
        let store = MemoryStore::new();
        let history = HistoryRepository::new(&store).list().unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].answer, "LISTEN");
        // newest first
        assert!(history.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_add_prepends_with_unique_ids() {
        let store = MemoryStore::new();
        let repo = HistoryRepository::new(&store);
        let a = repo.add(new_entry("first")).unwrap();
        let b = repo.add(new_entry("second")).unwrap();
        assert!(b.id > a.id);

        let history = repo.list().unwrap();
        assert_eq!(history[0].clue, "second");
        assert_eq!(history[1].clue, "first");
        assert_eq!(history.len(), 7);
    }

    #[test]
    fn test_clear_does_not_reseed() {
        let store = MemoryStore::new();
        let repo = HistoryRepository::new(&store);
        repo.list().unwrap();
        repo.clear().unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_entries_use_camel_case_fields() {
        let store = MemoryStore::new();
        let repo = HistoryRepository::new(&store);
        repo.clear().unwrap();
        repo.add(new_entry("x")).unwrap();
        let raw = store.get(HISTORY_KEY).unwrap().unwrap();
        assert!(raw.contains("\"clueType\": \"ANAGRAM\""));
        assert!(!raw.contains("\"setter\""));
    }

    #[test]
    fn test_add_after_max_id_does_not_overflow() {
        let store = MemoryStore::new();
        store
            .set(
                HISTORY_KEY,
                &format!(
                    r#"[{{"id": {}, "clue": "Old (3)", "answer": "OLD", "definition": "Aged", "clueType": "ANAGRAM", "timestamp": 0}}]"#,
                    u64::MAX
                ),
            )
            .unwrap();

        let repo = HistoryRepository::new(&store);
        let entry = repo.add(new_entry("after")).unwrap();
        assert_eq!(entry.id, u64::MAX);
        assert_eq!(repo.list().unwrap()[0].clue, "after");
    }
}
