use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{load_list, save_list, KeyValueStore};
use crate::model::Clue;
use crate::util::now_millis;

pub const SAVED_KEY: &str = "saved_clues";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedClue {
    pub id: u64,
    pub clue: String,
    pub explanation: String,
    pub answer: String,
    pub saved_at: u64,
}

/// Clues the user chose to keep, in the order they were saved. Never seeded.
pub struct SavedClueRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SavedClueRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<SavedClue>> {
        load_list(self.store, SAVED_KEY, Vec::new)
    }

    /// Save a clue. Saving the same clue text twice returns the existing entry.
    pub fn save(&self, answer: &str, clue: &Clue) -> Result<SavedClue> {
        let mut saved = self.list()?;
        if let Some(existing) = saved.iter().find(|s| s.clue == clue.clue) {
            return Ok(existing.clone());
        }

        let now = now_millis();
        let id = saved
            .iter()
            .map(|s| s.id.saturating_add(1))
            .max()
            .map_or(now, |next| next.max(now));
        let entry = SavedClue {
            id,
            clue: clue.clue.clone(),
            explanation: clue.explanation.clone(),
            answer: answer.to_string(),
            saved_at: now,
        };
        saved.push(entry.clone());
        save_list(self.store, SAVED_KEY, &saved)?;
        Ok(entry)
    }

    pub fn delete(&self, id: u64) -> Result<bool> {
        let mut saved = self.list()?;
        let before = saved.len();
        saved.retain(|s| s.id != id);
        if saved.len() == before {
            return Ok(false);
        }
        save_list(self.store, SAVED_KEY, &saved)?;
        Ok(true)
    }
}
