use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{load_list, save_list, KeyValueStore};
use crate::model::{ClueDevice, ClueRequest, Difficulty};

pub const PRESETS_KEY: &str = "clue_presets";

/// Named bundle of generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    pub setter: String,
    pub clue_type: ClueDevice,
    pub theme: String,
    pub is_toughie: bool,
}

impl Preset {
    /// Copy the preset's settings onto a request.
    pub fn apply(&self, request: &mut ClueRequest) {
        request.setter = Some(self.setter.clone());
        request.device = Some(self.clue_type);
        request.theme = Some(self.theme.clone());
        if self.is_toughie {
            request.difficulty = Difficulty::Hard;
        }
    }
}

fn example_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Witty & Modern (Paul)".to_string(),
            setter: "Paul".to_string(),
            clue_type: ClueDevice::Any,
            theme: "None".to_string(),
            is_toughie: false,
        },
        Preset {
            name: "Beginner Friendly (Rufus)".to_string(),
            setter: "Rufus".to_string(),
            clue_type: ClueDevice::DoubleDefinition,
            theme: "None".to_string(),
            is_toughie: false,
        },
        Preset {
            name: "Classic & Precise (Ximenes)".to_string(),
            setter: "Ximenes".to_string(),
            clue_type: ClueDevice::Charade,
            theme: "None".to_string(),
            is_toughie: true,
        },
    ]
}

pub struct PresetRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> PresetRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Preset>> {
        load_list(self.store, PRESETS_KEY, example_presets)
    }

    pub fn find(&self, name: &str) -> Result<Option<Preset>> {
        Ok(self.list()?.into_iter().find(|p| p.name == name))
    }

    /// Replace the preset with the same name in place, or append.
    pub fn save(&self, preset: Preset) -> Result<()> {
        let mut presets = self.list()?;
        match presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => presets.push(preset),
        }
        save_list(self.store, PRESETS_KEY, &presets)
    }

    /// Returns whether a preset was removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let mut presets = self.list()?;
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            return Ok(false);
        }
        save_list(self.store, PRESETS_KEY, &presets)?;
        Ok(true)
    }
}
