use anyhow::{bail, Result};
use clap::Subcommand;
use std::str::FromStr;
use tracing::info;

use super::Context;
use crate::model::ClueDevice;
use crate::store::{
    HistoryRepository, KeyValueStore, Preset, PresetRepository, SavedClueRepository,
};

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Show generated clues, newest first
    List {
        /// Only show the most recent N entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Delete all history
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum PresetCommand {
    /// Show saved presets
    List,
    /// Save a preset, replacing any with the same name
    Save {
        name: String,

        #[arg(long, default_value = "Paul")]
        setter: String,

        /// Cryptic device (default: any)
        #[arg(long, default_value = "ANY")]
        device: String,

        #[arg(long, default_value = "None")]
        theme: String,

        #[arg(long)]
        toughie: bool,
    },
    /// Delete a preset by name
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
pub enum SavedCommand {
    /// Show saved clues
    List,
    /// Delete a saved clue by id
    Delete { id: u64 },
}

pub fn run_history(ctx: &Context, command: HistoryCommand) -> Result<()> {
    history(&ctx.store(), command)
}

pub fn run_presets(ctx: &Context, command: PresetCommand) -> Result<()> {
    presets(&ctx.store(), command)
}

pub fn run_saved(ctx: &Context, command: SavedCommand) -> Result<()> {
    saved(&ctx.store(), command)
}

fn history(store: &dyn KeyValueStore, command: HistoryCommand) -> Result<()> {
    let repo = HistoryRepository::new(store);
    match command {
        HistoryCommand::List { limit } => {
            let entries = repo.list()?;
            if entries.is_empty() {
                println!("No history yet.");
            }
            for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}  [{}]", entry.clue, entry.answer);
                let mut details = vec![entry.clue_type.label()];
                if let Some(ref setter) = entry.setter {
                    details.push(setter.clone());
                }
                if let Some(ref theme) = entry.theme {
                    details.push(format!("theme: {}", theme));
                }
                println!("   {}", details.join(", "));
            }
        }
        HistoryCommand::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear history without --yes");
            }
            repo.clear()?;
            println!("History cleared.");
        }
    }
    Ok(())
}

fn presets(store: &dyn KeyValueStore, command: PresetCommand) -> Result<()> {
    let repo = PresetRepository::new(store);
    match command {
        PresetCommand::List => {
            for preset in repo.list()? {
                println!(
                    "{}: {}, {}, theme {}{}",
                    preset.name,
                    preset.setter,
                    preset.clue_type.label(),
                    preset.theme,
                    if preset.is_toughie { ", toughie" } else { "" }
                );
            }
        }
        PresetCommand::Save {
            name,
            setter,
            device,
            theme,
            toughie,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("Preset name cannot be empty");
            }
            info!("Saving preset: {}", name);
            repo.save(Preset {
                name: name.clone(),
                setter,
                clue_type: ClueDevice::from_str(&device)?,
                theme,
                is_toughie: toughie,
            })?;
            println!("Saved preset {:?}", name);
        }
        PresetCommand::Delete { name } => {
            if !repo.delete(&name)? {
                bail!("No preset named {:?}", name);
            }
            println!("Deleted preset {:?}", name);
        }
    }
    Ok(())
}

fn saved(store: &dyn KeyValueStore, command: SavedCommand) -> Result<()> {
    let repo = SavedClueRepository::new(store);
    match command {
        SavedCommand::List => {
            let clues = repo.list()?;
            if clues.is_empty() {
                println!("No saved clues.");
            }
            for clue in clues {
                println!("{}  {}  [{}]", clue.id, clue.clue, clue.answer);
                println!("   {}", clue.explanation);
            }
        }
        SavedCommand::Delete { id } => {
            if !repo.delete(id)? {
                bail!("No saved clue with id {}", id);
            }
            println!("Deleted saved clue {}", id);
        }
    }
    Ok(())
}
