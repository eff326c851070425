//! Command handlers behind the `cluesmith` binary.

pub mod generate;
pub mod library;
pub mod lookup;

use anyhow::{Context as _, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::llm::factory;
use crate::model::Clue;
use crate::service::ClueService;
use crate::store::FileStore;

/// What every command needs: loaded config plus the global flags.
pub struct Context {
    pub config: Config,
    pub dry_run: bool,
}

impl Context {
    pub fn load(config_path: Option<String>, dry_run: bool) -> Result<Self> {
        if let Some(ref path) = config_path {
            info!("Config: {}", path);
        }
        let config = Config::load_with_path(config_path).context("failed to load config")?;
        Ok(Self { config, dry_run })
    }

    pub fn service(&self) -> Result<ClueService> {
        if self.dry_run {
            info!("Using mock LLM client");
        } else {
            info!(
                "Using {} LLM provider ({})",
                self.config.llm.provider, self.config.llm.model
            );
        }
        let client = factory::create_client(&self.config, self.dry_run)?;
        Ok(ClueService::new(client).with_policy(self.config.retry.policy()))
    }

    pub fn store(&self) -> FileStore {
        let dir = self.config.storage.resolve_data_dir();
        debug!("Data directory: {}", dir.display());
        FileStore::new(dir)
    }
}

pub(crate) fn print_clues(clues: &[Clue]) {
    for (i, clue) in clues.iter().enumerate() {
        println!("{}. {}", i + 1, clue.clue);
        println!("   {}", clue.explanation);
        if let Some(ref setter) = clue.setter {
            println!("   in the style of {}", setter);
        }
    }
}
