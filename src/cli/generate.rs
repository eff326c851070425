use anyhow::{anyhow, Result};
use clap::Args;
use std::str::FromStr;
use tracing::info;

use super::{print_clues, Context};
use crate::model::{Clue, ClueDevice, ClueRequest, Difficulty, Persona};
use crate::store::{HistoryRepository, NewHistoryEntry, PresetRepository, SavedClueRepository};

/// Options shared by `generate` and `vary`.
#[derive(Debug, Clone, Args)]
pub struct ClueOptions {
    /// The answer to clue, e.g. LISTEN
    pub answer: String,

    /// Definition of the answer as it should appear in the clue
    pub definition: String,

    /// Your own wordplay breakdown; the setter invents one if omitted
    #[arg(long)]
    pub wordplay: Option<String>,

    /// Cryptic device (anagram, charade, hidden-word, ...)
    #[arg(long)]
    pub device: Option<String>,

    /// easy, medium or hard ("toughie" also means hard)
    #[arg(long)]
    pub difficulty: Option<String>,

    /// guardian, punster or ximenean
    #[arg(long)]
    pub persona: Option<String>,

    /// Write in the style of this setter
    #[arg(long)]
    pub setter: Option<String>,

    /// Flavour for the surface readings
    #[arg(long)]
    pub theme: Option<String>,

    /// Start from a saved preset; explicit flags override it
    #[arg(long)]
    pub preset: Option<String>,
}

impl ClueOptions {
    /// Build the request: preset first, then explicit flags on top.
    pub fn to_request(&self, presets: &PresetRepository<'_>) -> Result<ClueRequest> {
        let mut request = ClueRequest::new(self.answer.trim(), self.definition.trim());
        request.wordplay = self.wordplay.clone();

        if let Some(ref name) = self.preset {
            let preset = presets
                .find(name)?
                .ok_or_else(|| anyhow!("No preset named {:?}", name))?;
            info!("Using preset: {}", preset.name);
            preset.apply(&mut request);
        }

        if let Some(ref device) = self.device {
            request.device = Some(ClueDevice::from_str(device)?);
        }
        if let Some(ref difficulty) = self.difficulty {
            request.difficulty = Difficulty::from_str(difficulty)?;
        }
        if let Some(ref persona) = self.persona {
            request.persona = Persona::from_str(persona)?;
        }
        if let Some(ref setter) = self.setter {
            request.setter = Some(setter.clone());
        }
        if let Some(ref theme) = self.theme {
            request.theme = Some(theme.clone());
        }
        Ok(request)
    }
}

pub async fn run(ctx: &Context, options: ClueOptions, save: Option<usize>) -> Result<()> {
    let store = ctx.store();
    let request = options.to_request(&PresetRepository::new(&store))?;
    let service = ctx.service()?;

    let clues = service.generate_clues(&request).await?;
    print_clues(&clues);

    let history = HistoryRepository::new(&store);
    // Oldest first so the first clue ends up on top
    for clue in clues.iter().rev() {
        history.add(NewHistoryEntry {
            clue: clue.clue.clone(),
            answer: request.answer.clone(),
            definition: request.definition.clone(),
            clue_type: request.device(),
            setter: clue.setter.clone(),
            theme: request.theme().map(str::to_string),
        })?;
    }
    info!("Added {} clues to history", clues.len());

    if let Some(n) = save {
        let clue = pick(&clues, n)?;
        let saved = SavedClueRepository::new(&store).save(&request.answer, clue)?;
        println!("Saved clue {} (id {})", n, saved.id);
    }
    Ok(())
}

/// Two variations of an existing clue.
pub async fn run_vary(
    ctx: &Context,
    options: ClueOptions,
    clue: String,
    explanation: Option<String>,
) -> Result<()> {
    let store = ctx.store();
    let request = options.to_request(&PresetRepository::new(&store))?;
    let original = Clue {
        clue,
        explanation: explanation.unwrap_or_default(),
        setter: request.setter.clone(),
    };

    let service = ctx.service()?;
    let variations = service.generate_variations(&original, &request).await?;
    print_clues(&variations);
    Ok(())
}

/// 1-based pick from the printed list.
fn pick(clues: &[Clue], n: usize) -> Result<&Clue> {
    n.checked_sub(1)
        .and_then(|i| clues.get(i))
        .ok_or_else(|| anyhow!("--save must be between 1 and {}", clues.len()))
}
