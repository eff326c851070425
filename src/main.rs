use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cluesmith::cli::generate::ClueOptions;
use cluesmith::cli::library::{HistoryCommand, PresetCommand, SavedCommand};
use cluesmith::cli::{self, Context};

#[derive(Parser)]
#[command(name = "cluesmith", version)]
#[command(about = "Generate cryptic crossword clues with Gemini", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ./cluesmith.toml or ~/.config/cluesmith/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Use mock LLM client for testing
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate three clues for an answer
    Generate {
        #[command(flatten)]
        options: ClueOptions,

        /// Keep clue N (1-based) in the saved list
        #[arg(long)]
        save: Option<usize>,
    },

    /// Reword an existing clue two ways, keeping its wordplay
    Vary {
        #[command(flatten)]
        options: ClueOptions,

        /// The clue to vary
        #[arg(long)]
        clue: String,

        /// Its parsing
        #[arg(long)]
        explanation: Option<String>,
    },

    /// Look up a short dictionary definition
    Define { word: String },

    /// Suggest synonyms for an answer or definition
    Synonyms { text: String },

    /// Explain a clue device or a setter's style
    Explain { topic: String },

    /// List setter styles
    Setters {
        /// Use the built-in list instead of asking the service
        #[arg(long)]
        offline: bool,
    },

    /// Show or clear generated clue history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Manage generation presets
    Presets {
        #[command(subcommand)]
        command: PresetCommand,
    },

    /// Manage saved clues
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let ctx = Context::load(args.config, args.dry_run)?;

    match args.command {
        Commands::Generate { options, save } => cli::generate::run(&ctx, options, save).await?,
        Commands::Vary {
            options,
            clue,
            explanation,
        } => cli::generate::run_vary(&ctx, options, clue, explanation).await?,
        Commands::Define { word } => cli::lookup::define(&ctx, word).await?,
        Commands::Synonyms { text } => cli::lookup::synonyms(&ctx, text).await?,
        Commands::Explain { topic } => println!("{}", cli::lookup::explain(&topic)?),
        Commands::Setters { offline } => cli::lookup::setters(&ctx, offline).await?,
        Commands::History { command } => cli::library::run_history(&ctx, command)?,
        Commands::Presets { command } => cli::library::run_presets(&ctx, command)?,
        Commands::Saved { command } => cli::library::run_saved(&ctx, command)?,
    }

    Ok(())
}
