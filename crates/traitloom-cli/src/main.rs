//! Traitloom CLI - generative trait composition
//!
//! Plans unique character compositions from a layered asset store and renders
//! them as PNG images with JSON metadata.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use traitloom_core::RarityTier;

mod commands;

/// Traitloom - weave layered art into unique characters
#[derive(Parser)]
#[command(name = "traitloom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads the asset store
#[derive(clap::Args)]
struct StoreArgs {
    /// Collection config (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset-store root
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and render a collection
    Generate {
        #[command(flatten)]
        store: StoreArgs,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        out: PathBuf,

        /// Base seed
        #[arg(short, long, default_value = "1")]
        seed: u32,

        /// Compositions per character
        #[arg(short = 'n', long)]
        count: u32,

        /// Common compositions per character that inherit legendary layers
        #[arg(long, default_value = "0")]
        inherit: u32,

        /// Identifier of the first item
        #[arg(long, default_value = "1")]
        start_id: u64,

        /// Restrict to these characters (repeatable)
        #[arg(long = "character")]
        characters: Vec<String>,

        /// Images rendered concurrently; config value when omitted
        #[arg(long)]
        batch_size: Option<usize>,

        /// Write metadata only
        #[arg(long)]
        no_render: bool,
    },

    /// Select a single composition and optionally render it
    Preview {
        #[command(flatten)]
        store: StoreArgs,

        /// Character to preview
        character: String,

        /// Rarity tier
        #[arg(short, long, value_enum, default_value = "common")]
        tier: TierArg,

        /// Seed
        #[arg(short, long, default_value = "1")]
        seed: u32,

        /// Request legendary inheritance
        #[arg(long)]
        inherit: bool,

        /// Write the rendered PNG here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the composition as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what the asset store contains
    Catalog {
        #[command(flatten)]
        store: StoreArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default collection config
    Init {
        /// Destination file
        #[arg(default_value = "collection.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum TierArg {
    /// Legendary catalog
    Legendary,
    /// Common catalog
    Common,
}

impl From<TierArg> for RarityTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Legendary => RarityTier::Legendary,
            TierArg::Common => RarityTier::Common,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            store,
            out,
            seed,
            count,
            inherit,
            start_id,
            characters,
            batch_size,
            no_render,
        } => {
            let options = commands::generate::GenerateOptions {
                seed,
                count,
                inherit,
                start_id,
                characters,
                batch_size,
                render: !no_render,
            };
            commands::generate::run(store.config.as_deref(), &store.assets, &out, options).await?;
        }

        Commands::Preview {
            store,
            character,
            tier,
            seed,
            inherit,
            output,
            json,
        } => {
            let options = commands::preview::PreviewOptions {
                character,
                tier: tier.into(),
                seed,
                inherit,
                output,
                json,
            };
            commands::preview::run(store.config.as_deref(), &store.assets, options)?;
        }

        Commands::Catalog { store, json } => {
            commands::catalog::run(store.config.as_deref(), &store.assets, json)?;
        }

        Commands::Init { path, force } => {
            commands::init::run(&path, force)?;
        }
    }

    Ok(())
}
