//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::content::{Mode, Visibility};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content collections for a static blog and portfolio", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List visible entries of a collection
    #[command(alias = "ls")]
    List {
        /// Collection to list (posts, projects, or any declared name)
        #[arg(default_value = "posts")]
        collection: String,

        /// Include unpublished entries (development mode)
        #[arg(long)]
        dev: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate every collection
    Check {
        /// Re-check when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Create a new unpublished entry
    New {
        /// Collection to add to (posts, projects, or any declared name)
        collection: String,

        /// Title of the new entry
        title: String,
    },

    /// Validate and show redirects
    Redirects,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine site directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List {
            collection,
            dev,
            json,
        } => {
            let site = folio::Site::new(&base_dir)?;
            let mode = if dev { Mode::Development } else { Mode::from_env() };
            tracing::debug!("Listing `{}` in {:?} mode", collection, mode);
            folio::commands::list::run(&site, &collection, Visibility::from(mode), json)?;
        }

        Commands::Check { watch } => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Checking collections...");
            let result = folio::commands::check::run(&site);

            if watch {
                if let Err(e) = result {
                    tracing::error!("Check failed: {}", e);
                }
                let dir = base_dir.clone();
                tokio::task::spawn_blocking(move || folio::commands::check::watch(&dir)).await??;
            } else {
                result?;
                println!("All collections valid!");
            }
        }

        Commands::New { collection, title } => {
            let site = folio::Site::new(&base_dir)?;
            let path = folio::commands::new::create_entry(&site, &collection, &title)?;
            println!("Created {:?}", path);
        }

        Commands::Redirects => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::redirects::run(&site)?;
        }
    }

    Ok(())
}
