//! CLI entry point for site-index

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "site-index")]
#[command(version)]
#[command(about = "Build and read the content index of a static blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Build the content index from the posts directory
    #[command(alias = "b")]
    Build,

    /// List published posts, newest first
    #[command(alias = "ls")]
    List {
        /// Print the raw index result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the saved index
    Clean,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "site_index=debug,info"
    } else {
        "site_index=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build => {
            let site = site_index::Site::new(&base_dir)?;
            tracing::info!("Building content index from {:?}", site.posts_dir);
            let index = site.build_index()?;
            println!("Indexed {} posts.", index.len());
        }

        Commands::List { json } => {
            let site = site_index::Site::new(&base_dir)?;
            site_index::commands::list::run(&site, json)?;
        }

        Commands::Clean => {
            let site = site_index::Site::new(&base_dir)?;
            tracing::info!("Cleaning content index...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("site-index version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
