mod collect;
mod stores;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::stores::StoresCommands;

#[derive(Debug, Parser)]
#[command(name = "popmap")]
#[command(about = "Dessert pop-up store map command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect the store snapshot
    Stores {
        #[command(subcommand)]
        command: StoresCommands,
    },
    /// Discover stores through local search and merge them into the snapshot
    Collect {
        /// Print the collection plan without calling the search API or writing
        #[arg(long)]
        dry_run: bool,

        /// Snapshot to merge into and write (defaults to `POPMAP_SNAPSHOT_PATH`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Commands {
    /// Snapshot file for `stores validate --file`, the one command that runs
    /// without application configuration.
    fn standalone_validate_file(&self) -> Option<&Path> {
        match self {
            Commands::Stores {
                command: StoresCommands::Validate { file: Some(file) },
            } => Some(file.as_path()),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("popmap: no command given; run `popmap --help`");
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let config = popmap_core::load_app_config();
    let log_level = config.as_ref().map_or("info", |c| c.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(file) = command.standalone_validate_file() {
        return stores::run_stores_validate(file);
    }
    let config = config?;

    match command {
        Commands::Stores { command } => match command {
            StoresCommands::List {
                category,
                query,
                limit,
                file,
            } => {
                stores::run_stores_list(&config, file, category, query.as_deref(), limit).await?;
            }
            StoresCommands::Show { id, file } => stores::run_stores_show(&config, file, id).await?,
            StoresCommands::Validate { file } => {
                stores::run_stores_validate(file.as_deref().unwrap_or(config.snapshot_path.as_path()))?;
            }
        },
        Commands::Collect { dry_run, out } => {
            collect::run_collect(&config, out, dry_run).await?;
        }
    }

    Ok(())
}
