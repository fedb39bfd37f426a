pub mod commands;

use crate::config::ProjectConfigManager;
use crate::pipeline::Stage;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "distkit",
    version,
    about = "Clean, build and upload the distributions of a Python project",
    long_about = None
)]
pub struct Cli {
    /// Project root (default: nearest directory with distkit.toml, setup.py or pyproject.toml)
    #[arg(long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Capture builder/uploader output behind a spinner (shown again on failure)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove build/, dist/ and *.egg-info
    Clean,

    /// Clean, then build an sdist and a wheel into dist/
    Build,

    /// Clean, build, then upload everything in dist/ to the package index
    Upload,

    /// Write a default distkit.toml into the project root
    Init {
        /// Overwrite an existing distkit.toml
        #[arg(long)]
        force: bool,
    },

    /// Check that the builder, uploader and descriptor are available
    Doctor,
}

fn project_manager(
    project_dir: Option<PathBuf>,
) -> crate::core::error::Result<ProjectConfigManager> {
    match project_dir {
        Some(dir) => Ok(ProjectConfigManager::new(&dir)),
        None => ProjectConfigManager::from_current_dir(),
    }
}

pub async fn run(cli: Cli) -> crate::core::error::Result<()> {
    let project_mgr = project_manager(cli.project_dir)?;
    tracing::debug!(root = %project_mgr.project_dir().display(), "project root");

    match cli.command.unwrap_or(Commands::Build) {
        Commands::Clean => commands::stage::execute(&project_mgr, Stage::Clean, cli.quiet).await,

        Commands::Build => commands::stage::execute(&project_mgr, Stage::Build, cli.quiet).await,

        Commands::Upload => {
            commands::stage::execute(&project_mgr, Stage::Upload, cli.quiet).await
        }

        Commands::Init { force } => commands::init::execute(&project_mgr, force).await,

        Commands::Doctor => commands::doctor::execute(&project_mgr).await,
    }
}
