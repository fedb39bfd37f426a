use crate::config::ProjectConfigManager;
use crate::core::error::Result;
use crate::core::{display_relative, SystemRunner};
use crate::pipeline::{Pipeline, ProjectContext, Stage};
use colored::Colorize;

pub async fn execute(project_mgr: &ProjectConfigManager, target: Stage, quiet: bool) -> Result<()> {
    let config = project_mgr.load().await?;
    let ctx = ProjectContext::new(project_mgr.project_dir(), config);
    let runner = SystemRunner::new(quiet);

    let report = Pipeline::new(&ctx, &runner).run(target).await?;

    match target {
        Stage::Clean => {
            if report.removed.is_empty() {
                println!("{} Nothing to clean", "ℹ".blue().bold());
            } else {
                println!(
                    "{} Removed {} path(s)",
                    "✓".green().bold(),
                    report.removed.len().to_string().cyan()
                );
            }
        }
        Stage::Build => {
            println!(
                "{} Built {} archive(s) in {}",
                "✓".green().bold(),
                report.artifacts.len().to_string().cyan(),
                display_relative(&ctx.root, &ctx.dist_dir()).yellow()
            );
        }
        Stage::Upload => {
            println!(
                "{} Uploaded {} file(s)",
                "✓".green().bold(),
                report.uploaded.len().to_string().cyan()
            );
        }
    }

    Ok(())
}
