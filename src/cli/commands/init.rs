use crate::config::{ProjectConfig, ProjectConfigManager};
use crate::core::error::Result;
use colored::Colorize;

pub async fn execute(project_mgr: &ProjectConfigManager, force: bool) -> Result<()> {
    if project_mgr.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            "ℹ".yellow().bold(),
            project_mgr.config_path().display()
        );
        return Ok(());
    }

    let config = ProjectConfig::default();
    project_mgr.create(config.clone(), force).await?;

    println!(
        "{} Wrote {}",
        "✓".green().bold(),
        project_mgr.config_path().display().to_string().yellow()
    );
    println!("  Descriptor: {}", config.project.descriptor.cyan());
    println!("  Clean:      {}", config.clean.paths.join(" ").cyan());
    println!(
        "  Build:      {} {}",
        config.build.program.cyan(),
        config.build.args.join(" ")
    );
    println!(
        "  Upload:     {} {}",
        config.upload.program.cyan(),
        config.upload.args.join(" ")
    );

    Ok(())
}
