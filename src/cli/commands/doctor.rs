use crate::config::ProjectConfigManager;
use crate::core::{display_relative, error::Result, ProcessExecutor};
use crate::pipeline::artifact::{format_bytes, scan_dist};
use crate::pipeline::ProjectContext;
use colored::Colorize;

pub async fn execute(project_mgr: &ProjectConfigManager) -> Result<()> {
    println!("{}", "Running environment checks...".bold());
    println!();

    let config = project_mgr.load().await?;
    let ctx = ProjectContext::new(project_mgr.project_dir(), config);
    let mut all_ok = true;

    println!("Project root: {}", ctx.root.display().to_string().yellow());
    if project_mgr.exists() {
        println!(
            "Config: {}",
            project_mgr.config_path().display().to_string().yellow()
        );
    } else {
        println!("Config: {}", "built-in defaults".yellow());
    }
    println!();

    for (label, program) in [
        ("builder", &ctx.config.build.program),
        ("uploader", &ctx.config.upload.program),
    ] {
        print!("Checking {} ({})... ", label, program.cyan());
        if ProcessExecutor::check_command_exists(program) {
            println!("{}", "✓".green());
        } else {
            println!("{}", "✗ Not found".red());
            all_ok = false;
        }
    }

    print!("Checking descriptor... ");
    let descriptor = ctx.descriptor_path();
    if descriptor.is_file() {
        println!(
            "{} ({})",
            "✓".green(),
            display_relative(&ctx.root, &descriptor).yellow()
        );
    } else {
        println!(
            "{} {}",
            "✗ Missing".red(),
            display_relative(&ctx.root, &descriptor)
        );
        all_ok = false;
    }

    print!("Checking stale build output... ");
    let stale = ctx.cleaner().targets().await?;
    if stale.is_empty() {
        println!("{}", "✓ None".green());
    } else {
        println!("{} {} path(s), removed by the next run", "○".yellow(), stale.len());
        for path in &stale {
            println!("  - {}", display_relative(&ctx.root, path).yellow());
        }
    }

    print!("Checking dist... ");
    let artifacts = scan_dist(&ctx.dist_dir()).await?;
    if artifacts.is_empty() {
        println!("{}", "○ Empty".yellow());
    } else {
        println!("{} {} file(s)", "✓".green(), artifacts.len());
        for artifact in &artifacts {
            println!(
                "  - {} [{}] {}",
                artifact.file_name.cyan(),
                artifact.kind,
                format_bytes(artifact.size)
            );
        }
    }

    println!();
    if all_ok {
        println!("{}", "All checks passed!".green().bold());
    } else {
        println!(
            "{}",
            "Some checks failed. Please fix the issues above."
                .yellow()
                .bold()
        );
    }

    Ok(())
}
