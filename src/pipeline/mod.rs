pub mod artifact;
pub mod clean;
pub mod package;
pub mod publish;

#[cfg(test)]
mod testing;

use crate::config::ProjectConfig;
use crate::core::error::Result;
use crate::core::{display_relative, resolve_path, CommandRunner};
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};

use artifact::format_bytes;

pub use artifact::{ArtifactKind, DistArtifact};
pub use clean::Cleaner;
pub use package::Packager;
pub use publish::Publisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    Build,
    Upload,
}

impl Stage {
    /// Stages that must run, in order, to reach `self`.
    pub fn plan(self) -> &'static [Stage] {
        match self {
            Stage::Clean => &[Stage::Clean],
            Stage::Build => &[Stage::Clean, Stage::Build],
            Stage::Upload => &[Stage::Clean, Stage::Build, Stage::Upload],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Build => "build",
            Stage::Upload => "upload",
        }
    }

    fn running_state(self) -> PipelineState {
        match self {
            Stage::Clean => PipelineState::Cleaning,
            Stage::Build => PipelineState::Building,
            Stage::Upload => PipelineState::Publishing,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Cleaning,
    Building,
    Publishing,
    Done,
    Failed,
}

/// The project root together with its loaded configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl ProjectContext {
    pub fn new(root: &Path, config: ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn dist_dir(&self) -> PathBuf {
        resolve_path(&self.root, &self.config.project.dist_dir)
    }

    pub fn descriptor_path(&self) -> PathBuf {
        resolve_path(&self.root, &self.config.project.descriptor)
    }

    pub fn cleaner(&self) -> Cleaner {
        Cleaner::new(&self.root, &self.config.clean.paths)
    }
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub completed: Vec<Stage>,
    pub removed: Vec<PathBuf>,
    pub artifacts: Vec<DistArtifact>,
    pub uploaded: Vec<PathBuf>,
}

/// Runs the fixed clean → build → upload chain, stopping at the first failure.
pub struct Pipeline<'a> {
    ctx: &'a ProjectContext,
    runner: &'a dyn CommandRunner,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(ctx: &'a ProjectContext, runner: &'a dyn CommandRunner) -> Self {
        Self {
            ctx,
            runner,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }

    pub async fn run(&mut self, target: Stage) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        for &stage in target.plan() {
            self.transition(stage.running_state());
            if let Err(e) = self.run_stage(stage, &mut report).await {
                self.transition(PipelineState::Failed);
                return Err(e);
            }
            report.completed.push(stage);
        }

        self.transition(PipelineState::Done);
        Ok(report)
    }

    async fn run_stage(&self, stage: Stage, report: &mut PipelineReport) -> Result<()> {
        match stage {
            Stage::Clean => {
                println!("{} Cleaning build output...", "⚙".blue().bold());
                report.removed = self.ctx.cleaner().clean().await?;
                for path in &report.removed {
                    println!(
                        "  removed {}",
                        display_relative(&self.ctx.root, path).yellow()
                    );
                }
            }
            Stage::Build => {
                let packager = Packager::new(self.ctx);
                println!(
                    "{} Building distributions: {}",
                    "⚙".blue().bold(),
                    packager.invocation().to_string().cyan()
                );
                report.artifacts = packager.package(self.runner).await?;
                for artifact in &report.artifacts {
                    println!(
                        "  {} {} ({}, sha256={}…)",
                        format!("{:<5}", artifact.kind.to_string()).cyan(),
                        display_relative(&self.ctx.root, &artifact.path).yellow(),
                        format_bytes(artifact.size),
                        artifact.short_sha()
                    );
                }
            }
            Stage::Upload => {
                println!(
                    "{} Uploading with {}...",
                    "⚙".blue().bold(),
                    self.ctx.config.upload.program.cyan()
                );
                report.uploaded = Publisher::new(self.ctx).publish(self.runner).await?;
            }
        }

        tracing::info!(stage = %stage, "stage complete");
        Ok(())
    }
}
