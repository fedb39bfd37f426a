use crate::core::error::{DistkitError, Result};
use crate::core::{display_relative, list_visible_files, CommandRunner, Invocation};
use crate::pipeline::{ProjectContext, Stage};
use std::path::PathBuf;

/// Hands every file in dist to the upload client as one batch.
pub struct Publisher<'a> {
    ctx: &'a ProjectContext,
}

impl<'a> Publisher<'a> {
    pub fn new(ctx: &'a ProjectContext) -> Self {
        Self { ctx }
    }

    pub async fn files(&self) -> Result<Vec<PathBuf>> {
        list_visible_files(&self.ctx.dist_dir()).await
    }

    pub fn invocation(&self, files: &[PathBuf]) -> Invocation {
        let upload = &self.ctx.config.upload;
        Invocation::new(&upload.program, self.ctx.root.clone())
            .args(upload.args.iter().cloned())
            .args(files.iter().map(|f| display_relative(&self.ctx.root, f)))
            .envs(&self.ctx.config.environment)
    }

    pub async fn publish(&self, runner: &dyn CommandRunner) -> Result<Vec<PathBuf>> {
        let files = self.files().await?;
        if files.is_empty() {
            return Err(DistkitError::NothingToUpload(self.ctx.dist_dir()));
        }

        let invocation = self.invocation(&files);
        let outcome = runner.run(&invocation).await?;
        if !outcome.success() {
            return Err(DistkitError::StageFailed {
                stage: Stage::Upload.as_str(),
                program: invocation.program,
                code: outcome.exit_code,
            });
        }

        Ok(files)
    }
}
