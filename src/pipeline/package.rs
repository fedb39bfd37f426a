use crate::core::error::{DistkitError, Result};
use crate::core::{CommandRunner, Invocation};
use crate::pipeline::artifact::{scan_dist, ArtifactKind, DistArtifact};
use crate::pipeline::{ProjectContext, Stage};

/// Runs the distribution builder and checks that it produced both archive kinds.
pub struct Packager<'a> {
    ctx: &'a ProjectContext,
}

impl<'a> Packager<'a> {
    pub fn new(ctx: &'a ProjectContext) -> Self {
        Self { ctx }
    }

    pub fn invocation(&self) -> Invocation {
        let build = &self.ctx.config.build;
        Invocation::new(&build.program, self.ctx.root.clone())
            .args(build.args.iter().cloned())
            .envs(&self.ctx.config.environment)
    }

    pub async fn package(&self, runner: &dyn CommandRunner) -> Result<Vec<DistArtifact>> {
        let invocation = self.invocation();
        let outcome = runner.run(&invocation).await?;
        if !outcome.success() {
            return Err(DistkitError::StageFailed {
                stage: Stage::Build.as_str(),
                program: invocation.program,
                code: outcome.exit_code,
            });
        }

        let dist_dir = self.ctx.dist_dir();
        let artifacts = scan_dist(&dist_dir).await?;
        verify_artifacts(&artifacts)?;
        Ok(artifacts)
    }
}

/// Require at least one sdist and one wheel. Partial output stays on disk.
pub fn verify_artifacts(artifacts: &[DistArtifact]) -> Result<()> {
    let has = |kind: ArtifactKind| artifacts.iter().any(|a| a.kind == kind);

    match (has(ArtifactKind::Sdist), has(ArtifactKind::Wheel)) {
        (true, true) => {}
        (false, false) => {
            return Err(DistkitError::MissingArtifacts(
                "no sdist or wheel archive was written".to_string(),
            ))
        }
        (false, true) => {
            return Err(DistkitError::MissingArtifacts(
                "no sdist archive was written".to_string(),
            ))
        }
        (true, false) => {
            return Err(DistkitError::MissingArtifacts(
                "no wheel archive was written".to_string(),
            ))
        }
    }

    let versions = mismatched_versions(artifacts);
    if !versions.is_empty() {
        let projects = distinct(artifacts, |a| a.name.as_deref());
        tracing::warn!(
            projects = ?projects,
            versions = ?versions,
            "archives in dist carry different versions"
        );
    }

    Ok(())
}

/// The distinct versions across sdists and wheels, or nothing when they agree.
pub fn mismatched_versions(artifacts: &[DistArtifact]) -> Vec<&str> {
    let versions = distinct(artifacts, |a| a.version.as_deref());
    if versions.len() > 1 {
        versions
    } else {
        Vec::new()
    }
}

fn distinct<'a>(
    artifacts: &'a [DistArtifact],
    field: impl Fn(&'a DistArtifact) -> Option<&'a str>,
) -> Vec<&'a str> {
    let mut values: Vec<&str> = artifacts
        .iter()
        .filter(|a| a.kind != ArtifactKind::Other)
        .filter_map(field)
        .collect();
    values.sort_unstable();
    values.dedup();
    values
}
