use crate::config::schema::ProjectConfig;
use crate::config::validate_project_config;
use crate::core::error::{DistkitError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const PROJECT_CONFIG_FILE: &str = "distkit.toml";

/// Files whose presence marks a directory as a project root.
const ROOT_MARKERS: &[&str] = &[PROJECT_CONFIG_FILE, "setup.py", "pyproject.toml"];

pub struct ProjectConfigManager {
    project_dir: PathBuf,
    config_path: PathBuf,
}

impl ProjectConfigManager {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            config_path: project_dir.join(PROJECT_CONFIG_FILE),
        }
    }

    pub fn from_current_dir() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        let project_dir = Self::find_project_root(&current_dir).unwrap_or(current_dir);
        Ok(Self::new(&project_dir))
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Load `distkit.toml`, falling back to the built-in defaults when absent.
    pub async fn load(&self) -> Result<ProjectConfig> {
        let config: ProjectConfig = if self.exists() {
            let content = fs::read_to_string(&self.config_path).await?;
            toml::from_str(&content)?
        } else {
            tracing::debug!(
                path = %self.config_path.display(),
                "no project config, using defaults"
            );
            ProjectConfig::default()
        };

        validate_project_config(&config)?;
        Ok(config)
    }

    pub async fn save(&self, config: &ProjectConfig) -> Result<()> {
        validate_project_config(config)?;
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await?;
        Ok(())
    }

    pub async fn create(&self, config: ProjectConfig, force: bool) -> Result<()> {
        if self.exists() && !force {
            return Err(DistkitError::Config(format!(
                "{} already exists (use --force to overwrite)",
                self.config_path.display()
            )));
        }

        self.save(&config).await
    }

    pub fn find_project_root(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir;

        loop {
            if ROOT_MARKERS.iter().any(|m| current.join(m).exists()) {
                return Some(current.to_path_buf());
            }

            current = current.parent()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = ProjectConfigManager::new(dir.path());

        let config = mgr.load().await.unwrap();
        assert_eq!(config.build.program, "python3");
        assert_eq!(config.upload.program, "twine");
    }

    #[tokio::test]
    async fn invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = ProjectConfigManager::new(dir.path());

        let toml = r#"
[clean]
paths = ["build", "../outside", "dist"]
"#;
        tokio::fs::write(mgr.config_path(), toml).await.unwrap();

        let msg = mgr.load().await.unwrap_err().to_string();
        assert!(msg.contains("../outside"), "unexpected error: {}", msg);
    }

    #[tokio::test]
    async fn create_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = ProjectConfigManager::new(dir.path());

        mgr.create(ProjectConfig::default(), false).await.unwrap();
        assert!(mgr.exists());
        assert!(mgr.create(ProjectConfig::default(), false).await.is_err());
        mgr.create(ProjectConfig::default(), true).await.unwrap();

        let reloaded = mgr.load().await.unwrap();
        assert_eq!(reloaded.clean.paths, vec!["build", "dist", "*.egg-info"]);
    }

    #[test]
    fn project_root_found_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("setup.py"), "").unwrap();
        let nested = dir.path().join("paperize").join("sub");
        std::fs::create_dir_all(&nested).unwrap();

        let root = ProjectConfigManager::find_project_root(&nested).unwrap();
        assert_eq!(root, dir.path());
    }
}
