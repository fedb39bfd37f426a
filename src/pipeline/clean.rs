use crate::core::error::Result;
use crate::core::{expand_pattern, path_present, remove_path};
use std::path::{Path, PathBuf};

/// Removes prior build output from the project root.
pub struct Cleaner {
    root: PathBuf,
    patterns: Vec<String>,
}

impl Cleaner {
    pub fn new(root: &Path, patterns: &[String]) -> Self {
        Self {
            root: root.to_path_buf(),
            patterns: patterns.to_vec(),
        }
    }

    /// Existing paths the configured patterns currently resolve to.
    pub async fn targets(&self) -> Result<Vec<PathBuf>> {
        let mut targets = Vec::new();
        for pattern in &self.patterns {
            for path in expand_pattern(&self.root, pattern).await? {
                if !targets.contains(&path) && path_present(&path).await? {
                    targets.push(path);
                }
            }
        }
        Ok(targets)
    }

    /// Remove every target. Already-absent paths are skipped; the first
    /// filesystem error aborts.
    pub async fn clean(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for path in self.targets().await? {
            if remove_path(&path).await? {
                tracing::debug!(path = %path.display(), "removed");
                removed.push(path);
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    async fn seed_stale_tree(root: &Path) {
        for dir in ["build/lib", "dist", "foo.egg-info"] {
            tokio::fs::create_dir_all(root.join(dir)).await.unwrap();
        }
        tokio::fs::write(root.join("build/lib/old.py"), "x").await.unwrap();
        tokio::fs::write(root.join("dist/foo-0.9.tar.gz"), "x").await.unwrap();
        tokio::fs::write(root.join("foo.egg-info/PKG-INFO"), "x").await.unwrap();
        tokio::fs::write(root.join("setup.py"), "").await.unwrap();
    }

    fn default_cleaner(root: &Path) -> Cleaner {
        Cleaner::new(root, &ProjectConfig::default().clean.paths)
    }

    #[tokio::test]
    async fn removes_build_dist_and_egg_info() {
        let dir = tempfile::tempdir().unwrap();
        seed_stale_tree(dir.path()).await;

        let removed = default_cleaner(dir.path()).clean().await.unwrap();

        assert_eq!(removed.len(), 3);
        assert!(!dir.path().join("build").exists());
        assert!(!dir.path().join("dist").exists());
        assert!(!dir.path().join("foo.egg-info").exists());
        assert!(dir.path().join("setup.py").exists());
    }

    #[tokio::test]
    async fn repeated_clean_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        seed_stale_tree(dir.path()).await;
        let cleaner = default_cleaner(dir.path());

        cleaner.clean().await.unwrap();
        let second = cleaner.clean().await.unwrap();

        assert!(second.is_empty());
        assert!(cleaner.targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clean_on_pristine_tree_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let removed = default_cleaner(dir.path()).clean().await.unwrap();
        assert!(removed.is_empty());
    }

    #[tokio::test]
    async fn overlapping_patterns_remove_once() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir(dir.path().join("dist")).await.unwrap();
        let cleaner = Cleaner::new(dir.path(), &["dist".to_string(), "d*".to_string()]);

        let removed = cleaner.clean().await.unwrap();
        assert_eq!(removed, vec![dir.path().join("dist")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn lookup_failure_is_not_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        seed_stale_tree(dir.path()).await;
        let cleaner = Cleaner::new(
            dir.path(),
            &["dist".to_string(), "setup.py/build".to_string()],
        );

        let err = cleaner.clean().await.unwrap_err();
        assert!(matches!(err, crate::core::DistkitError::Clean { .. }));
        // Targets are resolved before anything is removed.
        assert!(dir.path().join("dist").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_output_is_unlinked_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        tokio::fs::write(outside.path().join("keep.txt"), "x").await.unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("build")).unwrap();

        default_cleaner(dir.path()).clean().await.unwrap();

        assert!(!dir.path().join("build").exists());
        assert!(outside.path().join("keep.txt").exists());
    }
}
