use crate::core::error::Result;
use crate::core::{file_digest, list_visible_files};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Sdist,
    Wheel,
    Other,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::Sdist => "sdist",
            ArtifactKind::Wheel => "wheel",
            ArtifactKind::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: ArtifactKind,
    pub name: Option<String>,
    pub version: Option<String>,
    pub size: u64,
    pub sha256: String,
}

// {name}-{version}(-{build})?-{python}-{abi}-{platform}.whl
static WHEEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[^-]+)-(?P<version>[^-]+)(?:-\d[^-]*)?-[^-]+-[^-]+-[^-]+\.whl$",
    )
    .expect("valid regex")
});

static SDIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+)-(?P<version>[^-]+)\.(?:tar\.gz|zip)$").expect("valid regex")
});

/// Classify a distribution file name and pull out its name and version.
pub fn parse_file_name(file_name: &str) -> (ArtifactKind, Option<String>, Option<String>) {
    if file_name.ends_with(".whl") {
        return match WHEEL_RE.captures(file_name) {
            Some(caps) => (
                ArtifactKind::Wheel,
                Some(caps["name"].to_string()),
                Some(caps["version"].to_string()),
            ),
            None => (ArtifactKind::Wheel, None, None),
        };
    }

    if file_name.ends_with(".tar.gz") || file_name.ends_with(".zip") {
        return match SDIST_RE.captures(file_name) {
            Some(caps) => (
                ArtifactKind::Sdist,
                Some(caps["name"].to_string()),
                Some(caps["version"].to_string()),
            ),
            None => (ArtifactKind::Sdist, None, None),
        };
    }

    (ArtifactKind::Other, None, None)
}

impl DistArtifact {
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let (kind, name, version) = parse_file_name(&file_name);
        let (size, sha256) = file_digest(path).await?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            kind,
            name,
            version,
            size,
            sha256,
        })
    }

    pub fn short_sha(&self) -> &str {
        &self.sha256[..self.sha256.len().min(12)]
    }
}

/// Every visible file directly under `dist_dir`, sorted by name.
pub async fn scan_dist(dist_dir: &Path) -> Result<Vec<DistArtifact>> {
    let mut artifacts = Vec::new();
    for path in list_visible_files(dist_dir).await? {
        artifacts.push(DistArtifact::from_path(&path).await?);
    }
    Ok(artifacts)
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
