use crate::core::error::{DistkitError, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size in bytes and hex SHA-256 of a file.
pub async fn file_digest(path: &Path) -> Result<(u64, String)> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 8192];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        size += n as u64;
        hasher.update(&buffer[..n]);
    }

    Ok((size, format!("{:x}", hasher.finalize())))
}

/// Whether `path` exists, without following symlinks. Only `NotFound`
/// counts as absent; any other lookup failure is a cleanup error.
pub async fn path_present(path: &Path) -> Result<bool> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(clean_error(path, e)),
    }
}

/// Remove a file, symlink or directory tree. Absent paths are not an error.
///
/// Returns whether anything was removed.
pub async fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(clean_error(path, e)),
    };

    let removed = if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    match removed {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(clean_error(path, e)),
    }
}

fn clean_error(path: &Path, source: std::io::Error) -> DistkitError {
    DistkitError::Clean {
        path: path.to_path_buf(),
        source,
    }
}

pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Compile a single path component pattern (`*`, `?`) into an anchored regex.
pub fn component_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');

    Regex::new(&expr)
        .map_err(|e| DistkitError::Config(format!("Invalid path pattern '{}': {}", pattern, e)))
}

/// Resolve a relative path pattern against `root`.
///
/// Wildcards are only honored in the final component; the result is sorted.
/// Patterns without wildcards resolve to their single path whether or not
/// it exists.
pub async fn expand_pattern(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let relative = Path::new(pattern);
    let last = match relative.file_name().and_then(|n| n.to_str()) {
        Some(name) if has_wildcard(name) => name,
        _ => return Ok(vec![root.join(relative)]),
    };

    let parent = match relative.parent() {
        Some(p) if !p.as_os_str().is_empty() => root.join(p),
        _ => root.to_path_buf(),
    };
    let matcher = component_regex(last)?;

    let mut entries = match tokio::fs::read_dir(&parent).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(clean_error(&parent, e)),
    };

    let mut matches = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| clean_error(&parent, e))?
    {
        if let Some(name) = entry.file_name().to_str() {
            if matcher.is_match(name) {
                matches.push(entry.path());
            }
        }
    }

    matches.sort();
    Ok(matches)
}

/// Non-hidden files directly inside `dir`, sorted by name. Symlinks are
/// followed; dangling ones are skipped.
pub async fn list_visible_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let hidden = entry
            .file_name()
            .to_str()
            .map(|n| n.starts_with('.'))
            .unwrap_or(true);
        if hidden {
            continue;
        }

        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(m) if m.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    files.sort();
    Ok(files)
}
