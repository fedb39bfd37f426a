use crate::config::schema::{ProjectConfig, ToolConfig};
use crate::core::error::{DistkitError, Result};
use crate::core::fs::has_wildcard;
use std::path::{Component, Path};

/// Check a clean pattern: relative, no `..`, wildcards in the last component only.
pub fn validate_clean_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(DistkitError::Config(
            "clean.paths cannot contain empty entries".to_string(),
        ));
    }

    let path = Path::new(pattern);
    let components: Vec<Component<'_>> = path.components().collect();

    for (idx, component) in components.iter().enumerate() {
        match component {
            Component::Normal(name) => {
                let is_last = idx + 1 == components.len();
                if !is_last && name.to_str().is_some_and(has_wildcard) {
                    return Err(DistkitError::Config(format!(
                        "clean.paths entry '{}' may only use wildcards in its last component",
                        pattern
                    )));
                }
            }
            Component::CurDir => {}
            _ => {
                return Err(DistkitError::Config(format!(
                    "clean.paths entry '{}' must be a relative path inside the project",
                    pattern
                )));
            }
        }
    }

    if !components.iter().any(|c| matches!(c, Component::Normal(_))) {
        return Err(DistkitError::Config(format!(
            "clean.paths entry '{}' would remove the project root",
            pattern
        )));
    }

    Ok(())
}

fn validate_tool(section: &str, tool: &ToolConfig) -> Result<()> {
    if tool.program.trim().is_empty() {
        return Err(DistkitError::Config(format!(
            "{}.program cannot be empty",
            section
        )));
    }
    Ok(())
}

fn normalized(pattern: &str) -> String {
    Path::new(pattern)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn validate_project_config(config: &ProjectConfig) -> Result<()> {
    if config.project.descriptor.trim().is_empty() {
        return Err(DistkitError::Config(
            "project.descriptor cannot be empty".to_string(),
        ));
    }

    let dist_dir = config.project.dist_dir.trim();
    if dist_dir.is_empty() || has_wildcard(dist_dir) {
        return Err(DistkitError::Config(
            "project.dist_dir must be a plain relative path".to_string(),
        ));
    }

    for pattern in &config.clean.paths {
        validate_clean_pattern(pattern)?;
    }

    // dist_dir is itself validated as a clean pattern: relative, inside the project.
    validate_clean_pattern(dist_dir)?;

    let dist_norm = normalized(dist_dir);
    if !config
        .clean
        .paths
        .iter()
        .any(|p| normalized(p) == dist_norm)
    {
        return Err(DistkitError::Config(format!(
            "clean.paths must include project.dist_dir ('{}') so builds start from an empty output directory",
            dist_dir
        )));
    }

    validate_tool("build", &config.build)?;
    validate_tool("upload", &config.upload)?;

    if config.environment.keys().any(|k| k.trim().is_empty()) {
        return Err(DistkitError::Config(
            "environment cannot contain empty variable names".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_project_config(&ProjectConfig::default()).unwrap();
    }

    #[test]
    fn rejects_escaping_and_absolute_patterns() {
        assert!(validate_clean_pattern("../build").is_err());
        assert!(validate_clean_pattern("/tmp/build").is_err());
        assert!(validate_clean_pattern(".").is_err());
        assert!(validate_clean_pattern("").is_err());
    }

    #[test]
    fn wildcards_only_in_last_component() {
        assert!(validate_clean_pattern("*.egg-info").is_ok());
        assert!(validate_clean_pattern("src/*.egg-info").is_ok());
        assert!(validate_clean_pattern("*/build").is_err());
    }

    #[test]
    fn dist_dir_must_be_cleaned() {
        let mut config = ProjectConfig::default();
        config.clean.paths = vec!["build".to_string(), "*.egg-info".to_string()];

        let msg = validate_project_config(&config).unwrap_err().to_string();
        assert!(msg.contains("project.dist_dir"), "unexpected error: {}", msg);

        config.clean.paths.push("./dist".to_string());
        validate_project_config(&config).unwrap();
    }

    #[test]
    fn tool_programs_cannot_be_empty() {
        let mut config = ProjectConfig::default();
        config.upload.program = "  ".to_string();

        let msg = validate_project_config(&config).unwrap_err().to_string();
        assert!(msg.contains("upload.program"), "unexpected error: {}", msg);
    }
}
