use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_DESCRIPTOR: &str = "setup.py";
pub const DEFAULT_DIST_DIR: &str = "dist";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectMeta,
    #[serde(default)]
    pub clean: CleanConfig,
    #[serde(default = "default_build")]
    pub build: ToolConfig,
    #[serde(default = "default_upload")]
    pub upload: ToolConfig,
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectMeta {
    #[serde(default = "default_descriptor")]
    pub descriptor: String,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
            dist_dir: default_dist_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanConfig {
    #[serde(default = "default_clean_paths")]
    pub paths: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            paths: default_clean_paths(),
        }
    }
}

/// An external collaborator: the program and its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolConfig {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

fn default_descriptor() -> String {
    DEFAULT_DESCRIPTOR.to_string()
}

fn default_dist_dir() -> String {
    DEFAULT_DIST_DIR.to_string()
}

fn default_clean_paths() -> Vec<String> {
    vec![
        "build".to_string(),
        DEFAULT_DIST_DIR.to_string(),
        "*.egg-info".to_string(),
    ]
}

pub fn default_build() -> ToolConfig {
    ToolConfig::new("python3", &[DEFAULT_DESCRIPTOR, "sdist", "bdist_wheel"])
}

pub fn default_upload() -> ToolConfig {
    ToolConfig::new("twine", &["upload"])
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project: ProjectMeta::default(),
            clean: CleanConfig::default(),
            build: default_build(),
            upload: default_upload(),
            environment: HashMap::new(),
        }
    }
}
