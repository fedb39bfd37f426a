pub mod project;
pub mod schema;
pub mod validation;

pub use project::{ProjectConfigManager, PROJECT_CONFIG_FILE};
pub use schema::{CleanConfig, ProjectConfig, ProjectMeta, ToolConfig};
pub use validation::{validate_clean_pattern, validate_project_config};
