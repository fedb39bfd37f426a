pub mod error;
pub mod fs;
pub mod path;
pub mod process;

pub use error::{DistkitError, Result};
pub use fs::{expand_pattern, file_digest, list_visible_files, path_present, remove_path};
pub use path::{display_relative, resolve_path};
pub use process::{CommandOutcome, CommandRunner, Invocation, ProcessExecutor, SystemRunner};
