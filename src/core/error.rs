use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistkitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to remove {}: {source}", path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("{stage} stage failed: {program} exited with code {code}")]
    StageFailed {
        stage: &'static str,
        program: String,
        code: i32,
    },

    #[error("Build produced incomplete output: {0}")]
    MissingArtifacts(String),

    #[error("Nothing to upload: {} is empty", .0.display())]
    NothingToUpload(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DistkitError {
    /// Process exit status for this error.
    ///
    /// Cleanup failures surface the OS error code and stage failures surface
    /// the collaborator's own exit code; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            DistkitError::Clean { source, .. } => source.raw_os_error().unwrap_or(1),
            DistkitError::Io(e) => e.raw_os_error().unwrap_or(1),
            DistkitError::StageFailed { code, .. } => *code,
            _ => 1,
        };

        if (1..=255).contains(&code) {
            code
        } else {
            1
        }
    }
}

pub type Result<T> = std::result::Result<T, DistkitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn clean_error_propagates_os_code() {
        let err = DistkitError::Clean {
            path: PathBuf::from("build"),
            source: std::io::Error::from_raw_os_error(13),
        };
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().contains("build"));
    }

    #[test]
    fn synthetic_io_error_exits_with_one() {
        let err = DistkitError::Clean {
            path: PathBuf::from("dist"),
            source: std::io::Error::new(ErrorKind::Other, "boom"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn stage_failure_propagates_collaborator_code() {
        let err = DistkitError::StageFailed {
            stage: "upload",
            program: "twine".to_string(),
            code: 2,
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "upload stage failed: twine exited with code 2"
        );
    }

    #[test]
    fn out_of_range_codes_collapse_to_one() {
        let err = DistkitError::StageFailed {
            stage: "build",
            program: "python3".to_string(),
            code: -1,
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(DistkitError::Config("x".to_string()).exit_code(), 1);
    }
}
