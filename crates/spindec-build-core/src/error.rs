//! Error types for spindec-build-core

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, cleaning or installing SPINDEC
#[derive(Error, Debug)]
pub enum BuildError {
    /// External tool ran and exited non-zero
    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// External tool could not be launched at all
    #[error("{tool} could not be launched (is it installed and in PATH?): {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Source directory holds nothing to compile
    #[error("No source files found in {0}")]
    NoSources(PathBuf),

    /// Output directory holds no build artifacts
    #[error("No binaries found in {0}")]
    NothingToClean(PathBuf),

    /// One or more artifacts survived a confirmed clean
    #[error("{failed} of {total} artifact(s) could not be removed")]
    CleanIncomplete { failed: usize, total: usize },

    /// Invalid configuration file or value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unrecognised sub-value for `--compile` or `--clean`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value {value:?} for --{option}")]
pub struct InvalidModeError {
    pub option: &'static str,
    pub value: String,
}

impl From<toml::de::Error> for BuildError {
    fn from(err: toml::de::Error) -> Self {
        BuildError::Config(err.to_string())
    }
}

impl BuildError {
    /// Process exit code for this error.
    ///
    /// External tool failures propagate the tool's own code; everything
    /// else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::ToolFailed { code, .. } => *code,
            BuildError::ToolUnavailable { .. } => 127,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_propagates_exit_code() {
        let err = BuildError::ToolFailed {
            tool: "gfortran".to_string(),
            code: 3,
            stderr: "Error: Symbol 'x' has no IMPLICIT type".to_string(),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("gfortran"));
    }

    #[test]
    fn test_precondition_errors_exit_one() {
        assert_eq!(BuildError::NothingToClean(PathBuf::from("bin")).exit_code(), 1);
        assert_eq!(BuildError::NoSources(PathBuf::from("src")).exit_code(), 1);
        assert_eq!(
            BuildError::CleanIncomplete {
                failed: 1,
                total: 3
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_unavailable_tool_uses_shell_convention() {
        let err = BuildError::ToolUnavailable {
            tool: "nf-config".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), 127);
    }
}
