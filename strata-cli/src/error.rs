//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use std::fmt;
use strata::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// The configuration could not be rendered in the requested format.
    Output(String),

    /// Semantic failure (e.g., a requested key is absent) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Validation or semantic failure
    /// - 2: Missing required environment variable
    /// - 3: Parse error in a dotenv or config file
    /// - 4: Invalid loader options or paths
    /// - 5: I/O error (including missing paths in strict mode)
    /// - 6: Other library error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                LibError::Validation { .. } => 1,
                LibError::MissingEnv { .. } => 2,
                LibError::Parse { .. } => 3,
                LibError::InvalidOption { .. } | LibError::InvalidPath { .. } => 4,
                LibError::Io { .. } | LibError::MissingPath { .. } => 5,
                LibError::Hook { .. } => 6,
            },
            CliError::Output(_) => 6,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::Output(msg) => write!(f, "Output error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use strata::{FieldViolation, FileFormat};

    #[test]
    fn test_library_exit_codes() {
        let cases = [
            (
                LibError::Validation {
                    violations: vec![FieldViolation::new("port", "out of range")],
                },
                1,
            ),
            (
                LibError::MissingEnv {
                    name: "API_KEY".to_string(),
                },
                2,
            ),
            (
                LibError::Parse {
                    path: PathBuf::from("configs/app.yaml"),
                    format: FileFormat::Yaml,
                    message: "bad indent".to_string(),
                },
                3,
            ),
            (
                LibError::InvalidPath {
                    path: PathBuf::from("/../.."),
                    reason: "escapes root".to_string(),
                },
                4,
            ),
            (
                LibError::MissingPath {
                    kind: "config directory",
                    path: PathBuf::from("/missing"),
                },
                5,
            ),
            (
                LibError::Hook {
                    source: anyhow::anyhow!("vault sealed"),
                },
                6,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn test_cli_exit_codes() {
        assert_eq!(CliError::SemanticFailure("x".into()).exit_code(), 1);
        assert_eq!(CliError::Output("x".into()).exit_code(), 6);
    }

    #[test]
    fn test_display_wraps_library_message() {
        let err = CliError::from(LibError::MissingEnv {
            name: "API_KEY".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "missing required environment variable 'API_KEY'"
        );
    }
}
