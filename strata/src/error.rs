//! Error types for the strata library.
//!
//! This module provides the error hierarchy for every stage of the layered
//! loading pipeline, using `thiserror` for ergonomic error handling.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for operations that may fail with a strata error.
///
/// # Examples
///
/// ```
/// use strata::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the strata library.
///
/// Every variant aborts the `load()` call that raised it. A missing dotenv
/// file or directory is only reported as [`Error::MissingPath`] in strict
/// warn mode; the other modes log it and continue.
#[derive(Debug, Error)]
pub enum Error {
    /// A loader option was rejected at construction time.
    #[error("invalid option '{option}': {reason}")]
    InvalidOption {
        /// The option that was rejected.
        option: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// A required environment variable is not set.
    #[error("missing required environment variable '{name}'")]
    MissingEnv {
        /// The name of the missing variable.
        name: String,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse {format} file {}: {message}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The format the file was parsed as.
        format: FileFormat,
        /// A description of the parse failure.
        message: String,
    },

    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configured path does not exist and the loader runs in strict mode.
    #[error("{kind} not found: {}", path.display())]
    MissingPath {
        /// What the path was expected to be.
        kind: &'static str,
        /// The resolved path.
        path: PathBuf,
    },

    /// The pre-load hook returned an error.
    #[error("pre-load hook failed: {source}")]
    Hook {
        /// The error raised by the hook.
        #[source]
        source: anyhow::Error,
    },

    /// The merged configuration violates the schema.
    #[error("configuration validation failed: {}", format_violations(violations))]
    Validation {
        /// Every violation reported for this load.
        violations: Vec<FieldViolation>,
    },
}

/// Structured data formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// YAML documents (`.yaml`, `.yml`).
    Yaml,
    /// JSON documents (`.json`).
    Json,
    /// Dotenv `KEY=VALUE` files.
    Dotenv,
}

impl FileFormat {
    /// Detect the structured format of a config fragment from its extension.
    ///
    /// Only the exact lowercase extensions `yaml`, `yml` and `json` match;
    /// dotenv files are never discovered by extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use strata::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_path(Path::new("app.yml")), Some(FileFormat::Yaml));
    /// assert_eq!(FileFormat::from_path(Path::new("app.json")), Some(FileFormat::Json));
    /// assert_eq!(FileFormat::from_path(Path::new("app.toml")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Json => write!(f, "JSON"),
            Self::Dotenv => write!(f, "dotenv"),
        }
    }
}

/// A single schema constraint violation.
///
/// # Examples
///
/// ```
/// use strata::FieldViolation;
///
/// let violation = FieldViolation::new("app.port", "must be at least 80");
/// assert_eq!(violation.to_string(), "app.port: must be at least 80");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the offending field (`$` for the document root).
    pub field: String,
    /// The violated constraint.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new violation for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Shorthand for a construction-time option error.
    pub(crate) fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error was raised by schema validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::{Error, FieldViolation};
    ///
    /// let err = Error::Validation { violations: vec![FieldViolation::new("name", "too short")] };
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns the violations carried by a validation error.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}
