//! Reporting of configured paths that do not exist.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// How the loader reacts to a configured env file or directory that is missing.
///
/// # Examples
///
/// ```
/// use strata::config::WarnMode;
///
/// assert_eq!(WarnMode::default(), WarnMode::Quiet);
/// assert_eq!(WarnMode::from_quiet(false), WarnMode::Warn);
/// assert_eq!(WarnMode::parse("STRICT").unwrap(), WarnMode::Strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarnMode {
    /// Log at debug level and continue.
    #[default]
    Quiet,
    /// Log at warn level and continue.
    Warn,
    /// Fail the load with [`Error::MissingPath`].
    Strict,
}

impl WarnMode {
    /// Map the boolean `quiet` switch onto a mode.
    #[must_use]
    pub const fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else {
            Self::Warn
        }
    }

    /// Parses a mode from a string (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `quiet`, `warn` or `strict`.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("invalid warn mode: {s}")),
        }
    }

    /// Report that `path` (a `kind`, e.g. "config directory") is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPath`] in strict mode.
    pub fn report_missing(self, kind: &'static str, path: &Path) -> Result<()> {
        match self {
            Self::Quiet => {
                log::debug!("{kind} '{}' does not exist, skipping", path.display());
                Ok(())
            }
            Self::Warn => {
                log::warn!("{kind} '{}' does not exist, skipping", path.display());
                Ok(())
            }
            Self::Strict => Err(Error::MissingPath {
                kind,
                path: path.to_path_buf(),
            }),
        }
    }
}

impl fmt::Display for WarnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Warn => write!(f, "warn"),
            Self::Strict => write!(f, "strict"),
        }
    }
}
