//! Validation of loader options and schema constraint helpers.
//!
//! [`ConfigValidator`] checks builder options once, before any I/O.
//! [`Violations`] collects constraint failures inside
//! [`ConfigSchema::validate`](crate::config::ConfigSchema::validate).

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error::{Error, FieldViolation, Result};

/// Validates loader options.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use strata::config::ConfigValidator;
///
/// ConfigValidator::validate_paths("configs_dirs", &[PathBuf::from("configs")]).unwrap();
/// ConfigValidator::validate_env_names(&["DATABASE_URL".to_string()]).unwrap();
/// assert!(ConfigValidator::validate_env_names(&["A=B".to_string()]).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate every entry of a path list option.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] naming `option` and the offending
    /// index if an entry is blank or contains a NUL byte.
    pub fn validate_paths(option: &str, paths: &[PathBuf]) -> Result<()> {
        for (i, path) in paths.iter().enumerate() {
            Self::check_path(path).map_err(|reason| {
                Error::invalid_option(option, format!("entry {i} {reason}"))
            })?;
        }
        Ok(())
    }

    /// Validate a single path option.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if the path is blank or contains a
    /// NUL byte.
    pub fn validate_path(option: &str, path: &Path) -> Result<()> {
        Self::check_path(path).map_err(|reason| Error::invalid_option(option, reason))
    }

    /// Validate required environment variable names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if a name is blank or contains `=`
    /// or a NUL byte, none of which can name a variable.
    pub fn validate_env_names(names: &[String]) -> Result<()> {
        for (i, name) in names.iter().enumerate() {
            let reason = if name.trim().is_empty() {
                Some("is empty")
            } else if name.contains('=') {
                Some("contains '='")
            } else if name.contains('\0') {
                Some("contains a null byte")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(Error::invalid_option(
                    "required_envs",
                    format!("entry {i} ('{}') {reason}", name.escape_debug()),
                ));
            }
        }
        Ok(())
    }

    fn check_path(path: &Path) -> std::result::Result<(), &'static str> {
        let raw = path.to_string_lossy();
        if raw.trim().is_empty() {
            return Err("is empty");
        }
        if raw.contains('\0') {
            return Err("contains a null byte");
        }
        Ok(())
    }
}

/// Collects constraint violations for a schema's `validate` method.
///
/// # Examples
///
/// ```
/// use strata::config::Violations;
///
/// let mut violations = Violations::new();
/// violations.non_empty("name", "");
/// violations.length("token", "abc", 8, 64);
/// violations.range("port", 80u16, 1024, 65535);
///
/// let found = violations.finish().unwrap_err();
/// assert_eq!(found.len(), 3);
/// assert_eq!(found[0].field, "name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    found: Vec<FieldViolation>,
}

impl Violations {
    /// Starts an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.found.push(FieldViolation::new(field, message));
    }

    /// Require `value` to be non-blank.
    pub fn non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    /// Require the character count of `value` to be within `min..=max`.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.push(field, format!("must be at least {min} characters, got {len}"));
        } else if len > max {
            self.push(field, format!("must be at most {max} characters, got {len}"));
        }
    }

    /// Require `value` to be within `min..=max`.
    pub fn range<N>(&mut self, field: &str, value: N, min: N, max: N)
    where
        N: PartialOrd + Display,
    {
        if value < min {
            self.push(field, format!("must be at least {min}, got {value}"));
        } else if value > max {
            self.push(field, format!("must be at most {max}, got {value}"));
        }
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Finish collecting.
    ///
    /// # Errors
    ///
    /// Returns every recorded violation if there is at least one.
    pub fn finish(self) -> std::result::Result<(), Vec<FieldViolation>> {
        if self.found.is_empty() {
            Ok(())
        } else {
            Err(self.found)
        }
    }
}
