//! Path resolution for configured files and directories.
//!
//! Every path handed to the loader is made absolute before use:
//! - `~` and `~/path` expand to the home directory
//! - relative paths are joined onto a base directory (normally the CWD)
//! - `.` and `..` components are resolved lexically, without touching the
//!   filesystem, so paths that do not exist yet still resolve

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` component to the home directory.
///
/// Only `~` and `~/path` are expanded. A name such as `~backup` or `~user`
/// is an ordinary relative path and is returned unchanged.
///
/// # Errors
///
/// Returns an error if the path starts with `~` and the home directory cannot
/// be determined.
///
/// # Examples
///
/// ```
/// use strata::path::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/configs")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("configs"));
///
/// let untouched = expand_tilde(Path::new("/etc/app")).unwrap();
/// assert_eq!(untouched, Path::new("/etc/app"));
///
/// let relative = expand_tilde(Path::new("~backup/configs")).unwrap();
/// assert_eq!(relative, Path::new("~backup/configs"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
                path: path.to_path_buf(),
                reason: "Cannot determine home directory".to_string(),
            })?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                Ok(home)
            } else {
                Ok(home.join(rest))
            }
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Resolve `.` and `..` components in an absolute path.
///
/// # Errors
///
/// Returns an error if the path contains too many `..` components that would
/// escape the root directory.
///
/// # Examples
///
/// ```
/// use strata::path::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// let resolved = resolve_components(Path::new("/srv/app/./configs/../extra")).unwrap();
/// assert_eq!(resolved, PathBuf::from("/srv/app/extra"));
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();
    let mut has_root = false;

    for component in path.components() {
        match component {
            Component::RootDir => {
                result.push(component);
                has_root = true;
            }
            Component::Prefix(prefix) => {
                result.push(prefix.as_os_str());
                has_root = true;
            }
            Component::Normal(c) => result.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "Path contains too many '..' components (escapes root)".to_string(),
                    });
                }
            }
        }
    }

    if has_root && result.as_os_str().is_empty() {
        result.push(Component::RootDir);
    }

    Ok(result)
}

/// Resolve `path` to an absolute path, joining relative paths onto `base`.
///
/// # Errors
///
/// Returns an error if tilde expansion or component resolution fails.
///
/// # Examples
///
/// ```
/// use strata::path::resolve_against;
/// use std::path::{Path, PathBuf};
///
/// let resolved = resolve_against(Path::new("configs"), Path::new("/srv/app")).unwrap();
/// assert_eq!(resolved, PathBuf::from("/srv/app/configs"));
///
/// let absolute = resolve_against(Path::new("/etc/app"), Path::new("/srv/app")).unwrap();
/// assert_eq!(absolute, PathBuf::from("/etc/app"));
/// ```
pub fn resolve_against(path: &Path, base: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    resolve_components(&absolute)
}

/// Resolve `path` against the current working directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or the path
/// cannot be resolved.
pub fn resolve(path: &Path) -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| Error::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    resolve_against(path, &cwd)
}
