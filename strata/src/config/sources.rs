//! Settings sources and schema materialization.
//!
//! The merged tree is only one of four layers a schema sees. From lowest to
//! highest precedence:
//!
//! 1. the schema's own dotenv files
//! 2. the live environment store
//! 3. the merged tree (files, extra directory and pre-load hook)
//! 4. the secrets directory
//!
//! Merged file data therefore outranks environment variables.
//!
//! Environment, dotenv and secret values stay strings in the layered tree.
//! Deserialization is lenient: a string is parsed only when the target field
//! asks for a number or a bool, so `APP_ZIP=007` reaches a `String` field
//! unchanged and a `u16` field as `7`.

use std::fs;
use std::path::Path;

use ::config::{Map as LenientMap, Value as LenientValue, ValueKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::config::environment::{read_dotenv, EnvStore};
use crate::config::hook::set_path;
use crate::config::merger::ConfigMerger;
use crate::config::schema::{ConfigSchema, Frozen, SchemaSettings};
use crate::config::ConfigTree;
use crate::error::{Error, FieldViolation, Result};
use crate::path;

/// Build the final typed configuration from the merged tree.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the layered data does not deserialize
/// into `T` or `T::validate` reports violations, and I/O or parse errors
/// from the dotenv and secrets sources.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
/// use strata::config::{materialize, ConfigSchema, ConfigTree, MemoryEnv, SchemaSettings};
///
/// #[derive(Debug, Deserialize)]
/// struct App {
///     name: String,
///     debug: bool,
/// }
///
/// impl ConfigSchema for App {
///     fn settings() -> SchemaSettings {
///         SchemaSettings::new().env_prefix("APP_").env_keys(["name", "debug"])
///     }
/// }
///
/// let env = MemoryEnv::from_pairs([("APP_NAME", "from-env"), ("APP_DEBUG", "true")]);
/// let tree: ConfigTree = serde_json::from_value(json!({"name": "from-files"})).unwrap();
///
/// let app = materialize::<App>(&tree, &env).unwrap();
/// assert_eq!(app.name, "from-files");
/// assert!(app.debug);
/// ```
pub fn materialize<T: ConfigSchema>(tree: &ConfigTree, env: &dyn EnvStore) -> Result<Frozen<T>> {
    let settings = T::settings();
    let layered = layer_sources(&settings, tree, env)?;

    let value: T = deserialize_lenient(layered)?;

    value
        .validate()
        .map_err(|violations| Error::Validation { violations })?;

    Ok(Frozen::new(value))
}

/// Layer every settings source under and over `init`.
///
/// # Errors
///
/// Returns an error if a dotenv or secret file exists but cannot be read.
pub fn layer_sources(
    settings: &SchemaSettings,
    init: &ConfigTree,
    env: &dyn EnvStore,
) -> Result<ConfigTree> {
    let mut merged = dotenv_source(settings)?;
    ConfigMerger::merge_into(&mut merged, &env_source(settings, &env.vars()));
    ConfigMerger::merge_into(&mut merged, init);
    ConfigMerger::merge_into(&mut merged, &secrets_source(settings)?);
    Ok(merged)
}

/// Read the schema's declared keys from the schema's own dotenv files.
///
/// Files are read without touching the environment store; missing files
/// are skipped.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed.
pub fn dotenv_source(settings: &SchemaSettings) -> Result<ConfigTree> {
    let mut pairs = Vec::new();
    for env_file in &settings.env_files {
        let resolved = path::resolve(env_file)?;
        if resolved.is_file() {
            pairs.extend(read_dotenv(&resolved)?);
        } else {
            log::debug!("schema dotenv file '{}' does not exist", resolved.display());
        }
    }
    Ok(env_source(settings, &pairs))
}

/// Map variables onto the schema's declared keys.
///
/// Later pairs override earlier ones. With a nested delimiter, a variable
/// such as `APP_DB__HOST` sets `db.host` under the declared key `db`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::{env_source, SchemaSettings};
///
/// let settings = SchemaSettings::new()
///     .env_prefix("APP_")
///     .env_keys(["port", "db"])
///     .nested_delimiter("__");
/// let vars = vec![
///     ("APP_PORT".to_string(), "8080".to_string()),
///     ("APP_DB__HOST".to_string(), "localhost".to_string()),
///     ("UNRELATED".to_string(), "x".to_string()),
/// ];
///
/// let tree = env_source(&settings, &vars);
/// assert_eq!(tree["port"], "8080");
/// assert_eq!(tree["db"], json!({"host": "localhost"}));
/// assert_eq!(tree.len(), 2);
/// ```
#[must_use]
pub fn env_source(settings: &SchemaSettings, vars: &[(String, String)]) -> ConfigTree {
    let mut tree = ConfigTree::new();

    for key in &settings.env_keys {
        let name = settings.env_name(key);

        for (var, raw) in vars {
            if names_match(var, &name, settings.case_sensitive) {
                tree.insert(key.clone(), coerce(raw));
            }
        }

        let Some(delimiter) = settings.nested_delimiter.as_deref() else {
            continue;
        };
        let nested_prefix = format!("{name}{delimiter}");
        for (var, raw) in vars {
            let Some(rest) = strip_prefix(var, &nested_prefix, settings.case_sensitive) else {
                continue;
            };
            let mut segments = vec![key.clone()];
            segments.extend(rest.split(delimiter).map(|segment| {
                if settings.case_sensitive {
                    segment.to_string()
                } else {
                    segment.to_lowercase()
                }
            }));
            if let Err(e) = set_path(&mut tree, &segments.join("."), coerce(raw)) {
                log::debug!("ignoring environment variable '{var}': {e}");
            }
        }
    }

    tree
}

/// Read one secret file per declared key from the secrets directory.
///
/// The file for key `token` with prefix `APP_` is `APP_token`; trailing
/// whitespace is trimmed. A missing directory yields an empty tree.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or a secret file cannot be read.
pub fn secrets_source(settings: &SchemaSettings) -> Result<ConfigTree> {
    let mut tree = ConfigTree::new();
    let Some(dir) = &settings.secrets_dir else {
        return Ok(tree);
    };

    let resolved = path::resolve(dir)?;
    if !resolved.is_dir() {
        log::debug!("secrets directory '{}' does not exist", resolved.display());
        return Ok(tree);
    }

    let entries = fs::read_dir(&resolved).map_err(|e| Error::Io {
        path: resolved.clone(),
        source: e,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Io {
            path: resolved.clone(),
            source: e,
        })?;
        files.push(entry.path());
    }
    files.sort();

    for key in &settings.env_keys {
        let name = settings.env_name(key);
        let found = files.iter().find(|file| {
            file.is_file()
                && file
                    .file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| names_match(f, &name, settings.case_sensitive))
        });

        if let Some(file) = found {
            tree.insert(key.clone(), coerce(&read_secret(file)?));
        }
    }

    Ok(tree)
}

fn read_secret(file: &Path) -> Result<String> {
    let contents = fs::read_to_string(file).map_err(|e| Error::Io {
        path: file.to_path_buf(),
        source: e,
    })?;
    Ok(contents.trim().to_string())
}

/// Turn a raw string from the environment into a tree value.
///
/// Strings that hold a JSON object or array are parsed so nested fields can
/// be set from one variable. Everything else, numbers and bools included,
/// stays a string until deserialization decides what the field needs.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::coerce;
///
/// assert_eq!(coerce(r#"["a", "b"]"#), json!(["a", "b"]));
/// assert_eq!(coerce(r#"{"port": 1}"#), json!({"port": 1}));
/// assert_eq!(coerce("8080"), json!("8080"));
/// assert_eq!(coerce("true"), json!("true"));
/// ```
#[must_use]
pub fn coerce(raw: &str) -> Value {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value @ (Value::Object(_) | Value::Array(_))) = serde_json::from_str::<Value>(raw) {
            return value;
        }
    }

    Value::String(raw.to_string())
}

fn names_match(candidate: &str, expected: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        candidate == expected
    } else {
        candidate.eq_ignore_ascii_case(expected)
    }
}

fn strip_prefix<'a>(candidate: &'a str, prefix: &str, case_sensitive: bool) -> Option<&'a str> {
    let head = candidate.get(..prefix.len())?;
    let rest = candidate.get(prefix.len()..)?;
    (names_match(head, prefix, case_sensitive) && !rest.is_empty()).then_some(rest)
}

/// Deserialize the layered tree into `T`, parsing strings on demand.
///
/// # Errors
///
/// Returns [`Error::Validation`] with one violation naming the dotted path
/// of the offending field, or `$` when no field can be named.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
/// use strata::config::{deserialize_lenient, ConfigTree};
///
/// #[derive(Deserialize)]
/// struct Db {
///     port: u16,
///     password: String,
/// }
///
/// let tree: ConfigTree =
///     serde_json::from_value(json!({"port": "5432", "password": "123456"})).unwrap();
/// let db: Db = deserialize_lenient(tree).unwrap();
/// assert_eq!(db.port, 5432);
/// assert_eq!(db.password, "123456");
/// ```
pub fn deserialize_lenient<T: DeserializeOwned>(tree: ConfigTree) -> Result<T> {
    serde_path_to_error::deserialize(lenient_value(Value::Object(tree))).map_err(|e| {
        Error::Validation {
            violations: vec![path_violation(&e)],
        }
    })
}

fn lenient_value(value: Value) -> LenientValue {
    let kind = match value {
        Value::Null => ValueKind::Nil,
        Value::Bool(b) => ValueKind::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueKind::I64(i)
            } else if let Some(u) = n.as_u64() {
                ValueKind::U64(u)
            } else {
                n.as_f64().map_or(ValueKind::Nil, ValueKind::Float)
            }
        }
        Value::String(s) => ValueKind::String(s),
        Value::Array(items) => ValueKind::Array(items.into_iter().map(lenient_value).collect()),
        Value::Object(map) => ValueKind::Table(
            map.into_iter()
                .map(|(key, value)| (key, lenient_value(value)))
                .collect::<LenientMap<_, _>>(),
        ),
    };
    LenientValue::new(None, kind)
}

/// Name the failing field from the tracked path, plus the field named by a
/// missing or unknown field message.
fn path_violation(err: &serde_path_to_error::Error<::config::ConfigError>) -> FieldViolation {
    let message = err.inner().to_string();

    let mut segments: Vec<String> = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.clone()),
            Segment::Enum { variant } => Some(variant.clone()),
            _ => None,
        })
        .collect();

    let named = message
        .split_once("field `")
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(field, _)| field.to_string());
    if let Some(named) = named {
        if segments.last() != Some(&named) {
            segments.push(named);
        }
    }

    let field = if segments.is_empty() {
        "$".to_string()
    } else {
        segments.join(".")
    };
    FieldViolation::new(field, message)
}
