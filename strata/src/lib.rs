#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # strata
//!
//! A library for resolving one validated configuration value from layered
//! sources.
//!
//! Sources are dotenv files, directories of YAML/JSON fragments, an optional
//! extra override directory, caller-supplied base data, and the schema's own
//! environment and secrets sources. Fragments are deep-merged in a fixed
//! order and the result is deserialized into a typed, read-only schema.
//!
//! ## Core Types
//!
//! - [`ConfigBuilder`] and [`ConfigLoader`]: Building and running the pipeline
//! - [`ConfigSchema`] and [`BaseConfig`]: Typed and permissive schemas
//! - [`Frozen`]: The read-only result of a load
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use serde_json::json;
//! use strata::config::{deep_merge, ConfigTree};
//!
//! let base: ConfigTree = serde_json::from_value(json!({"db": {"host": "localhost", "port": 5432}})).unwrap();
//! let overlay: ConfigTree = serde_json::from_value(json!({"db": {"host": "db.internal"}})).unwrap();
//!
//! let merged = deep_merge(&base, &overlay);
//! assert_eq!(merged["db"]["host"], "db.internal");
//! assert_eq!(merged["db"]["port"], 5432);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod path;

// Re-export key types at crate root for convenience
pub use self::config::{
    BaseConfig, ConfigBuilder, ConfigLoader, ConfigSchema, ConfigTree, Frozen, LoadState,
    PreLoadHook, WarnMode,
};
pub use error::{Error, FieldViolation, FileFormat, Result};
pub use logging::{init_logger, LogLevel, Logger};
