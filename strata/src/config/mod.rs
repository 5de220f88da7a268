//! Layered configuration loading.
//!
//! This module resolves one validated configuration value from:
//! - dotenv files, loaded into an environment store
//! - one or more directories of YAML/JSON fragments
//! - an optional extra override directory
//! - caller-supplied base data and a pre-load transform
//! - the schema's own environment, dotenv and secrets sources
//!
//! # Load Order
//!
//! Each `load()` runs the stages in a fixed order:
//!
//! 1. Dotenv files are loaded into the environment store, later files winning
//! 2. Required environment variables are checked
//! 3. Base data seeds the tree; config directories merge over it in order
//! 4. The extra directory (explicit, else `STRATA_EXTRA_DIR`) merges on top
//! 5. The pre-load hook transforms the merged tree
//! 6. The schema layers its sources and validates the result
//!
//! # Examples
//!
//! Loading with the permissive default schema:
//!
//! ```no_run
//! use strata::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .config_dir("configs")
//!     .env_file(".env")
//!     .load()
//!     .unwrap();
//!
//! println!("app name: {:?}", config.get_path("app.name"));
//! ```
//!
//! Loading into a typed schema:
//!
//! ```
//! use serde::Deserialize;
//! use serde_json::json;
//! use strata::config::{ConfigBuilder, ConfigSchema, MemoryEnv};
//!
//! #[derive(Debug, Deserialize)]
//! struct AppConfig {
//!     name: String,
//!     port: u16,
//! }
//!
//! impl ConfigSchema for AppConfig {}
//!
//! let base = serde_json::from_value(json!({"name": "demo", "port": 8000})).unwrap();
//! let mut loader = ConfigBuilder::new()
//!     .schema::<AppConfig>()
//!     .config_dirs(Vec::<&str>::new())
//!     .env_files(Vec::<&str>::new())
//!     .config_data(base)
//!     .env_store(MemoryEnv::new())
//!     .build()
//!     .unwrap();
//!
//! let config = loader.load().unwrap();
//! assert_eq!(config.name, "demo");
//! assert_eq!(config.port, 8000);
//! ```

pub mod builder;
pub mod environment;
pub mod hook;
pub mod loader;
pub mod merger;
pub mod pipeline;
pub mod schema;
pub mod sources;
pub mod validator;
pub mod warn;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

/// A generic configuration tree: string keys mapped to nested values.
pub type ConfigTree = serde_json::Map<String, serde_json::Value>;

// Re-export key types at module root
pub use builder::{ConfigBuilder, DEFAULT_CONFIG_DIR, DEFAULT_ENV_FILE};
pub use environment::{read_dotenv, EnvStore, EnvironmentStage, MemoryEnv, ProcessEnv};
pub use hook::{set_path, PreLoadHook};
pub use loader::{ConfigSource, FileLoader, EXTRA_DIR_ENV};
pub use merger::{deep_merge, ConfigMerger};
pub use pipeline::{ConfigLoader, LoadState, PlannedSource, SourceKind};
pub use schema::{BaseConfig, ConfigSchema, Frozen, SchemaSettings};
pub use sources::{coerce, deserialize_lenient, env_source, layer_sources, materialize};
pub use validator::{ConfigValidator, Violations};
pub use warn::WarnMode;
