//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, PingsConfig, StorageConfig)
//! - [`permissions`]: Permission nodes and grants (PermissionsConfig)
//! - [`defaults`]: Serde default values
//! - [`validation`]: Startup/reload validation

mod defaults;
pub mod permissions;
mod types;
mod validation;

pub use permissions::PermissionsConfig;
pub use types::{Config, ConfigError, PingsConfig, StorageConfig};
pub use validation::{ValidationError, validate};
