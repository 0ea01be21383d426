//! Configuration validation.
//!
//! Validates configuration at startup and on reload to catch common errors
//! before they reach the engine.

use super::Config;
use super::permissions::ALL_NODES;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("pings.sound_name must not be empty")]
    EmptySoundName,
    #[error("pings.tick_millis must be greater than zero")]
    ZeroTickMillis,
    #[error("pings.maintenance_interval must be greater than zero")]
    ZeroMaintenanceInterval,
    #[error("storage.blocked_pings_file must not be empty")]
    EmptyBlockedPingsFile,
    #[error("permissions.default contains unknown node '{0}'")]
    UnknownPermission(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.pings.sound_name.trim().is_empty() {
        errors.push(ValidationError::EmptySoundName);
    }
    if config.pings.tick_millis == 0 {
        errors.push(ValidationError::ZeroTickMillis);
    }
    if config.pings.maintenance_interval == 0 {
        errors.push(ValidationError::ZeroMaintenanceInterval);
    }

    if config.storage.blocked_pings_file.trim().is_empty() {
        errors.push(ValidationError::EmptyBlockedPingsFile);
    }

    for node in &config.permissions.default {
        if !ALL_NODES.contains(&node.as_str()) {
            errors.push(ValidationError::UnknownPermission(node.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
