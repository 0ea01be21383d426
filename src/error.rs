//! Unified error handling for namepings.
//!
//! Nothing here is fatal to the host: persistence errors are logged and
//! the in-memory state stays authoritative, command errors become a reply
//! to whoever issued the command.

use crate::config::permissions::{RELOAD, TOGGLEPINGS};
use crate::config::{ConfigError, ValidationError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Persistence Errors (opt-out registry storage)
// ============================================================================

/// Failure reading or writing the opt-out file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to overwrite {}: it could not be loaded", path.display())]
    NotLoaded { path: PathBuf },
}

// ============================================================================
// Reload Errors
// ============================================================================

/// Failure re-reading configuration for a reload.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Command Errors
// ============================================================================

/// Errors surfaced to the sender of a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("permission denied: {0}")]
    NoPermission(&'static str),

    #[error("expected exactly one target, got {0}")]
    InvalidUsage(usize),

    #[error("no such player: {0}")]
    PlayerNotFound(String),

    #[error("player {0} does not allow pings")]
    PingsBlocked(String),

    #[error("command requires a player sender")]
    PlayerOnly,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("reload failed: {0}")]
    Reload(#[from] ReloadError),
}

impl CommandError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoPermission(_) => "no_permission",
            Self::InvalidUsage(_) => "invalid_usage",
            Self::PlayerNotFound(_) => "player_not_found",
            Self::PingsBlocked(_) => "pings_blocked",
            Self::PlayerOnly => "player_only",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Reload(_) => "reload_failed",
        }
    }

    /// Text shown to the command sender.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoPermission(TOGGLEPINGS | RELOAD) => "You do not have permission!".to_string(),
            Self::NoPermission(_) => "You do not have permission.".to_string(),
            Self::InvalidUsage(_) => {
                "Invalid usage, you must specify exactly one target!".to_string()
            }
            Self::PlayerNotFound(_) => "That player could not be found!".to_string(),
            Self::PingsBlocked(_) => "That player does not allow pings!".to_string(),
            Self::PlayerOnly => "That command can only be used by a player!".to_string(),
            Self::UnknownCommand(_) => "Unknown command!  Please report this error!".to_string(),
            Self::Reload(e) => format!("Reload failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_codes() {
        assert_eq!(CommandError::PlayerOnly.error_code(), "player_only");
        assert_eq!(
            CommandError::PlayerNotFound("x".into()).error_code(),
            "player_not_found"
        );
        assert_eq!(CommandError::InvalidUsage(2).error_code(), "invalid_usage");
    }

    #[test]
    fn test_command_error_user_messages() {
        assert_eq!(
            CommandError::PingsBlocked("Bob".into()).user_message(),
            "That player does not allow pings!"
        );
        assert_eq!(
            CommandError::NoPermission("namepings.command.forceping").user_message(),
            "You do not have permission."
        );
        assert_eq!(
            CommandError::NoPermission(TOGGLEPINGS).user_message(),
            "You do not have permission!"
        );
    }

    #[test]
    fn test_persistence_error_mentions_path() {
        let err = PersistenceError::Write {
            path: PathBuf::from("/data/blocked_pings.lst"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("blocked_pings.lst"));
    }

    #[test]
    fn test_reload_error_lists_all_problems() {
        let err = ReloadError::Invalid(vec![
            ValidationError::EmptySoundName,
            ValidationError::ZeroTickMillis,
        ]);
        let text = err.to_string();
        assert!(text.contains("sound_name"));
        assert!(text.contains("tick_millis"));
    }
}
