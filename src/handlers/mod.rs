//! Command handlers.
//!
//! This module contains the [`Handler`] trait and the command [`Registry`]
//! that routes a command name to its handler. Every handler names the
//! permission node it needs; the registry checks it before the handler
//! runs.

mod ping;
mod registry;
mod reload;
mod toggle;

pub use ping::{ForcePingHandler, SendPingHandler};
pub use registry::Registry;
pub use reload::ReloadHandler;
pub use toggle::TogglePingsHandler;

use crate::config::PermissionsConfig;
use crate::error::CommandError;
use crate::pings::PingEngine;
use crate::state::{Participant, ParticipantId, Roster};

/// Display name used when the console issues a command.
pub const CONSOLE_NAME: &str = "Console";

/// Who issued a command.
#[derive(Debug, Clone)]
pub enum CommandSender {
    /// The host console. Holds every permission but is not a participant.
    Console,
    /// An online participant.
    Player(Participant),
}

impl CommandSender {
    pub fn name(&self) -> &str {
        match self {
            Self::Console => CONSOLE_NAME,
            Self::Player(p) => &p.name,
        }
    }

    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Self::Console => None,
            Self::Player(p) => Some(p),
        }
    }

    /// Check a permission node against the configured grants.
    pub fn has_permission(&self, permissions: &PermissionsConfig, node: &str) -> bool {
        match self {
            Self::Console => true,
            Self::Player(p) => permissions.player_has(&p.id, node),
        }
    }
}

/// A line of output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Shown to whoever issued the command.
    Sender(String),
    /// Shown to another participant.
    Participant { to: ParticipantId, text: String },
}

impl Reply {
    pub fn sender(text: impl Into<String>) -> Self {
        Self::Sender(text.into())
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The ping engine.
    pub engine: &'a PingEngine,
    /// Online participants, for target lookup.
    pub roster: &'a Roster,
    /// Who issued the command.
    pub sender: &'a CommandSender,
}

pub type HandlerResult = Result<Vec<Reply>, CommandError>;

/// A command handler.
pub trait Handler: Send + Sync {
    /// Permission node required to run the command.
    fn permission(&self) -> &'static str;

    /// Whether only a player (not the console) may run the command. Checked
    /// before the permission node.
    fn player_only(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &Context<'_>, args: &[&str]) -> HandlerResult;
}
