//! Permission nodes and their grants.

use serde::Deserialize;

use super::defaults::default_permissions;
use crate::state::ParticipantId;

pub const SENDPING: &str = "namepings.command.sendping";
pub const TOGGLEPINGS: &str = "namepings.command.togglepings";
pub const FORCEPING: &str = "namepings.command.forceping";
pub const RELOAD: &str = "namepings.command.reload";

/// Every node the command layer checks.
pub const ALL_NODES: &[&str] = &[SENDPING, TOGGLEPINGS, FORCEPING, RELOAD];

/// Permission grants.
///
/// The console always has every node. Players get `default`, operators get
/// everything.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionsConfig {
    /// Nodes granted to every player.
    #[serde(default = "default_permissions")]
    pub default: Vec<String>,
    /// Participants granted every node.
    #[serde(default)]
    pub operators: Vec<ParticipantId>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            default: default_permissions(),
            operators: Vec::new(),
        }
    }
}

impl PermissionsConfig {
    /// Check whether a player holds `node`.
    pub fn player_has(&self, id: &ParticipantId, node: &str) -> bool {
        self.operators.contains(id) || self.default.iter().any(|n| n == node)
    }
}
