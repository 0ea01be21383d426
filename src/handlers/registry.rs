//! Command registry and dispatch.

use super::{
    Context, ForcePingHandler, Handler, HandlerResult, ReloadHandler, SendPingHandler,
    TogglePingsHandler,
};
use crate::error::CommandError;
use crate::telemetry::{CommandTimer, spans};
use std::collections::HashMap;
use tracing::debug;

/// Registry of command handlers, keyed by lowercase command name.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        handlers.insert("sendping", Box::new(SendPingHandler));
        handlers.insert("forceping", Box::new(ForcePingHandler));
        handlers.insert("togglepings", Box::new(TogglePingsHandler));
        handlers.insert("reloadnamepings", Box::new(ReloadHandler));
        Self { handlers }
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run `command` on behalf of `ctx.sender`.
    ///
    /// Command names are matched case-insensitively. Player-only commands
    /// reject the console first, then the permission node is checked before
    /// the handler runs.
    pub fn dispatch(&self, ctx: &Context<'_>, command: &str, args: &[&str]) -> HandlerResult {
        let name = command.to_ascii_lowercase();
        let Some((&key, handler)) = self.handlers.get_key_value(name.as_str()) else {
            crate::metrics::record_command_error("unknown", "unknown_command");
            debug!(command = %name, "Unknown command");
            return Err(CommandError::UnknownCommand(name));
        };

        let _span = spans::command(key, ctx.sender.name()).entered();
        let _timer = CommandTimer::new(key);

        let config = ctx.engine.config();
        let result = if handler.player_only() && ctx.sender.participant().is_none() {
            Err(CommandError::PlayerOnly)
        } else if !ctx.sender.has_permission(&config.permissions, handler.permission()) {
            Err(CommandError::NoPermission(handler.permission()))
        } else {
            handler.handle(ctx, args)
        };

        if let Err(ref e) = result {
            crate::metrics::record_command_error(key, e.error_code());
            debug!(command = key, error = %e, "Command error");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_commands_registered() {
        let registry = Registry::new();
        assert_eq!(
            registry.commands(),
            vec!["forceping", "reloadnamepings", "sendping", "togglepings"]
        );
    }
}
