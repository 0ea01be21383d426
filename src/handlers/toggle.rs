//! `togglepings`

use super::{Context, Handler, HandlerResult, Reply};
use crate::config::permissions::TOGGLEPINGS;
use crate::error::CommandError;

pub struct TogglePingsHandler;

impl Handler for TogglePingsHandler {
    fn permission(&self) -> &'static str {
        TOGGLEPINGS
    }

    fn player_only(&self) -> bool {
        true
    }

    fn handle(&self, ctx: &Context<'_>, _args: &[&str]) -> HandlerResult {
        let player = ctx.sender.participant().ok_or(CommandError::PlayerOnly)?;
        let text = if ctx.engine.toggle_opt_out(&player.id) {
            "Pings are now disabled."
        } else {
            "Pings are now enabled."
        };
        Ok(vec![Reply::sender(text)])
    }
}
