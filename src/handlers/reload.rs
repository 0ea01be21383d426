//! `reloadnamepings`

use super::{Context, Handler, HandlerResult, Reply};
use crate::config::permissions::RELOAD;
use tracing::info;

/// Re-read the config file and reload the engine.
pub struct ReloadHandler;

impl Handler for ReloadHandler {
    fn permission(&self) -> &'static str {
        RELOAD
    }

    fn handle(&self, ctx: &Context<'_>, _args: &[&str]) -> HandlerResult {
        info!(by = %ctx.sender.name(), "Reload requested");
        ctx.engine.reload_from_disk()?;
        Ok(vec![Reply::sender("Reload complete.")])
    }
}
