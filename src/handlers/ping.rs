//! `sendping` and `forceping`.

use super::{Context, Handler, HandlerResult, Reply};
use crate::config::permissions::{FORCEPING, SENDPING};
use crate::error::CommandError;
use crate::state::Participant;

/// Ping one online participant by name, honouring their opt-out.
pub struct SendPingHandler;

impl Handler for SendPingHandler {
    fn permission(&self) -> &'static str {
        SENDPING
    }

    fn handle(&self, ctx: &Context<'_>, args: &[&str]) -> HandlerResult {
        let target = resolve_target(ctx, args)?;
        if ctx.engine.is_opted_out(&target.id) {
            return Err(CommandError::PingsBlocked(target.name));
        }
        Ok(ping(ctx, &target))
    }
}

/// Ping one online participant by name without the opt-out pre-check.
///
/// The dispatcher still refuses to ping an opted-out participant, but the
/// sender is told "Pinged" either way.
pub struct ForcePingHandler;

impl Handler for ForcePingHandler {
    fn permission(&self) -> &'static str {
        FORCEPING
    }

    fn handle(&self, ctx: &Context<'_>, args: &[&str]) -> HandlerResult {
        let target = resolve_target(ctx, args)?;
        Ok(ping(ctx, &target))
    }
}

fn resolve_target(ctx: &Context<'_>, args: &[&str]) -> Result<Participant, CommandError> {
    let [name] = args else {
        return Err(CommandError::InvalidUsage(args.len()));
    };
    ctx.roster
        .find_by_name(name)
        .ok_or_else(|| CommandError::PlayerNotFound((*name).to_string()))
}

fn ping(ctx: &Context<'_>, target: &Participant) -> Vec<Reply> {
    let mut replies = Vec::with_capacity(2);
    if ctx.engine.ping(&target.id) {
        replies.push(Reply::Participant {
            to: target.id,
            text: format!("You were pinged by {}", ctx.sender.name()),
        });
    }
    replies.push(Reply::sender(format!("Pinged {}.", target.name)));
    replies
}
