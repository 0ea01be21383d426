//! Notification dispatcher: the only path to a ping cue.
//!
//! Mention pings and command pings both go through
//! [`NotificationDispatcher::dispatch`], which applies, in order:
//! 1. opt-out: opted-out participants are never pinged
//! 2. cooldown: the last cue must be more than `cooldown` ticks old
//! 3. fire: record the tick and play the cue through the sink

use super::cooldown::CooldownTracker;
use super::opt_out::OptOutRegistry;
use super::sink::NotificationSink;
use crate::config::PingsConfig;
use crate::state::{LogicalTick, ParticipantId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Cue and cooldown applied to every dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Cue identifier passed to the sink.
    pub cue: String,
    /// Cooldown length in ticks (inclusive).
    pub cooldown: u64,
}

impl From<&PingsConfig> for DispatchPolicy {
    fn from(config: &PingsConfig) -> Self {
        Self {
            cue: config.sound_name.clone(),
            cooldown: config.ping_delay,
        }
    }
}

/// Result of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The cue was played.
    Fired,
    /// The participant has opted out.
    OptedOut,
    /// The participant was pinged too recently.
    OnCooldown,
}

impl DispatchOutcome {
    #[inline]
    pub fn fired(self) -> bool {
        self == Self::Fired
    }

    /// Label for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fired => "fired",
            Self::OptedOut => "opted_out",
            Self::OnCooldown => "cooldown",
        }
    }
}

/// Gatekeeper for ping cues.
pub struct NotificationDispatcher {
    opt_outs: OptOutRegistry,
    cooldowns: CooldownTracker,
    sink: Arc<dyn NotificationSink>,
    policy: RwLock<Arc<DispatchPolicy>>,
}

impl NotificationDispatcher {
    pub fn new(policy: DispatchPolicy, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            opt_outs: OptOutRegistry::new(),
            cooldowns: CooldownTracker::new(),
            sink,
            policy: RwLock::new(Arc::new(policy)),
        }
    }

    /// Ping `participant` at `now` if policy allows. Returns whether the
    /// cue fired.
    #[inline]
    pub fn dispatch(&self, participant: &ParticipantId, now: LogicalTick) -> bool {
        self.try_dispatch(participant, now).fired()
    }

    /// Like [`dispatch`](Self::dispatch) but reports why a ping did not fire.
    pub fn try_dispatch(&self, participant: &ParticipantId, now: LogicalTick) -> DispatchOutcome {
        if self.opt_outs.is_opted_out(participant) {
            debug!(participant = %participant, "ping suppressed: opted out");
            return DispatchOutcome::OptedOut;
        }

        let policy = self.policy();
        if !self.cooldowns.try_claim(participant, now, policy.cooldown) {
            debug!(participant = %participant, now, "ping suppressed: cooldown");
            return DispatchOutcome::OnCooldown;
        }

        self.sink.play_cue(participant, &policy.cue);
        debug!(participant = %participant, now, cue = %policy.cue, "ping fired");
        DispatchOutcome::Fired
    }

    /// Current policy.
    pub fn policy(&self) -> Arc<DispatchPolicy> {
        Arc::clone(&self.policy.read())
    }

    /// Replace the policy (reload). Existing cooldown entries are kept.
    pub fn set_policy(&self, policy: DispatchPolicy) {
        *self.policy.write() = Arc::new(policy);
    }

    pub fn opt_outs(&self) -> &OptOutRegistry {
        &self.opt_outs
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }
}
