//! Per-participant ping cooldowns on logical time.
//!
//! Each participant's entry is the tick at which their last cue fired.
//! A participant is on cooldown while `now - last <= cooldown`, so a ping
//! exactly `cooldown` ticks old still blocks. Entries are in-memory only
//! and dropped when the participant disconnects.

use crate::state::{LogicalTick, ParticipantId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Thread-safe cooldown tracker keyed by participant.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_fired: DashMap<ParticipantId, LogicalTick>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick of the last cue for `id`, if any.
    pub fn last_tick(&self, id: &ParticipantId) -> Option<LogicalTick> {
        self.last_fired.get(id).map(|t| *t)
    }

    /// Whether `id` is still cooling down at `now`.
    pub fn is_on_cooldown(&self, id: &ParticipantId, now: LogicalTick, cooldown: u64) -> bool {
        self.last_tick(id)
            .is_some_and(|last| within_cooldown(last, now, cooldown))
    }

    /// Set the last cue tick for `id` to `now`.
    pub fn record(&self, id: &ParticipantId, now: LogicalTick) {
        self.last_fired.insert(*id, now);
    }

    /// Check and record in one step.
    ///
    /// Returns `true` and records `now` if `id` is not on cooldown; returns
    /// `false` and leaves the entry untouched otherwise. The shard lock is
    /// held across both, so two concurrent claims for the same participant
    /// cannot both succeed.
    pub fn try_claim(&self, id: &ParticipantId, now: LogicalTick, cooldown: u64) -> bool {
        match self.last_fired.entry(*id) {
            Entry::Occupied(mut entry) => {
                if within_cooldown(*entry.get(), now, cooldown) {
                    return false;
                }
                entry.insert(now);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Drop `id`'s entry (on disconnect).
    pub fn forget(&self, id: &ParticipantId) {
        self.last_fired.remove(id);
    }

    /// Drop every entry (on reload).
    pub fn clear(&self) {
        self.last_fired.clear();
    }

    /// Remove entries whose cooldown has elapsed at `now`.
    ///
    /// An expired entry and a missing entry gate the next ping the same
    /// way, so this only bounds memory. Returns the number removed.
    pub fn prune_expired(&self, now: LogicalTick, cooldown: u64) -> usize {
        let before = self.last_fired.len();
        self.last_fired
            .retain(|_, last| within_cooldown(*last, now, cooldown));
        let removed = before.saturating_sub(self.last_fired.len());
        if removed > 0 {
            debug!(removed, "pruned expired cooldowns");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}

/// Inclusive cooldown window.
#[inline]
fn within_cooldown(last: LogicalTick, now: LogicalTick, cooldown: u64) -> bool {
    now.saturating_sub(last) <= cooldown
}
