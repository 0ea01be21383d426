//! Ping engine: owns all ping state and exposes the host-facing operations.
//!
//! The host drives the engine with plain synchronous calls:
//! - `tick()` once per quantum
//! - `on_chat()` for every chat message
//! - `on_disconnect()` when a participant leaves
//! - `ping()` / `toggle_opt_out()` from the command layer
//! - `start()`, `reload()` and `shutdown()` at lifecycle boundaries
//!
//! All state is concurrency-safe, so chat may be delivered from a worker
//! thread. Only `start`, `reload`, `flush` and `shutdown` touch the disk.

use super::dispatcher::{DispatchOutcome, DispatchPolicy, NotificationDispatcher};
use super::mention;
use super::opt_out::OptOutRegistry;
use super::sink::NotificationSink;
use crate::config::{Config, validate};
use crate::error::{PersistenceError, ReloadError};
use crate::metrics;
use crate::state::{LogicalClock, LogicalTick, Participant, ParticipantId};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// What triggered a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingSource {
    /// Display name seen in chat.
    Mention,
    /// `sendping` / `forceping`.
    Command,
}

impl PingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Command => "command",
        }
    }
}

/// The ping engine.
pub struct PingEngine {
    config: RwLock<Arc<Config>>,
    /// File the config was read from; `reload_from_disk` re-reads it.
    config_path: Option<PathBuf>,
    clock: LogicalClock,
    dispatcher: NotificationDispatcher,
    /// Set while the opt-out file on disk could not be read. Saving then
    /// would replace it with whatever is in memory, so flushes are refused.
    load_failed: AtomicBool,
}

impl PingEngine {
    /// Build an engine with empty state. Does no I/O; call [`start`](Self::start).
    pub fn new(config: Config, config_path: Option<PathBuf>, sink: Arc<dyn NotificationSink>) -> Self {
        let policy = DispatchPolicy::from(&config.pings);
        Self {
            config: RwLock::new(Arc::new(config)),
            config_path,
            clock: LogicalClock::new(),
            dispatcher: NotificationDispatcher::new(policy, sink),
            load_failed: AtomicBool::new(false),
        }
    }

    /// Load the opt-out list, creating the file when it does not exist yet.
    pub fn start(&self) {
        let config = self.config();
        info!(
            sound = %config.pings.sound_name,
            ping_delay = config.pings.ping_delay,
            name_pings = config.pings.enable_name_pings,
            "Configuration loaded"
        );

        let data_dir = PathBuf::from(&config.storage.data_dir);
        if !data_dir.is_dir()
            && let Err(e) = std::fs::create_dir_all(&data_dir)
        {
            warn!(path = %data_dir.display(), error = %e, "Unable to create data directory");
        }

        self.load_registry();
    }

    /// Current configuration.
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config.read())
    }

    /// Advance logical time by one quantum.
    #[inline]
    pub fn tick(&self) -> LogicalTick {
        self.clock.advance()
    }

    #[inline]
    pub fn now(&self) -> LogicalTick {
        self.clock.now()
    }

    /// Handle a chat message; pings every recipient named in it.
    ///
    /// Returns the participants whose cue actually fired. Does nothing when
    /// name pings are disabled.
    pub fn on_chat(&self, message: &str, recipients: &[Participant]) -> Vec<ParticipantId> {
        if !self.config().pings.enable_name_pings {
            return Vec::new();
        }

        let mentioned = mention::scan(message, recipients);
        if mentioned.is_empty() {
            return Vec::new();
        }
        metrics::record_mentions(mentioned.len());

        let now = self.now();
        mentioned
            .into_iter()
            .filter(|p| self.dispatch(&p.id, now, PingSource::Mention).fired())
            .map(|p| p.id)
            .collect()
    }

    /// Forget cooldown state for a participant that left.
    pub fn on_disconnect(&self, id: &ParticipantId) {
        self.dispatcher.cooldowns().forget(id);
    }

    /// Ping a participant directly, bypassing mention detection but not
    /// opt-out or cooldown. Returns whether the cue fired.
    pub fn ping(&self, id: &ParticipantId) -> bool {
        self.dispatch(id, self.now(), PingSource::Command).fired()
    }

    pub fn is_opted_out(&self, id: &ParticipantId) -> bool {
        self.dispatcher.opt_outs().is_opted_out(id)
    }

    /// Flip a participant's opt-out, returning `true` when now opted out.
    pub fn toggle_opt_out(&self, id: &ParticipantId) -> bool {
        let opted_out = self.dispatcher.opt_outs().toggle(id);
        metrics::record_opt_out_toggle(self.dispatcher.opt_outs().len());
        info!(participant = %id, opted_out, "Ping opt-out toggled");
        opted_out
    }

    pub fn opt_outs(&self) -> &OptOutRegistry {
        self.dispatcher.opt_outs()
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Remove cooldown entries that have already expired.
    pub fn maintain(&self) -> usize {
        let cooldown = self.dispatcher.policy().cooldown;
        self.dispatcher.cooldowns().prune_expired(self.now(), cooldown)
    }

    /// Save the opt-out list.
    ///
    /// Refused while the file on disk failed to load, so an unreadable list
    /// is never overwritten.
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let path = self.config().storage.opt_out_path();
        if self.load_failed.load(Ordering::Acquire) {
            return Err(PersistenceError::NotLoaded { path });
        }
        self.dispatcher.opt_outs().save(&path)
    }

    /// Apply a new configuration.
    ///
    /// Saves the opt-out list, swaps config and policy, clears every
    /// cooldown and reloads the opt-out list from the (possibly new) path.
    /// Logical time keeps running.
    pub fn reload(&self, config: Config) {
        info!("Reloading");
        self.flush_logged();

        self.dispatcher.set_policy(DispatchPolicy::from(&config.pings));
        *self.config.write() = Arc::new(config);
        self.dispatcher.cooldowns().clear();

        self.start();
    }

    /// Re-read and validate the config file, then [`reload`](Self::reload).
    ///
    /// Without a config file the current configuration is reapplied. On
    /// error nothing changes.
    pub fn reload_from_disk(&self) -> Result<(), ReloadError> {
        let config = match &self.config_path {
            Some(path) => {
                let config = Config::load(path)?;
                validate(&config).map_err(ReloadError::Invalid)?;
                config
            }
            None => (*self.config()).clone(),
        };
        self.reload(config);
        Ok(())
    }

    /// Persist state before the host exits.
    pub fn shutdown(&self) {
        info!("Shutting down");
        self.flush_logged();
    }

    fn dispatch(&self, id: &ParticipantId, now: LogicalTick, source: PingSource) -> DispatchOutcome {
        let outcome = self.dispatcher.try_dispatch(id, now);
        match outcome {
            DispatchOutcome::Fired => metrics::record_ping_fired(source.as_str()),
            other => metrics::record_ping_suppressed(other.as_str()),
        }
        debug!(participant = %id, source = source.as_str(), outcome = outcome.as_str(), "ping dispatched");
        outcome
    }

    fn load_registry(&self) {
        let path = self.config().storage.opt_out_path();
        let registry = self.dispatcher.opt_outs();

        let missing = !path.exists();
        if missing {
            warn!(path = %path.display(), "Opt-out list does not exist, it will be created");
        }

        match registry.load(&path) {
            Ok(_) => {
                self.load_failed.store(false, Ordering::Release);
                if missing && let Err(e) = registry.save(&path) {
                    warn!(error = %e, "Failed to create opt-out list");
                }
            }
            Err(e) => {
                self.load_failed.store(true, Ordering::Release);
                warn!(error = %e, "Failed to load opt-out list; it will not be saved until a reload succeeds");
            }
        }

        metrics::set_opted_out(registry.len());
    }

    fn flush_logged(&self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to save opt-out list; changes will not survive a restart");
        }
    }
}
