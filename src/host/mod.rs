//! Console host: applies roster, chat and command events to the engine and
//! renders what happened as output lines.
//!
//! The host owns the engine, the roster and the command registry. The
//! binary feeds it parsed [`HostEvent`]s from one task, so it needs no
//! locking of its own.

pub mod console;

pub use console::{ConsoleError, HostEvent, SenderRef, parse_line};

use crate::config::Config;
use crate::handlers::{CommandSender, Context, Registry, Reply};
use crate::metrics;
use crate::pings::{PingEngine, QueuedSink};
use crate::state::{Participant, ParticipantId, Roster};
use crate::telemetry::spans;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, Interval, interval_at};
use tracing::{debug, info};

/// Events that refer to someone who is not online.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("participant {0} is not online")]
    NotOnline(ParticipantId),
}

/// Timer for the tick loop. The first tick fires one `period` after the
/// call, not immediately.
pub fn tick_interval(period: Duration) -> Interval {
    interval_at(Instant::now() + period, period)
}

pub struct Host {
    engine: PingEngine,
    roster: Roster,
    registry: Registry,
    cues: Arc<QueuedSink>,
}

impl Host {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let cues = Arc::new(QueuedSink::new());
        Self {
            engine: PingEngine::new(config, config_path, cues.clone()),
            roster: Roster::new(),
            registry: Registry::new(),
            cues,
        }
    }

    pub fn engine(&self) -> &PingEngine {
        &self.engine
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn start(&self) {
        self.engine.start();
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    /// Advance one tick, pruning cooldowns every `maintenance_interval`
    /// ticks. Returns the number pruned when maintenance ran.
    pub fn tick(&self) -> Option<usize> {
        let now = self.engine.tick();
        let interval = self.engine.config().pings.maintenance_interval;
        if interval == 0 || now % interval != 0 {
            return None;
        }
        let pruned = self.engine.maintain();
        debug!(now, pruned, "Cooldown maintenance");
        Some(pruned)
    }

    /// Apply one event and return the lines to print.
    pub fn apply(&self, event: HostEvent) -> Vec<String> {
        let mut out = match self.apply_event(event) {
            Ok(lines) => lines,
            Err(e) => vec![format!("error: {e}")],
        };
        out.extend(self.render_cues());
        out
    }

    fn apply_event(&self, event: HostEvent) -> Result<Vec<String>, HostError> {
        let lines = match event {
            HostEvent::Join { id, name } => {
                let line = format!("* {name} joined");
                self.roster.join(Participant::new(id, name));
                vec![line]
            }
            HostEvent::Quit { id } => {
                let participant = self.roster.leave(&id).ok_or(HostError::NotOnline(id))?;
                self.engine.on_disconnect(&id);
                vec![format!("* {} left", participant.name)]
            }
            HostEvent::Rename { id, name } => {
                let old = self.online(&id)?.name;
                self.roster.rename(&id, name.as_str());
                vec![format!("* {old} is now {name}")]
            }
            HostEvent::Chat { id, message } => {
                let sender = self.online(&id)?;
                let recipients = self.roster.snapshot();
                let _span = spans::chat(&sender.name, recipients.len()).entered();
                self.engine.on_chat(&message, &recipients);
                vec![format!("<{}> {message}", sender.name)]
            }
            HostEvent::Command {
                sender,
                command,
                args,
            } => {
                let sender = match sender {
                    SenderRef::Console => CommandSender::Console,
                    SenderRef::Player(id) => CommandSender::Player(self.online(&id)?),
                };
                self.run_command(&sender, &command, &args)
            }
            HostEvent::Stats => self.stats(),
        };
        Ok(lines)
    }

    fn online(&self, id: &ParticipantId) -> Result<Participant, HostError> {
        self.roster.get(id).ok_or(HostError::NotOnline(*id))
    }

    fn run_command(&self, sender: &CommandSender, command: &str, args: &[String]) -> Vec<String> {
        let ctx = Context {
            engine: &self.engine,
            roster: &self.roster,
            sender,
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match self.registry.dispatch(&ctx, command, &args) {
            Ok(replies) => replies
                .into_iter()
                .map(|reply| self.render_reply(sender, reply))
                .collect(),
            Err(e) => vec![format!("[to {}] {}", sender.name(), e.user_message())],
        }
    }

    fn render_reply(&self, sender: &CommandSender, reply: Reply) -> String {
        match reply {
            Reply::Sender(text) => format!("[to {}] {text}", sender.name()),
            Reply::Participant { to, text } => format!("[to {}] {text}", self.display_name(&to)),
        }
    }

    fn render_cues(&self) -> Vec<String> {
        self.cues
            .drain()
            .into_iter()
            .map(|cue| {
                info!(participant = %cue.participant, cue = %cue.cue, "Playing ping cue");
                format!("[cue {}] {}", self.display_name(&cue.participant), cue.cue)
            })
            .collect()
    }

    fn display_name(&self, id: &ParticipantId) -> String {
        self.roster
            .get(id)
            .map_or_else(|| id.to_string(), |p| p.name)
    }

    fn stats(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "online={} opted_out={} cooldowns={} tick={}",
            self.roster.len(),
            self.engine.opt_outs().len(),
            self.engine.dispatcher().cooldowns().len(),
            self.engine.now(),
        )];
        lines.extend(metrics::gather_metrics().lines().map(str::to_string));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(dir: &std::path::Path) -> Host {
        let mut config = Config::default();
        config.storage.data_dir = dir.display().to_string();
        config.pings.maintenance_interval = 3;
        let host = Host::new(config, None);
        host.start();
        host
    }

    fn apply(host: &Host, line: &str) -> Vec<String> {
        let event = parse_line(line).unwrap().unwrap();
        host.apply(event)
    }

    const BOB: &str = "00000000-0000-4000-8000-000000000001";
    const ALICE: &str = "00000000-0000-4000-8000-000000000002";

    #[tokio::test]
    async fn test_tick_interval_waits_one_period() {
        let mut timer = tick_interval(Duration::from_secs(3600));
        let first = tokio::time::timeout(Duration::from_millis(20), timer.tick()).await;
        assert!(first.is_err());
    }

    #[test]
    fn test_chat_renders_cue() {
        let dir = tempfile::tempdir().unwrap();
        let host = host(dir.path());
        apply(&host, &format!("join {BOB} Bob"));
        apply(&host, &format!("join {ALICE} Alice"));

        let out = apply(&host, &format!("chat {ALICE} hi Bob"));
        assert_eq!(
            out,
            vec![
                "<Alice> hi Bob".to_string(),
                "[cue Bob] block.note_block.pling".to_string(),
            ]
        );
    }

    #[test]
    fn test_chat_from_offline_participant() {
        let dir = tempfile::tempdir().unwrap();
        let host = host(dir.path());
        let out = apply(&host, &format!("chat {BOB} hello"));
        assert_eq!(out, vec![format!("error: participant {BOB} is not online")]);
    }

    #[test]
    fn test_console_sendping() {
        let dir = tempfile::tempdir().unwrap();
        let host = host(dir.path());
        apply(&host, &format!("join {BOB} Bob"));

        let out = apply(&host, "cmd console sendping bob");
        assert_eq!(
            out,
            vec![
                "[to Bob] You were pinged by Console".to_string(),
                "[to Console] Pinged Bob.".to_string(),
                "[cue Bob] block.note_block.pling".to_string(),
            ]
        );
    }

    #[test]
    fn test_tick_runs_maintenance_on_interval() {
        let dir = tempfile::tempdir().unwrap();
        let host = host(dir.path());
        assert_eq!(host.tick(), None);
        assert_eq!(host.tick(), None);
        assert_eq!(host.tick(), Some(0));
    }

    #[test]
    fn test_quit_forgets_cooldown() {
        let dir = tempfile::tempdir().unwrap();
        let host = host(dir.path());
        apply(&host, &format!("join {BOB} Bob"));
        apply(&host, "cmd console forceping Bob");

        let bob: ParticipantId = BOB.parse().unwrap();
        assert!(host.engine().dispatcher().cooldowns().last_tick(&bob).is_some());
        assert_eq!(apply(&host, &format!("quit {BOB}")), vec!["* Bob left".to_string()]);
        assert!(host.engine().dispatcher().cooldowns().last_tick(&bob).is_none());
    }
}
