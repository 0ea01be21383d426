//! Integration test common infrastructure.
//!
//! Builds engines and hosts backed by a temporary data directory and a
//! queued sink, so tests can assert on exactly which cues were played.

#![allow(dead_code)]

use namepings::config::Config;
use namepings::host::{Host, parse_line};
use namepings::pings::{PingEngine, QueuedSink};
use namepings::state::{Participant, ParticipantId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Engine with its own data directory.
pub struct TestEngine {
    pub engine: PingEngine,
    pub sink: Arc<QueuedSink>,
    pub dir: TempDir,
}

impl TestEngine {
    /// Started engine with the given cooldown.
    pub fn new(ping_delay: u64) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path(), ping_delay);
        Self::with_config(dir, config, None)
    }

    pub fn with_config(dir: TempDir, config: Config, config_path: Option<PathBuf>) -> Self {
        let sink = Arc::new(QueuedSink::new());
        let engine = PingEngine::new(config, config_path, sink.clone());
        engine.start();
        Self { engine, sink, dir }
    }

    /// Ids that received a cue since the last call.
    pub fn cued(&self) -> Vec<ParticipantId> {
        self.sink.drain().into_iter().map(|c| c.participant).collect()
    }

    pub fn storage_path(&self) -> PathBuf {
        self.engine.config().storage.opt_out_path()
    }

    pub fn advance(&self, ticks: u64) {
        for _ in 0..ticks {
            self.engine.tick();
        }
    }
}

/// Host with its own data directory and config file.
pub struct TestHost {
    pub host: Host,
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl TestHost {
    /// Started host whose config file holds `toml`.
    pub fn new(toml: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("namepings.toml");
        write_config(&config_path, dir.path(), toml);

        let config = Config::load(&config_path).expect("config");
        let host = Host::new(config, Some(config_path.clone()));
        host.start();
        Self {
            host,
            dir,
            config_path,
        }
    }

    /// Apply one console line and return the output.
    pub fn send(&self, line: &str) -> Vec<String> {
        let event = parse_line(line).expect("parse").expect("event");
        self.host.apply(event)
    }

    /// Rewrite the config file (data_dir stays in the temp directory).
    pub fn rewrite_config(&self, toml: &str) {
        write_config(&self.config_path, self.dir.path(), toml);
    }
}

/// Default config storing data under `dir`.
pub fn config_in(dir: &Path, ping_delay: u64) -> Config {
    let mut config = Config::default();
    config.pings.ping_delay = ping_delay;
    config.storage.data_dir = dir.join("data").display().to_string();
    config
}

fn write_config(path: &Path, dir: &Path, toml: &str) {
    let data_dir = dir.join("data");
    let storage = format!("[storage]\ndata_dir = {:?}\n", data_dir.display().to_string());
    std::fs::write(path, format!("{toml}\n{storage}")).expect("write config");
}

pub fn player(name: &str) -> Participant {
    Participant::new(ParticipantId::random(), name)
}

/// Fixed ids for console scripts.
pub const BOB: &str = "00000000-0000-4000-8000-000000000b0b";
pub const ALICE: &str = "00000000-0000-4000-8000-00000000a11c";
pub const EVE: &str = "00000000-0000-4000-8000-000000000e0e";

pub fn id(s: &str) -> ParticipantId {
    s.parse().expect("participant id")
}
