//! namepingsd - console host for the namepings engine.
//!
//! Reads roster, chat and command events from stdin (see
//! [`namepings::host::console`]) and prints what happened.

use namepings::config::{self, Config};
use namepings::host::{Host, HostEvent, parse_line, tick_interval};
use namepings::{metrics, telemetry};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Config file used when none is given on the command line.
const DEFAULT_CONFIG: &str = "namepings.toml";

/// Parsed events waiting for the main loop.
const EVENT_CHANNEL_SIZE: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let (config, config_path) = load_config()?;
    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "Refusing to start with {} configuration error(s)",
            errors.len()
        ));
    }

    metrics::init();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting namepingsd");

    let tick = Duration::from_millis(config.pings.tick_millis);
    let host = Host::new(config, config_path);
    host.start();

    // Stdin reader: parse lines here, hand events to the main loop.
    let (event_tx, mut event_rx) = mpsc::channel::<HostEvent>(EVENT_CHANNEL_SIZE);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read console input");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Some(event)) => {
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => println!("error: {e}"),
            }
        }
    });

    let mut interval = tick_interval(tick);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(pruned) = host.tick()
                    && pruned > 0
                {
                    info!(removed = pruned, "Expired cooldowns pruned");
                }
            }
            event = event_rx.recv() => match event {
                Some(event) => {
                    for line in host.apply(event) {
                        println!("{line}");
                    }
                }
                None => {
                    info!("Console input closed");
                    break;
                }
            },
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for interrupt");
                }
                info!("Interrupt received");
                break;
            }
        }
    }

    host.shutdown();
    Ok(())
}

/// Load the config named on the command line, or `namepings.toml` when it
/// exists, or the built-in defaults.
fn load_config() -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                info!("No config file, using defaults");
                return Ok((Config::default(), None));
            }
            default
        }
    };

    let config = Config::load(&path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to load config");
        e
    })?;
    Ok((config, Some(path)))
}
