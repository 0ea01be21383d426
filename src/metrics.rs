//! Prometheus metrics collection for namepings.
//!
//! Metrics live in a process-global registry and are rendered in text
//! format by [`gather_metrics`] (the console `stats` command prints it).
//! Recording before [`init`] is a silent no-op.
//!
//! - `namepings_pings_fired_total{source}` - Cues actually played
//! - `namepings_pings_suppressed_total{reason}` - Pings blocked by opt-out or cooldown
//! - `namepings_mentions_matched_total` - Name matches found in chat
//! - `namepings_command_total{command}` - Commands processed by name

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Cues played, by trigger source (mention, command).
pub static PINGS_FIRED: OnceLock<IntCounterVec> = OnceLock::new();

/// Pings that reached the dispatcher but did not fire, by reason.
pub static PINGS_SUPPRESSED: OnceLock<IntCounterVec> = OnceLock::new();

/// Name matches found by the mention scanner.
pub static MENTIONS_MATCHED: OnceLock<IntCounter> = OnceLock::new();

/// Opt-out toggles.
pub static OPT_OUT_TOGGLES: OnceLock<IntCounter> = OnceLock::new();

/// Commands processed by name.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command errors by name and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Command processing latency by name.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Participants currently opted out.
pub static OPTED_OUT: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(PINGS_FIRED, IntCounterVec::new(Opts::new("namepings_pings_fired_total", "Notification cues played"), &["source"]));
    register!(PINGS_SUPPRESSED, IntCounterVec::new(Opts::new("namepings_pings_suppressed_total", "Pings blocked before the cue"), &["reason"]));
    register!(MENTIONS_MATCHED, IntCounter::new("namepings_mentions_matched_total", "Display-name matches found in chat"));
    register!(OPT_OUT_TOGGLES, IntCounter::new("namepings_opt_out_toggles_total", "Opt-out toggles"));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("namepings_command_total", "Commands processed by name"), &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("namepings_command_errors_total", "Command errors by name"), &["command", "error"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("namepings_command_duration_seconds", "Command latency by name")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["command"]));
    register!(OPTED_OUT, IntGauge::new("namepings_opted_out_participants", "Participants currently opted out"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

/// Record a cue that was played.
#[inline]
pub fn record_ping_fired(source: &str) {
    if let Some(c) = PINGS_FIRED.get() {
        c.with_label_values(&[source]).inc();
    }
}

/// Record a ping stopped by the dispatcher.
#[inline]
pub fn record_ping_suppressed(reason: &str) {
    if let Some(c) = PINGS_SUPPRESSED.get() {
        c.with_label_values(&[reason]).inc();
    }
}

#[inline]
pub fn record_mentions(count: usize) {
    if let Some(c) = MENTIONS_MATCHED.get() {
        c.inc_by(count as u64);
    }
}

/// Record an opt-out toggle and the resulting registry size.
#[inline]
pub fn record_opt_out_toggle(opted_out: usize) {
    if let Some(c) = OPT_OUT_TOGGLES.get() {
        c.inc();
    }
    set_opted_out(opted_out);
}

#[inline]
pub fn set_opted_out(count: usize) {
    if let Some(g) = OPTED_OUT.get() {
        g.set(count as i64);
    }
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}
