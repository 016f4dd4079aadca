//! Prometheus metrics for command dispatch.
//!
//! - `slcmd_dispatch_total{outcome}` - Dispatches by final outcome
//! - `slcmd_command_total{command}` - Commands executed by invocation
//! - `slcmd_command_duration_seconds{command}` - Command latency histogram
//! - `slcmd_command_errors_total{kind}` - Reported failures by error kind
//!
//! Recording functions are no-ops until [`init`] has run, so library users
//! that do not care about metrics pay nothing.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Dispatches by outcome (`completed`, `no_prefix`, `failed`, ...).
pub static DISPATCH_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Commands executed by primary invocation.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command execution latency by primary invocation.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Reported dispatch failures by error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the metrics and register them with [`registry`].
///
/// Calling it more than once is harmless; later calls only log that the
/// metrics are already registered.
pub fn init() -> prometheus::Result<()> {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init?;
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::debug!(error = %e, concat!("Metric not registered: ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(DISPATCH_COUNTER, IntCounterVec::new(
        Opts::new("slcmd_dispatch_total", "Message dispatches by outcome"),
        &["outcome"]));
    register!(COMMAND_COUNTER, IntCounterVec::new(
        Opts::new("slcmd_command_total", "Commands executed by invocation"),
        &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("slcmd_command_duration_seconds", "Command latency by invocation")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(
        Opts::new("slcmd_command_errors_total", "Dispatch failures by error kind"),
        &["kind"]));

    Ok(())
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

/// Record the final outcome of one dispatch.
#[inline]
pub fn record_dispatch(outcome: &str) {
    if let Some(c) = DISPATCH_COUNTER.get() {
        c.with_label_values(&[outcome]).inc();
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

/// Record a reported dispatch failure.
#[inline]
pub fn record_command_error(kind: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[kind]).inc();
    }
}
