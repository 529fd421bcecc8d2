//! Prometheus metrics collection for sigrelay.
//!
//! Exposed on the `/metrics` endpoint served by [`crate::http`].
//!
//! - `sigrelay_connections` - Open WebSocket connections (gauge)
//! - `sigrelay_registered_clients` - Registry size (gauge)
//! - `sigrelay_frames_received_total` - Inbound frames, any shape
//! - `sigrelay_frames_forwarded_total` - Frames delivered to a destination queue
//! - `sigrelay_frames_dropped_total{reason}` - Frames discarded, by reason

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Total frames received from clients.
pub static FRAMES_RECEIVED: OnceLock<IntCounter> = OnceLock::new();

/// Total frames queued to a destination connection.
pub static FRAMES_FORWARDED: OnceLock<IntCounter> = OnceLock::new();

/// Frames discarded, labeled by reason.
pub static FRAMES_DROPPED: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently open connections.
pub static CONNECTIONS: OnceLock<IntGauge> = OnceLock::new();

/// Currently registered client ids.
pub static REGISTERED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Called once at startup. Until then every recording helper is a no-op.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(FRAMES_RECEIVED, IntCounter::new("sigrelay_frames_received_total", "Frames received from clients"));
    register!(FRAMES_FORWARDED, IntCounter::new("sigrelay_frames_forwarded_total", "Frames forwarded to a destination"));
    register!(FRAMES_DROPPED, IntCounterVec::new(Opts::new("sigrelay_frames_dropped_total", "Frames discarded by reason"), &["reason"]));
    register!(CONNECTIONS, IntGauge::new("sigrelay_connections", "Open WebSocket connections"));
    register!(REGISTERED_CLIENTS, IntGauge::new("sigrelay_registered_clients", "Registered client ids"));
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
// Helper functions for relay metric updates
// ============================================================================

#[inline]
pub fn record_received() {
    if let Some(c) = FRAMES_RECEIVED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_forwarded() {
    if let Some(c) = FRAMES_FORWARDED.get() {
        c.inc();
    }
}

/// Record a discarded frame under `reason` (an error code or "no_destination").
#[inline]
pub fn record_dropped(reason: &str) {
    if let Some(c) = FRAMES_DROPPED.get() {
        c.with_label_values(&[reason]).inc();
    }
}

#[inline]
pub fn connection_opened() {
    if let Some(g) = CONNECTIONS.get() {
        g.inc();
    }
}

#[inline]
pub fn connection_closed() {
    if let Some(g) = CONNECTIONS.get() {
        g.dec();
    }
}

/// Mirror the registry size.
#[inline]
pub fn set_registered_clients(count: usize) {
    if let Some(g) = REGISTERED_CLIENTS.get() {
        g.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}
