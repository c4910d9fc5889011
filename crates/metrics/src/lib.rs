//! Metrics facade for shardsync.
//!
//! Provides a [`MetricsRecorder`] trait with domain-specific methods and default
//! no-op implementations. A global singleton recorder is accessed via [`recorder()`],
//! and convenience free functions delegate to it.
//!
//! # Usage
//!
//! Callers record metrics via free functions:
//! ```ignore
//! shardsync_metrics::record_request_served("header", "cache");
//! shardsync_metrics::record_request_dropped("transactions_0", "flood");
//! ```
//!
//! At startup, install a backend with [`set_global_recorder`]; without one
//! every call is a no-op.

use std::sync::OnceLock;

// ═══════════════════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════════════════

/// Domain-specific metrics recording trait.
///
/// All methods have default no-op implementations so backends only need
/// to override the metrics they care about.
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync + 'static {
    // ── Inbound requests ─────────────────────────────────────────────

    /// Record a request message received on a topic.
    fn record_request_received(&self, kind: &str) {}

    /// Record a request served, labeled by the tier that produced the bytes.
    fn record_request_served(&self, kind: &str, source: &str) {}

    /// Record a request for data this node does not hold.
    fn record_request_missing(&self, kind: &str) {}

    /// Record a request dropped before serving (flood gate, malformed payload).
    fn record_request_dropped(&self, topic: &str, reason: &str) {}

    /// Record serve latency for a request.
    fn record_serve_latency(&self, kind: &str, latency_secs: f64) {}

    // ── Outbound requests ────────────────────────────────────────────

    /// Record a request published on a request topic.
    fn record_request_sent(&self, kind: &str) {}

    /// Record an outbound request that found no eligible peers.
    fn record_request_no_peers(&self, topic: &str) {}

    /// Set the connected-peer gauge for a request topic.
    fn set_request_topic_peers(&self, topic: &str, count: usize) {}
}

// ═══════════════════════════════════════════════════════════════════════
// Global singleton
// ═══════════════════════════════════════════════════════════════════════

struct NoopRecorder;
impl MetricsRecorder for NoopRecorder {}

static RECORDER: OnceLock<Box<dyn MetricsRecorder>> = OnceLock::new();

/// Install a global metrics recorder.
///
/// Can only be called once. Subsequent calls are silently ignored.
pub fn set_global_recorder(recorder: Box<dyn MetricsRecorder>) {
    let _ = RECORDER.set(recorder);
}

/// Get the global metrics recorder.
///
/// Returns a no-op recorder if none has been installed.
#[inline]
fn recorder() -> &'static dyn MetricsRecorder {
    RECORDER.get().map(|r| r.as_ref()).unwrap_or(&NoopRecorder)
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience free functions
// ═══════════════════════════════════════════════════════════════════════

/// Record a request message received on a topic.
#[inline]
pub fn record_request_received(kind: &str) {
    recorder().record_request_received(kind);
}

/// Record a request served, labeled by the tier that produced the bytes.
#[inline]
pub fn record_request_served(kind: &str, source: &str) {
    recorder().record_request_served(kind, source);
}

/// Record a request for data this node does not hold.
#[inline]
pub fn record_request_missing(kind: &str) {
    recorder().record_request_missing(kind);
}

/// Record a request dropped before serving.
#[inline]
pub fn record_request_dropped(topic: &str, reason: &str) {
    recorder().record_request_dropped(topic, reason);
}

/// Record serve latency for a request.
#[inline]
pub fn record_serve_latency(kind: &str, latency_secs: f64) {
    recorder().record_serve_latency(kind, latency_secs);
}

/// Record a request published on a request topic.
#[inline]
pub fn record_request_sent(kind: &str) {
    recorder().record_request_sent(kind);
}

/// Record an outbound request that found no eligible peers.
#[inline]
pub fn record_request_no_peers(topic: &str) {
    recorder().record_request_no_peers(topic);
}

/// Set the connected-peer gauge for a request topic.
#[inline]
pub fn set_request_topic_peers(topic: &str, count: usize) {
    recorder().set_request_topic_peers(topic, count);
}
