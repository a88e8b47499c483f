//! Global atomic counters for CTIA observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. when the CLI exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters: no allocations, no locking.
pub struct Metrics {
    sessions_started: AtomicU64,
    sessions_completed: AtomicU64,
    sessions_failed: AtomicU64,
    sessions_reset: AtomicU64,
    stale_results_discarded: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            sessions_started: AtomicU64::new(0),
            sessions_completed: AtomicU64::new(0),
            sessions_failed: AtomicU64::new(0),
            sessions_reset: AtomicU64::new(0),
            stale_results_discarded: AtomicU64::new(0),
        }
    }

    pub fn inc_sessions_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "sessions_started", "counter incremented");
    }

    pub fn inc_sessions_completed(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "sessions_completed", "counter incremented");
    }

    pub fn inc_sessions_failed(&self) {
        self.sessions_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "sessions_failed", "counter incremented");
    }

    pub fn inc_sessions_reset(&self) {
        self.sessions_reset.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "sessions_reset", "counter incremented");
    }

    pub fn inc_stale_results(&self) {
        self.stale_results_discarded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "stale_results_discarded", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            sessions_started = self.sessions_started(),
            sessions_completed = self.sessions_completed(),
            sessions_failed = self.sessions_failed(),
            sessions_reset = self.sessions_reset(),
            stale_results_discarded = self.stale_results_discarded(),
        );
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started.load(Ordering::Relaxed)
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed.load(Ordering::Relaxed)
    }

    pub fn sessions_failed(&self) -> u64 {
        self.sessions_failed.load(Ordering::Relaxed)
    }

    pub fn sessions_reset(&self) -> u64 {
        self.sessions_reset.load(Ordering::Relaxed)
    }

    pub fn stale_results_discarded(&self) -> u64 {
        self.stale_results_discarded.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.sessions_started.store(0, Ordering::Relaxed);
        self.sessions_completed.store(0, Ordering::Relaxed);
        self.sessions_failed.store(0, Ordering::Relaxed);
        self.sessions_reset.store(0, Ordering::Relaxed);
        self.stale_results_discarded.store(0, Ordering::Relaxed);
    }
}
