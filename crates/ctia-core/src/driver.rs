//! Phase Progression Driver
//!
//! Emits the cosmetic pipeline phases on a fixed cadence so the user sees
//! continuous progress. The driver knows nothing about the real analysis:
//! it only proposes phases through a callback, and its owner decides
//! whether to commit them.
//!
//! The timer runs as a Tokio task. `stop()` aborts it, and so does dropping
//! the driver, so a torn-down owner never receives late ticks.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

use crate::domain::{Phase, PIPELINE};

/// Default gap between two emitted phases.
pub const DEFAULT_PHASE_INTERVAL: Duration = Duration::from_millis(1500);

/// Handle to a running phase timer.
#[derive(Debug)]
pub struct PhaseDriver {
    task: Option<JoinHandle<()>>,
}

impl PhaseDriver {
    /// Start emitting [`PIPELINE`] phases to `on_phase`.
    ///
    /// The first phase is emitted as soon as the task is polled, each
    /// following one `interval` later. After the last phase the task ends
    /// on its own. Must be called from within a Tokio runtime.
    pub fn start<F>(interval: Duration, mut on_phase: F) -> Self
    where
        F: FnMut(Phase) + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for phase in PIPELINE {
                ticker.tick().await;
                trace!(phase = %phase, "phase tick");
                on_phase(phase);
            }
        });

        Self { task: Some(task) }
    }

    /// Halt emission. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the timer may still emit.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for PhaseDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn collecting_driver(interval: Duration) -> (PhaseDriver, mpsc::UnboundedReceiver<(Phase, Instant)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = PhaseDriver::start(interval, move |phase| {
            let _ = tx.send((phase, Instant::now()));
        });
        (driver, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_pipeline_in_order_at_fixed_cadence() {
        let start = Instant::now();
        let (_driver, mut rx) = collecting_driver(DEFAULT_PHASE_INTERVAL);

        let mut seen = Vec::new();
        while let Some(item) = rx.recv().await {
            seen.push(item);
        }

        let phases: Vec<Phase> = seen.iter().map(|(p, _)| *p).collect();
        assert_eq!(phases, PIPELINE.to_vec());

        for (i, (_, at)) in seen.iter().enumerate() {
            let offset = at.duration_since(start);
            let expected = DEFAULT_PHASE_INTERVAL * i as u32;
            assert!(
                offset >= expected && offset < expected + Duration::from_millis(10),
                "phase {i} emitted at {offset:?}, expected {expected:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_emission_and_is_idempotent() {
        let (mut driver, mut rx) = collecting_driver(Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(150)).await;
        driver.stop();
        driver.stop();
        assert!(!driver.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut seen = Vec::new();
        while let Ok((phase, _)) = rx.try_recv() {
            seen.push(phase);
        }
        assert_eq!(seen, vec![Phase::Orchestrating, Phase::Classifying]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_driver_cancels_timer() {
        let (driver, mut rx) = collecting_driver(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(driver);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1, "only the immediate first phase may be observed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_finishes_after_last_phase() {
        let (driver, mut rx) = collecting_driver(Duration::from_millis(10));
        while rx.recv().await.is_some() {}
        tokio::task::yield_now().await;
        assert!(!driver.is_running());
    }
}
