//! Analysis Session Controller
//!
//! Owns the lifecycle of the current query: it starts the phase driver,
//! issues the single provider call, and reconciles both against the one
//! live session.
//!
//! All mutable state sits behind one mutex that is never held across an
//! await. Every asynchronous callback (driver tick, provider completion,
//! settle timer) carries the `SessionId` of the session that spawned it and
//! is dropped unless that session is still current. Because the terminal
//! phase is committed under the same lock that a tick must take, no tick can
//! land after `Complete`/`Error`.
//!
//! Spawned tasks hold only weak references to the controller; dropping it
//! aborts every outstanding task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

use crate::domain::{
    CtiaError, LanguageCode, Phase, ProviderError, Result, Session, SessionId, TradeReport,
    ViewState,
};
use crate::driver::{PhaseDriver, DEFAULT_PHASE_INTERVAL};
use crate::metrics::METRICS;
use crate::normalize::ReportNormalizer;
use crate::obs;
use crate::provider::IntelligenceProvider;

/// Pause between `Complete` and switching the view to results.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Message shown for every failure; causes go to the log only.
pub const DEFAULT_FAILURE_MESSAGE: &str =
    "Analysis failed. Please try again. Ensure API Key is set.";

const EVENT_CAPACITY: usize = 64;

/// Configuration for the session controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Cadence of the cosmetic phase driver
    pub phase_interval: Duration,
    /// Delay between `Complete` and the results view
    pub settle_delay: Duration,
    /// Upper bound on one provider call; `None` waits indefinitely
    pub provider_timeout: Option<Duration>,
    /// User-facing text published on failure
    pub failure_message: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            phase_interval: DEFAULT_PHASE_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            provider_timeout: None,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Read overrides from `CTIA_PHASE_INTERVAL_MS`, `CTIA_SETTLE_DELAY_MS`
    /// and `CTIA_PROVIDER_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    /// Unparseable values are ignored with a warning; a timeout of 0 means none.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| -> Option<u64> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(key = key, value = %raw, "ignoring unparseable setting");
                    None
                }
            }
        };

        let mut config = Self::default();
        if let Some(ms) = read("CTIA_PHASE_INTERVAL_MS") {
            config.phase_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = read("CTIA_SETTLE_DELAY_MS") {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = read("CTIA_PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        config
    }

    /// Bound each provider call.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }
}

/// Everything presentation needs to render the current state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSnapshot {
    pub session: Option<Session>,
    pub view: ViewState,
    pub report: Option<Arc<TradeReport>>,
    pub error: Option<String>,
}

impl ControllerSnapshot {
    /// Phase of the live session, `Idle` when there is none.
    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Nothing is pending: idle, failed, or showing results.
    pub fn is_settled(&self) -> bool {
        self.session.is_none() || self.phase() == Phase::Error || self.view == ViewState::Results
    }
}

/// State changes, in commit order.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    SessionStarted {
        session_id: SessionId,
        query: String,
        language: LanguageCode,
    },
    PhaseChanged {
        session_id: SessionId,
        phase: Phase,
    },
    ReportPublished {
        session_id: SessionId,
        report: Arc<TradeReport>,
    },
    ErrorPublished {
        session_id: SessionId,
        message: String,
    },
    ViewChanged {
        session_id: SessionId,
        view: ViewState,
    },
    /// Reset; the view is back to input and the phase to idle.
    SessionCleared { session_id: Option<SessionId> },
}

#[derive(Default)]
struct State {
    snapshot: ControllerSnapshot,
    driver: Option<PhaseDriver>,
    provider_task: Option<JoinHandle<()>>,
    settle_task: Option<JoinHandle<()>>,
}

impl State {
    fn current_id(&self) -> Option<SessionId> {
        self.snapshot.session_id()
    }

    fn set_phase(&mut self, phase: Phase) {
        if let Some(session) = self.snapshot.session.as_mut() {
            session.phase = phase;
        }
    }

    fn stop_driver(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.stop();
        }
    }

    fn cancel_pending(&mut self) {
        self.stop_driver();
        if let Some(task) = self.provider_task.take() {
            task.abort();
        }
        if let Some(task) = self.settle_task.take() {
            task.abort();
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

struct Shared {
    config: ControllerConfig,
    provider: Arc<dyn IntelligenceProvider>,
    normalizer: ReportNormalizer,
    state: Mutex<State>,
    snapshots: watch::Sender<ControllerSnapshot>,
    events: broadcast::Sender<ControllerEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ControllerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn publish(&self, state: &State) {
        self.snapshots.send_replace(state.snapshot.clone());
    }

    /// Driver tick: commit `phase` if it advances the live, non-terminal session.
    fn propose_phase(&self, session_id: SessionId, phase: Phase) {
        let mut state = self.lock();
        let Some(session) = state.snapshot.session.as_mut() else {
            return;
        };
        if session.id != session_id
            || session.phase.is_terminal()
            || !phase.is_pipeline()
            || phase <= session.phase
        {
            return;
        }
        session.phase = phase;

        self.emit(ControllerEvent::PhaseChanged { session_id, phase });
        self.publish(&state);
        drop(state);
        obs::emit_phase_changed(session_id, phase);
    }

    /// Provider completion: force the terminal phase and publish the outcome.
    fn finish(self: &Arc<Self>, session_id: SessionId, outcome: std::result::Result<Value, ProviderError>) {
        let mut state = self.lock();
        let current = state.current_id();
        if current != Some(session_id) {
            drop(state);
            METRICS.inc_stale_results();
            obs::emit_stale_result_discarded(session_id, current);
            return;
        }
        if state.snapshot.phase().is_terminal() {
            debug!(session_id = %session_id, "session already terminal, ignoring completion");
            return;
        }

        state.stop_driver();
        // This is the provider task itself; let it finish.
        state.provider_task = None;

        let (language, elapsed_ms) = match state.snapshot.session.as_ref() {
            Some(session) => (session.language, session.elapsed_ms()),
            None => return,
        };

        let result = outcome.map_err(CtiaError::from).and_then(|raw| {
            self.normalizer
                .normalize(raw, language)
                .map_err(CtiaError::from)
        });

        match result {
            Ok(normalized) => {
                let compliance_items = normalized.report.compliance.len();
                let report = Arc::new(normalized.report);

                state.set_phase(Phase::Complete);
                state.snapshot.report = Some(Arc::clone(&report));
                self.emit(ControllerEvent::PhaseChanged {
                    session_id,
                    phase: Phase::Complete,
                });
                self.emit(ControllerEvent::ReportPublished { session_id, report });

                let weak = Arc::downgrade(self);
                let delay = self.config.settle_delay;
                state.settle_task = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(shared) = weak.upgrade() {
                        shared.settle(session_id);
                    }
                }));

                self.publish(&state);
                drop(state);

                obs::emit_report_warnings(session_id, &normalized.warnings);
                METRICS.inc_sessions_completed();
                obs::emit_session_completed(session_id, elapsed_ms, compliance_items);
            }
            Err(err) => {
                let message = self.config.failure_message.clone();

                state.set_phase(Phase::Error);
                state.snapshot.error = Some(message.clone());
                state.snapshot.view = ViewState::Input;
                self.emit(ControllerEvent::PhaseChanged {
                    session_id,
                    phase: Phase::Error,
                });
                self.emit(ControllerEvent::ErrorPublished {
                    session_id,
                    message,
                });
                self.emit(ControllerEvent::ViewChanged {
                    session_id,
                    view: ViewState::Input,
                });

                self.publish(&state);
                drop(state);

                METRICS.inc_sessions_failed();
                obs::emit_session_failed(session_id, elapsed_ms, &err);
            }
        }
    }

    /// Settle timer: switch a completed session to the results view.
    fn settle(&self, session_id: SessionId) {
        let mut state = self.lock();
        if state.current_id() != Some(session_id) || state.snapshot.phase() != Phase::Complete {
            return;
        }
        state.settle_task = None;
        if state.snapshot.view == ViewState::Results {
            return;
        }
        state.snapshot.view = ViewState::Results;

        self.emit(ControllerEvent::ViewChanged {
            session_id,
            view: ViewState::Results,
        });
        self.publish(&state);
    }
}

async fn call_provider(
    provider: &dyn IntelligenceProvider,
    query: &str,
    language: LanguageCode,
    timeout: Option<Duration>,
) -> std::result::Result<Value, ProviderError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, provider.analyze(query, language))
            .await
            .unwrap_or_else(|_| Err(ProviderError::Timeout(limit))),
        None => provider.analyze(query, language).await,
    }
}

/// Drives one analysis session at a time against an Intelligence Provider.
///
/// Must be used from within a Tokio runtime.
pub struct AnalysisController {
    shared: Arc<Shared>,
}

impl AnalysisController {
    pub fn new(provider: Arc<dyn IntelligenceProvider>, config: ControllerConfig) -> Self {
        Self::with_normalizer(provider, config, ReportNormalizer::default())
    }

    /// Use a specific normalizer (e.g. one with a fixed clock).
    pub fn with_normalizer(
        provider: Arc<dyn IntelligenceProvider>,
        config: ControllerConfig,
        normalizer: ReportNormalizer,
    ) -> Self {
        let (snapshots, _) = watch::channel(ControllerSnapshot::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                config,
                provider,
                normalizer,
                state: Mutex::new(State::default()),
                snapshots,
                events,
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.shared.config
    }

    /// Start a new session for `query`.
    ///
    /// Rejects blank queries without touching state. Otherwise cancels any
    /// previous session, moves to `Orchestrating`, starts the phase driver
    /// and fires the provider call. Returns immediately; completion is
    /// observed through the snapshot and event channels.
    pub fn submit(&self, query: &str, language: LanguageCode) -> Result<SessionId> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CtiaError::InvalidInput(
                "query must not be empty".to_string(),
            ));
        }

        let session = Session::new(query, language);
        let session_id = session.id;
        let shared = &self.shared;

        let mut state = shared.lock();
        if let Some(previous) = state.current_id() {
            debug!(previous = %previous, next = %session_id, "superseding session");
        }
        state.cancel_pending();
        state.snapshot = ControllerSnapshot {
            session: Some(session),
            view: ViewState::Processing,
            report: None,
            error: None,
        };

        shared.emit(ControllerEvent::SessionStarted {
            session_id,
            query: query.to_string(),
            language,
        });
        shared.emit(ControllerEvent::PhaseChanged {
            session_id,
            phase: Phase::Orchestrating,
        });
        shared.emit(ControllerEvent::ViewChanged {
            session_id,
            view: ViewState::Processing,
        });

        let weak = Arc::downgrade(shared);
        state.driver = Some(PhaseDriver::start(
            shared.config.phase_interval,
            move |phase| {
                if let Some(shared) = weak.upgrade() {
                    shared.propose_phase(session_id, phase);
                }
            },
        ));

        let provider = Arc::clone(&shared.provider);
        let weak = Arc::downgrade(shared);
        let timeout = shared.config.provider_timeout;
        let owned_query = query.to_string();
        let call = async move {
            let outcome = call_provider(provider.as_ref(), &owned_query, language, timeout).await;
            if let Some(shared) = weak.upgrade() {
                shared.finish(session_id, outcome);
            }
        };
        state.provider_task = Some(tokio::spawn(call.instrument(obs::session_span(session_id))));

        shared.publish(&state);
        drop(state);

        METRICS.inc_sessions_started();
        obs::emit_session_started(session_id, language, shared.provider.name());
        Ok(session_id)
    }

    /// Discard the session, report and error; back to `Idle`.
    ///
    /// Safe at any time. An in-flight provider call is cancelled and its
    /// result, should it still arrive, is ignored.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        state.cancel_pending();
        let previous = state.current_id();
        state.snapshot = ControllerSnapshot::default();

        self.shared.emit(ControllerEvent::SessionCleared {
            session_id: previous,
        });
        self.shared.publish(&state);
        drop(state);

        METRICS.inc_sessions_reset();
        obs::emit_session_reset(previous);
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.shared.lock().snapshot.clone()
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().snapshot.phase()
    }

    pub fn report(&self) -> Option<Arc<TradeReport>> {
        self.shared.lock().snapshot.report.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.shared.lock().snapshot.error.clone()
    }

    pub fn view(&self) -> ViewState {
        self.shared.lock().snapshot.view
    }

    pub fn session(&self) -> Option<Session> {
        self.shared.lock().snapshot.session.clone()
    }

    /// Latest snapshot, updated on every commit (including session id changes).
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Every state change, in commit order.
    pub fn events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.shared.events.subscribe()
    }

    /// Wait until nothing is pending (see [`ControllerSnapshot::is_settled`]).
    pub async fn settled(&self) -> ControllerSnapshot {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(ControllerSnapshot::is_settled)
            .await
            .map(|snapshot| snapshot.clone());
        match settled {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }
}
