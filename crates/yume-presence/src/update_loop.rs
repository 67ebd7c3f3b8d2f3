//! Presence update loop.
//!
//! ```text
//!  Disconnected ──▶ Connecting ──ok──▶ Connected ──cancel──▶ ShuttingDown ──▶ Closed
//!       ▲               │                  │                      ▲
//!       └──fail + delay─┘                  │ client gone          │
//!       ▲                                  ▼                      │
//!       └──────────────────────────── Disconnected     retries exhausted
//! ```
//!
//! While connected, every tick translates the latest game state and pushes
//! the payload only when it differs from the last one pushed. Cancellation
//! is observed at the top of every state and during every wait; the loop
//! always runs its clear/close sequence before returning.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use yume_core::{GameState, PresencePayload, SessionClock};
use yume_ingest::GameStateStore;
use yume_prefs::PreferenceStore;
use yume_telemetry::Metrics;

use crate::client::PresenceClient;
use crate::error::PresenceError;
use crate::translator::PresenceTranslator;

/// Connection state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Disconnected,
    Connecting,
    Connected,
    ShuttingDown,
    Closed,
}

/// Fixed-delay connect retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive failed attempts before giving up (`None` = never).
    pub max_attempts: Option<u32>,
    /// Delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Give up after `max_attempts` consecutive failures.
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            delay,
        }
    }

    /// Retry forever.
    pub fn indefinite(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            delay,
        }
    }

    /// Build from a config value where 0 means "retry forever".
    pub fn from_max_attempts(max_attempts: u32, delay: Duration) -> Self {
        if max_attempts == 0 {
            Self::indefinite(delay)
        } else {
            Self::bounded(max_attempts, delay)
        }
    }

    fn exhausted(&self, failed_attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| failed_attempts >= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::bounded(3, Duration::from_secs(30))
    }
}

/// Loop timing and policy.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Time between update cycles.
    pub interval: Duration,
    pub retry: RetryPolicy,
    /// Restart the session clock when the player goes back to the hub.
    pub reset_session_on_hub: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            retry: RetryPolicy::default(),
            reset_session_on_hub: true,
        }
    }
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Stopped by cancellation.
    Completed,
    /// Gave up connecting; presence is unavailable for this process.
    ConnectFailed { attempts: u32 },
}

/// Drives the translate → diff → push cycle against one client.
pub struct PresenceUpdateLoop {
    client: Box<dyn PresenceClient>,
    translator: PresenceTranslator,
    game_state: GameStateStore,
    prefs: Arc<PreferenceStore>,
    config: LoopConfig,
    shutdown: CancellationToken,
    state: LoopState,
    session: SessionClock,
    last_pushed: Option<PresencePayload>,
    connected: bool,
    was_in_game: bool,
    /// Failed connects and drops since the last successful push.
    failed_attempts: u32,
    outcome: LoopOutcome,
}

impl PresenceUpdateLoop {
    pub fn new(
        client: Box<dyn PresenceClient>,
        translator: PresenceTranslator,
        game_state: GameStateStore,
        prefs: Arc<PreferenceStore>,
        config: LoopConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            client,
            translator,
            game_state,
            prefs,
            config,
            shutdown,
            state: LoopState::Disconnected,
            session: SessionClock::start(),
            last_pushed: None,
            connected: false,
            was_in_game: false,
            failed_attempts: 0,
            outcome: LoopOutcome::Completed,
        }
    }

    /// Replace the session clock.
    pub fn with_session(mut self, session: SessionClock) -> Self {
        self.session = session;
        self
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until cancelled or until connecting is given up.
    pub async fn run(mut self) -> LoopOutcome {
        info!(
            client = self.client.name(),
            interval_secs = self.config.interval.as_secs_f64(),
            "Presence loop starting"
        );

        while self.state != LoopState::Closed {
            match self.state {
                LoopState::Disconnected => {
                    if self.shutdown.is_cancelled() {
                        self.transition(LoopState::ShuttingDown);
                    } else {
                        self.transition(LoopState::Connecting);
                    }
                }
                LoopState::Connecting => match self.client.connect().await {
                    Ok(()) => {
                        self.connected = true;
                        Metrics::connect_attempt("ok");
                        Metrics::client_connected();
                        info!(client = self.client.name(), "Presence client connected");
                        self.transition(LoopState::Connected);
                    }
                    Err(e) => {
                        Metrics::connect_attempt("failed");
                        warn!(
                            attempt = self.failed_attempts + 1,
                            error = %e,
                            "Failed to connect to presence client"
                        );
                        self.retry_after_failure().await;
                    }
                },
                LoopState::Connected => {
                    if self.shutdown.is_cancelled() {
                        self.transition(LoopState::ShuttingDown);
                        continue;
                    }
                    self.cycle().await;
                    match self.state {
                        LoopState::Connected => {
                            if !sleep_or_cancel(&self.shutdown, self.config.interval).await {
                                self.transition(LoopState::ShuttingDown);
                            }
                        }
                        LoopState::Disconnected => self.retry_after_failure().await,
                        _ => {}
                    }
                }
                LoopState::ShuttingDown => {
                    self.close_client().await;
                    self.transition(LoopState::Closed);
                }
                LoopState::Closed => {}
            }
        }

        info!(outcome = ?self.outcome, "Presence loop stopped");
        self.outcome
    }

    /// Count a failed attempt, then wait the retry delay or give up.
    ///
    /// A connection that drops before any push succeeded counts against the
    /// same budget as a refused connect.
    async fn retry_after_failure(&mut self) {
        self.failed_attempts += 1;
        if self.config.retry.exhausted(self.failed_attempts) {
            error!(
                attempts = self.failed_attempts,
                "Max connection attempts reached, presence unavailable"
            );
            self.outcome = LoopOutcome::ConnectFailed {
                attempts: self.failed_attempts,
            };
            self.transition(LoopState::ShuttingDown);
            return;
        }

        self.transition(LoopState::Disconnected);
        let delay = self.config.retry.delay;
        debug!(?delay, attempt = self.failed_attempts, "Retrying connection");
        if !sleep_or_cancel(&self.shutdown, delay).await {
            info!("Shutdown requested during retry delay");
            self.transition(LoopState::ShuttingDown);
        }
    }

    /// One translate → diff → push cycle.
    async fn cycle(&mut self) {
        let snapshot = self.game_state.read();
        self.track_session(snapshot.as_deref());

        let prefs = self.prefs.snapshot();
        let payload = self
            .translator
            .translate(snapshot.as_deref(), &prefs, self.session.started_at())
            .await;

        if self.last_pushed.as_ref() == Some(&payload) {
            Metrics::presence_suppressed();
            debug!("Presence unchanged, skipping push");
            return;
        }

        match self.client.update(&payload).await {
            Ok(()) => {
                Metrics::presence_pushed();
                self.failed_attempts = 0;
                debug!(details = %payload.details, state = %payload.state, "Presence pushed");
                self.last_pushed = Some(payload);
            }
            Err(PresenceError::NotConnected) => {
                warn!("Presence client went away, reconnecting");
                Metrics::client_disconnected();
                self.connected = false;
                self.last_pushed = None;
                self.transition(LoopState::Disconnected);
            }
            Err(e) => {
                Metrics::push_failed();
                warn!(error = %e, "Failed to push presence");
            }
        }
    }

    /// Restart the session when the player returns from a game to the hub.
    fn track_session(&mut self, snapshot: Option<&GameState>) {
        let in_game = snapshot.is_some_and(|s| !s.is_at_hub());
        let at_hub = snapshot.is_some_and(GameState::is_at_hub);
        if self.config.reset_session_on_hub && self.was_in_game && at_hub {
            self.session.reset();
            info!(started_at = self.session.started_at(), "Back at the hub, session restarted");
        }
        self.was_in_game = in_game;
    }

    async fn close_client(&mut self) {
        if self.connected {
            if let Err(e) = self.client.clear().await {
                warn!(error = %e, "Failed to clear presence");
            }
        }
        self.client.close().await;
        self.connected = false;
        self.last_pushed = None;
        Metrics::client_disconnected();
    }

    fn transition(&mut self, next: LoopState) {
        debug!(from = ?self.state, to = ?next, "Presence loop transition");
        self.state = next;
    }
}

/// Sleep for `duration`. Returns `false` if cancelled first.
async fn sleep_or_cancel(shutdown: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        () = tokio::time::sleep(duration) => true,
        () = shutdown.cancelled() => false,
    }
}
