//! Application wiring.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use yume_ingest::{run_server, GameStateStore};
use yume_prefs::PreferenceStore;
use yume_presence::{
    DiscordClient, ImageResolver, LoopOutcome, PresenceClient, PresenceTranslator,
    PresenceUpdateLoop, WikiImageLookup,
};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Main application.
///
/// Owns the shared context handed to both tasks: the game state store
/// written by the ingestion server and the preference store read by the
/// presence loop.
pub struct Application {
    config: AppConfig,
    client_id: i64,
    game_state: GameStateStore,
    prefs: Arc<PreferenceStore>,
    shutdown: CancellationToken,
}

impl Application {
    /// Create a new application instance.
    pub fn new(config: AppConfig, client_id: i64) -> Self {
        let prefs = Arc::new(PreferenceStore::new(config.preferences.dir.clone()));
        Self {
            config,
            client_id,
            game_state: GameStateStore::new(),
            prefs,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the application when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Shared game state store.
    pub fn game_state(&self) -> &GameStateStore {
        &self.game_state
    }

    /// Run against the desktop Discord client until shutdown.
    pub async fn run(self) -> AppResult<LoopOutcome> {
        let client = DiscordClient::new(self.client_id)
            .with_handshake_timeout(self.config.presence.handshake_timeout());
        self.run_with_client(Box::new(client)).await
    }

    /// Run with the given presence client until shutdown.
    ///
    /// Returns when Ctrl+C is received, the token is cancelled, or the loop
    /// gives up connecting. Both tasks are always stopped before returning.
    pub async fn run_with_client(self, client: Box<dyn PresenceClient>) -> AppResult<LoopOutcome> {
        info!(
            client = client.name(),
            prefs_dir = %self.prefs.dir().display(),
            "Starting application"
        );

        let translator = self.build_translator()?;
        let update_loop = PresenceUpdateLoop::new(
            client,
            translator,
            self.game_state.clone(),
            self.prefs.clone(),
            self.config.presence.loop_config(),
            self.shutdown.clone(),
        );

        let mut server = tokio::spawn(run_server(
            self.game_state.clone(),
            self.config.server.clone(),
            self.shutdown.clone(),
        ));
        let mut presence = tokio::spawn(update_loop.run());
        let signal = tokio::spawn(wait_for_shutdown_signal(self.shutdown.clone()));

        let result = tokio::select! {
            server_result = &mut server => {
                self.shutdown.cancel();
                let outcome = presence.await?;
                server_result??;
                Ok(outcome)
            }
            outcome = &mut presence => {
                self.shutdown.cancel();
                let outcome = outcome?;
                server.await??;
                Ok(outcome)
            }
        };

        signal.await?;
        info!("Application stopped");
        result
    }

    fn build_translator(&self) -> AppResult<PresenceTranslator> {
        let images = &self.config.images;
        let lookup = WikiImageLookup::new(images.lookup_timeout(), &images.user_agent)?;
        Ok(PresenceTranslator::new(ImageResolver::new(
            Arc::new(lookup),
            images.lookup_timeout(),
        )))
    }
}

/// Cancel `shutdown` on Ctrl+C. Returns once the token is cancelled.
async fn wait_for_shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
            }
            shutdown.cancel();
        }
        () = shutdown.cancelled() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use yume_presence::{ClientCall, MockPresenceClient};

    use crate::error::AppError;

    fn test_config(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.presence.update_interval_secs = 1;
        config.preferences.dir = dir.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_cancel_stops_both_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let app = Application::new(test_config(dir.path()), 1);
        let shutdown = app.shutdown_token();
        let mock = MockPresenceClient::new();

        let task = tokio::spawn(app.run_with_client(Box::new(mock.clone())));
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();

        let outcome = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(outcome, LoopOutcome::Completed);
        assert_eq!(mock.count(&ClientCall::Connect), 1);
        assert_eq!(mock.calls().last(), Some(&ClientCall::Close));
    }

    #[tokio::test]
    async fn test_connect_failure_stops_application() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.presence.max_connect_attempts = 1;
        let app = Application::new(config, 1);
        let mock = MockPresenceClient::new();
        mock.fail_connects(u32::MAX);

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            app.run_with_client(Box::new(mock.clone())),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(outcome, LoopOutcome::ConnectFailed { attempts: 1 });
        assert!(mock.updates().is_empty());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.server.port = taken.local_addr().unwrap().port();
        let app = Application::new(config, 1);
        let mock = MockPresenceClient::new();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            app.run_with_client(Box::new(mock.clone())),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(AppError::Ingest(_))));
        assert_eq!(mock.calls().last(), Some(&ClientCall::Close));
    }
}
