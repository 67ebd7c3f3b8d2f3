//! Discord backend over the local IPC socket.

use std::time::{Duration, UNIX_EPOCH};

use discord_sdk::activity::{ActivityBuilder, Assets};
use discord_sdk::wheel::{UserSpoke, UserState, Wheel};
use discord_sdk::{Discord, Subscriptions};
use tracing::{debug, info, warn};
use yume_core::PresencePayload;

use crate::client::{BoxFuture, PresenceClient};
use crate::error::{PresenceError, PresenceResult};

/// Time allowed for the Discord client to answer the handshake.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

struct Session {
    discord: Discord,
    user: UserSpoke,
    /// Keeps the event channels alive for the session.
    _wheel: Wheel,
}

/// [`PresenceClient`] talking to the desktop Discord client.
pub struct DiscordClient {
    app_id: i64,
    handshake_timeout: Duration,
    session: Option<Session>,
}

impl DiscordClient {
    /// Create a client for the given Discord application id.
    pub fn new(app_id: i64) -> Self {
        Self {
            app_id,
            handshake_timeout: HANDSHAKE_TIMEOUT,
            session: None,
        }
    }

    /// Override the handshake timeout.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    async fn open_session(app_id: i64, handshake_timeout: Duration) -> PresenceResult<Session> {
        let (wheel, handler) = Wheel::new(Box::new(|err| {
            warn!(error = ?err, "Discord error");
        }));
        let mut user = wheel.user();

        let discord = Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler))
            .map_err(|e| PresenceError::Connect(e.to_string()))?;

        let handshake = tokio::time::timeout(handshake_timeout, async {
            if user.0.changed().await.is_err() {
                return Err(PresenceError::Connect("Discord connection closed".to_string()));
            }
            match &*user.0.borrow() {
                UserState::Connected(u) => Ok(u.username.clone()),
                UserState::Disconnected(err) => {
                    Err(PresenceError::Connect(format!("Discord disconnected: {err:?}")))
                }
            }
        })
        .await;

        let username = match handshake {
            Ok(Ok(username)) => username,
            Ok(Err(e)) => {
                discord.disconnect().await;
                return Err(e);
            }
            Err(_) => {
                discord.disconnect().await;
                return Err(PresenceError::HandshakeTimeout(handshake_timeout));
            }
        };

        info!(user = %username, "Discord connected");
        Ok(Session {
            discord,
            user,
            _wheel: wheel,
        })
    }

    /// Live connection, or `NotConnected` once Discord has gone away.
    fn live_discord(&self) -> PresenceResult<&Discord> {
        let session = self.session.as_ref().ok_or(PresenceError::NotConnected)?;
        if matches!(*session.user.0.borrow(), UserState::Disconnected(_)) {
            return Err(PresenceError::NotConnected);
        }
        Ok(&session.discord)
    }
}

/// Build the Discord activity for a payload. Empty fields are left out.
fn build_activity(payload: &PresencePayload) -> ActivityBuilder {
    let mut activity = ActivityBuilder::new();
    if !payload.details.is_empty() {
        activity = activity.details(payload.details.as_str());
    }
    if !payload.state.is_empty() {
        activity = activity.state(payload.state.as_str());
    }

    let mut assets = Assets::default();
    if !payload.large_image.is_empty() {
        assets = assets.large(
            payload.large_image.as_str(),
            non_empty(&payload.large_image_caption),
        );
    }
    if !payload.small_image.is_empty() {
        assets = assets.small(
            payload.small_image.as_str(),
            non_empty(&payload.small_image_caption),
        );
    }
    if payload.has_images() {
        activity = activity.assets(assets);
    }

    let start = UNIX_EPOCH + Duration::from_secs(payload.session_start.max(0) as u64);
    activity.start_timestamp(start)
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

impl PresenceClient for DiscordClient {
    fn name(&self) -> &'static str {
        "discord"
    }

    fn connect(&mut self) -> BoxFuture<'_, PresenceResult<()>> {
        Box::pin(async move {
            if let Some(old) = self.session.take() {
                old.discord.disconnect().await;
            }
            self.session = Some(Self::open_session(self.app_id, self.handshake_timeout).await?);
            Ok(())
        })
    }

    fn update<'a>(&'a mut self, payload: &'a PresencePayload) -> BoxFuture<'a, PresenceResult<()>> {
        Box::pin(async move {
            let discord = self.live_discord()?;
            discord
                .update_activity(build_activity(payload))
                .await
                .map_err(|e| PresenceError::Send(e.to_string()))?;
            debug!(details = %payload.details, state = %payload.state, "Activity updated");
            Ok(())
        })
    }

    fn clear(&mut self) -> BoxFuture<'_, PresenceResult<()>> {
        Box::pin(async move {
            let discord = self.live_discord()?;
            discord
                .clear_activity()
                .await
                .map_err(|e| PresenceError::Send(e.to_string()))?;
            Ok(())
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Some(session) = self.session.take() {
                session.discord.disconnect().await;
                info!("Discord disconnected");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_without_session_is_not_connected() {
        let mut client = DiscordClient::new(1);
        let payload = PresencePayload::default();
        assert!(matches!(
            client.update(&payload).await,
            Err(PresenceError::NotConnected)
        ));
        assert!(matches!(client.clear().await, Err(PresenceError::NotConnected)));
        client.close().await;
    }

    #[test]
    fn test_handshake_timeout_override() {
        let client = DiscordClient::new(1).with_handshake_timeout(Duration::from_millis(50));
        assert_eq!(client.handshake_timeout, Duration::from_millis(50));
        assert_eq!(client.name(), "discord");
    }
}
