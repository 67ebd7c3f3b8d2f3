//! Capability interface of the social client.
//!
//! The update loop only ever talks to a [`PresenceClient`]: connect, push a
//! payload, clear the display, close. Transport details stay behind the
//! trait, so the loop can be driven by [`MockPresenceClient`] in tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use yume_core::PresencePayload;

use crate::error::{PresenceError, PresenceResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Connection to the external social client.
///
/// Owned exclusively by the update loop; calls are never concurrent.
pub trait PresenceClient: Send {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Open the connection.
    fn connect(&mut self) -> BoxFuture<'_, PresenceResult<()>>;

    /// Replace the displayed presence.
    ///
    /// Returns [`PresenceError::NotConnected`] once the client has gone away.
    fn update<'a>(&'a mut self, payload: &'a PresencePayload) -> BoxFuture<'a, PresenceResult<()>>;

    /// Remove the displayed presence.
    fn clear(&mut self) -> BoxFuture<'_, PresenceResult<()>>;

    /// Close the connection and release its resources.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// A call recorded by [`MockPresenceClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Connect,
    Update(PresencePayload),
    Clear,
    Close,
}

#[derive(Debug, Default)]
struct MockInner {
    calls: Vec<ClientCall>,
    /// Remaining connect attempts that fail.
    connect_failures: u32,
    connected: bool,
    fail_updates: bool,
    /// Every update reports the client as gone.
    drop_on_update: bool,
}

/// Recording client for tests.
///
/// Clones share the same recorder, so a test keeps one handle while the
/// loop owns another.
#[derive(Debug, Clone, Default)]
pub struct MockPresenceClient {
    inner: Arc<Mutex<MockInner>>,
}

impl MockPresenceClient {
    /// Create a mock that connects on the first attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` connect attempts fail.
    pub fn fail_connects(&self, n: u32) {
        self.inner.lock().connect_failures = n;
    }

    /// Make every update fail with a send error while set.
    pub fn set_fail_updates(&self, fail: bool) {
        self.inner.lock().fail_updates = fail;
    }

    /// Make every update drop the connection and fail with `NotConnected`.
    pub fn set_drop_on_update(&self, drop: bool) {
        self.inner.lock().drop_on_update = drop;
    }

    /// Simulate the client going away.
    pub fn drop_connection(&self) {
        self.inner.lock().connected = false;
    }

    /// Whether the mock currently considers itself connected.
    pub fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<ClientCall> {
        self.inner.lock().calls.clone()
    }

    /// Payloads passed to `update`, in order.
    pub fn updates(&self) -> Vec<PresencePayload> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ClientCall::Update(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls equal to `call`.
    pub fn count(&self, call: &ClientCall) -> usize {
        self.inner.lock().calls.iter().filter(|c| *c == call).count()
    }
}

impl PresenceClient for MockPresenceClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn connect(&mut self) -> BoxFuture<'_, PresenceResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.calls.push(ClientCall::Connect);
            if inner.connect_failures > 0 {
                inner.connect_failures -= 1;
                return Err(PresenceError::Connect("mock refused".to_string()));
            }
            inner.connected = true;
            Ok(())
        })
    }

    fn update<'a>(&'a mut self, payload: &'a PresencePayload) -> BoxFuture<'a, PresenceResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.calls.push(ClientCall::Update(payload.clone()));
            if inner.drop_on_update {
                inner.connected = false;
            }
            if !inner.connected {
                return Err(PresenceError::NotConnected);
            }
            if inner.fail_updates {
                return Err(PresenceError::Send("mock send failure".to_string()));
            }
            Ok(())
        })
    }

    fn clear(&mut self) -> BoxFuture<'_, PresenceResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.calls.push(ClientCall::Clear);
            if inner.connected {
                Ok(())
            } else {
                Err(PresenceError::NotConnected)
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.calls.push(ClientCall::Close);
            inner.connected = false;
        })
    }
}
