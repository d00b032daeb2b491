//! # Initiator
//!
//! Client-side wrapper that sends messages and correlates responses by
//! request key.
//!
//! Every [`FixInitiator::send_and_await`] call pre-registers a one-shot
//! completion slot under the request key, forwards the message, and waits
//! for the first inbound message whose extracted key matches, or for the
//! timeout, whichever comes first. The transport source feeds inbound
//! application messages through [`FixInitiator::deliver`].
//!
//! # Concurrency
//!
//! - Delivery is at-most-once per slot: of two concurrent inbound
//!   messages with the same key, exactly one completes the waiter and the
//!   other is dropped.
//! - A second `send_and_await` under a key that is still in flight fails
//!   with `DuplicateKey`.
//! - When the timeout fires the slot is removed; a matching message
//!   arriving later is silently discarded and never re-opens the slot.

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::protocol::fix::message::{FixMessage, tags};
use crate::protocol::fix::session::SessionId;
use crate::protocol::fix::transport::TransportSink;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, oneshot};
use tracing::{debug, info, warn};

/// Default response deadline.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side sender with request/response correlation.
pub struct FixInitiator {
    sink: Arc<dyn TransportSink>,
    correlation_tag: u32,
    default_timeout: Duration,
    pending: Arc<RwLock<HashMap<String, oneshot::Sender<FixMessage>>>>,
    active_session: Arc<RwLock<Option<SessionId>>>,
}

impl FixInitiator {
    /// Creates an initiator over the given transport sink.
    ///
    /// ClOrdID (11) is the default correlation tag and 30 seconds the
    /// default response deadline.
    #[must_use]
    pub fn new(sink: Arc<dyn TransportSink>) -> Self {
        Self {
            sink,
            correlation_tag: tags::CL_ORD_ID,
            default_timeout: DEFAULT_TIMEOUT,
            pending: Arc::new(RwLock::new(HashMap::new())),
            active_session: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets the tag the correlation key is extracted from.
    #[must_use]
    pub fn with_correlation_tag(mut self, tag: u32) -> Self {
        self.correlation_tag = tag;
        self
    }

    /// Sets the default response deadline.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Binds the active session after a successful logon.
    pub async fn on_logon(&self, session: SessionId) {
        info!(session = %session, "Logon successful");
        *self.active_session.write().await = Some(session);
    }

    /// Unbinds the session on logout, if it is the active one.
    pub async fn on_logout(&self, session: &SessionId) {
        let mut active = self.active_session.write().await;
        if active.as_ref() == Some(session) {
            info!(session = %session, "Logout");
            *active = None;
        }
    }

    /// Returns the active session, if logged on.
    pub async fn active_session(&self) -> Option<SessionId> {
        self.active_session.read().await.clone()
    }

    /// Returns true if a session is currently bound.
    pub async fn is_logged_on(&self) -> bool {
        self.active_session.read().await.is_some()
    }

    /// Returns the number of requests currently awaiting a response.
    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Sends a message and awaits the correlated response under the
    /// default timeout.
    ///
    /// # Errors
    ///
    /// See [`FixInitiator::send_and_await_with_timeout`].
    pub async fn send_and_await(
        &self,
        message: FixMessage,
        key: &str,
    ) -> HarnessResult<FixMessage> {
        self.send_and_await_with_timeout(message, key, self.default_timeout)
            .await
    }

    /// Sends a message and awaits the first inbound message whose
    /// extracted key equals `key`, or fails after `timeout`.
    ///
    /// The completion slot is registered before the send so a response
    /// arriving faster than the sender returns is never lost.
    ///
    /// # Errors
    ///
    /// - `HarnessError::NoSession` if no session is active at send time
    /// - `HarnessError::DuplicateKey` if the key is already awaiting a
    ///   response
    /// - `HarnessError::TransportFailure` if the sink rejected the message
    ///   (the slot is cleaned up)
    /// - `HarnessError::Timeout` if no matching message arrived in time
    ///   (the slot is removed; a late match is discarded)
    pub async fn send_and_await_with_timeout(
        &self,
        message: FixMessage,
        key: &str,
        timeout: Duration,
    ) -> HarnessResult<FixMessage> {
        let session = self.require_session().await?;

        let rx = {
            let mut pending = self.pending.write().await;
            if pending.contains_key(key) {
                return Err(HarnessError::DuplicateKey(key.to_string()));
            }
            let (tx, rx) = oneshot::channel();
            pending.insert(key.to_string(), tx);
            rx
        };

        if let Err(e) = self.sink.send(message, &session).await {
            self.pending.write().await.remove(key);
            return Err(e);
        }
        info!(%key, session = %session, "Message sent, awaiting response");

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => {
                // The sender side vanished without completing; treat like
                // an abandoned slot.
                self.pending.write().await.remove(key);
                Err(HarnessError::Internal(format!(
                    "response slot for key '{}' was dropped",
                    key
                )))
            }
            Err(_) => {
                self.pending.write().await.remove(key);
                warn!(%key, timeout_ms = timeout.as_millis() as u64, "Response timed out");
                Err(HarnessError::Timeout {
                    key: key.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    /// Sends a message without registering a completion slot.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::NoSession` if no session is active, or
    /// `HarnessError::TransportFailure` from the sink.
    pub async fn send(&self, message: FixMessage) -> HarnessResult<()> {
        let session = self.require_session().await?;
        self.sink.send(message, &session).await?;
        info!(session = %session, "Message sent (fire-and-forget)");
        Ok(())
    }

    // ========================================================================
    // Inbound delivery
    // ========================================================================

    /// Correlates an inbound application message to its waiting request.
    ///
    /// Extracts the correlation key; if a slot exists it is completed and
    /// removed in one step. Messages without a key, or without a waiting
    /// slot, are dropped by the correlator (another observer may still
    /// handle them).
    pub async fn deliver(&self, message: FixMessage) {
        let Some(key) = message.get_str(self.correlation_tag).map(str::to_string) else {
            debug!("Inbound message has no correlation key, dropped");
            return;
        };

        let slot = self.pending.write().await.remove(&key);
        match slot {
            Some(tx) => {
                if tx.send(message).is_err() {
                    // The waiter gave up between removal and completion.
                    debug!(%key, "Waiter gone, response discarded");
                } else {
                    debug!(%key, "Response correlated");
                }
            }
            None => {
                debug!(%key, "No outstanding request for key, response dropped");
            }
        }
    }

    async fn require_session(&self) -> HarnessResult<SessionId> {
        self.active_session
            .read()
            .await
            .clone()
            .ok_or_else(|| HarnessError::NoSession("no active FIX session".to_string()))
    }
}

impl fmt::Debug for FixInitiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixInitiator")
            .field("correlation_tag", &self.correlation_tag)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
