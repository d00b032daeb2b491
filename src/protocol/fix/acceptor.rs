//! # Acceptor
//!
//! Venue-side wrapper that receives inbound messages and routes them
//! through the [`FixInterceptor`] for stub-driven responses.
//!
//! Every received message is recorded (bounded buffer, oldest evicted
//! first) so tests can assert on what the synthetic venue saw.

use crate::domain::errors::HarnessResult;
use crate::protocol::fix::interceptor::FixInterceptor;
use crate::protocol::fix::message::FixMessage;
use crate::protocol::fix::session::SessionId;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Default cap on the received-message buffer.
const DEFAULT_MAX_RECORDED: usize = 1000;

/// Venue-side session wrapper around the interceptor.
pub struct FixAcceptor {
    interceptor: Arc<FixInterceptor>,
    active_session: RwLock<Option<SessionId>>,
    received: RwLock<VecDeque<FixMessage>>,
    max_recorded: usize,
}

impl FixAcceptor {
    /// Creates an acceptor routing messages through the given interceptor.
    #[must_use]
    pub fn new(interceptor: Arc<FixInterceptor>) -> Self {
        Self {
            interceptor,
            active_session: RwLock::new(None),
            received: RwLock::new(VecDeque::new()),
            max_recorded: DEFAULT_MAX_RECORDED,
        }
    }

    /// Caps the received-message buffer.
    #[must_use]
    pub fn with_max_recorded(mut self, max_recorded: usize) -> Self {
        self.max_recorded = max_recorded;
        self
    }

    /// Returns the interceptor.
    #[inline]
    #[must_use]
    pub fn interceptor(&self) -> &Arc<FixInterceptor> {
        &self.interceptor
    }

    /// Binds the counterparty session after logon.
    ///
    /// The session is read from the inbound perspective: its sender is the
    /// counterparty, its target this venue.
    pub async fn on_logon(&self, session: SessionId) {
        info!(session = %session, "Acceptor logon");
        *self.active_session.write().await = Some(session);
    }

    /// Unbinds the session on logout, if it is the active one.
    pub async fn on_logout(&self, session: &SessionId) {
        let mut active = self.active_session.write().await;
        if active.as_ref() == Some(session) {
            info!(session = %session, "Acceptor logout");
            *active = None;
        }
    }

    /// Returns true if a session is currently bound.
    pub async fn is_logged_on(&self) -> bool {
        self.active_session.read().await.is_some()
    }

    /// Handles an inbound application message: records it, then routes it
    /// through the interceptor.
    ///
    /// Returns whether a stub handled the message. Messages arriving with
    /// no bound session are recorded but not handled.
    ///
    /// # Errors
    ///
    /// Propagates `HarnessError::TransportFailure` from the interceptor's
    /// send; the acceptor itself stays usable.
    pub async fn deliver(&self, message: FixMessage) -> HarnessResult<bool> {
        self.record(message.clone()).await;

        let Some(session) = self.active_session.read().await.clone() else {
            warn!("Message received with no bound session, not handled");
            return Ok(false);
        };

        let handled = self.interceptor.intercept(&message, &session).await?;
        if !handled {
            info!(session = %session, "Message not handled by any stub");
        }
        Ok(handled)
    }

    /// Returns a copy of all recorded messages, oldest first.
    pub async fn received_messages(&self) -> Vec<FixMessage> {
        self.received.read().await.iter().cloned().collect()
    }

    /// Clears the received-message buffer.
    pub async fn clear_received_messages(&self) {
        self.received.write().await.clear();
    }

    async fn record(&self, message: FixMessage) {
        let mut received = self.received.write().await;
        if received.len() >= self.max_recorded {
            received.pop_front();
        }
        received.push_back(message);
    }
}

impl fmt::Debug for FixAcceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixAcceptor")
            .field("interceptor", &self.interceptor)
            .field("max_recorded", &self.max_recorded)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::fix::message::{msg_type, tags};
    use crate::protocol::fix::stub_registry::StubRegistry;
    use crate::protocol::fix::transport::ChannelSink;

    fn acceptor_with_echo_stub() -> (FixAcceptor, tokio::sync::mpsc::Receiver<crate::protocol::fix::transport::OutboundMessage>) {
        let registry = Arc::new(StubRegistry::new());
        registry
            .when(|_| true)
            .respond_with(|_| Some(FixMessage::new(msg_type::EXECUTION_REPORT)))
            .described_as("echo stub")
            .register()
            .unwrap();
        let (sink, rx) = ChannelSink::new(16);
        let interceptor = Arc::new(FixInterceptor::new(registry, Arc::new(sink)));
        (FixAcceptor::new(interceptor), rx)
    }

    fn order(key: &str) -> FixMessage {
        let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
        msg.set_str(tags::CL_ORD_ID, key);
        msg
    }

    #[tokio::test]
    async fn no_session_records_but_does_not_handle() {
        let (acceptor, mut rx) = acceptor_with_echo_stub();

        let handled = acceptor.deliver(order("K-1")).await.unwrap();
        assert!(!handled);
        assert_eq!(acceptor.received_messages().await.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn routed_through_interceptor_when_logged_on() {
        let (acceptor, mut rx) = acceptor_with_echo_stub();
        acceptor.on_logon(SessionId::new("CLIENT", "VENUE")).await;

        let handled = acceptor.deliver(order("K-1")).await.unwrap();
        assert!(handled);

        let outbound = rx.recv().await.unwrap();
        assert_eq!(outbound.message.get_str(tags::CL_ORD_ID), Some("K-1"));
    }

    #[tokio::test]
    async fn received_buffer_bounded() {
        let (acceptor, _rx) = acceptor_with_echo_stub();
        let acceptor = acceptor.with_max_recorded(3);

        for i in 0..5 {
            let _ = acceptor.deliver(order(&format!("K-{}", i))).await;
        }

        let recorded = acceptor.received_messages().await;
        assert_eq!(recorded.len(), 3);
        // Oldest messages were evicted.
        assert_eq!(recorded[0].get_str(tags::CL_ORD_ID), Some("K-2"));
        assert_eq!(recorded[2].get_str(tags::CL_ORD_ID), Some("K-4"));
    }

    #[tokio::test]
    async fn clear_received_empties_buffer() {
        let (acceptor, _rx) = acceptor_with_echo_stub();
        let _ = acceptor.deliver(order("K-1")).await;
        assert!(!acceptor.received_messages().await.is_empty());

        acceptor.clear_received_messages().await;
        assert!(acceptor.received_messages().await.is_empty());
    }

    #[tokio::test]
    async fn logout_unbinds() {
        let (acceptor, _rx) = acceptor_with_echo_stub();
        let session = SessionId::new("CLIENT", "VENUE");
        acceptor.on_logon(session.clone()).await;
        assert!(acceptor.is_logged_on().await);

        acceptor.on_logout(&session).await;
        assert!(!acceptor.is_logged_on().await);
    }
}
