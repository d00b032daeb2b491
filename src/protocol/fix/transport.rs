//! # Transport Seam
//!
//! The engine hands outbound messages to a [`TransportSink`]; concrete
//! wire transports live outside this crate. [`ChannelSink`] is the
//! in-process implementation used by tests and for wiring an initiator
//! to an acceptor without a network.

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::protocol::fix::message::FixMessage;
use crate::protocol::fix::session::SessionId;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// An outbound message together with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The message being sent.
    pub message: FixMessage,
    /// The session the message was sent on.
    pub session: SessionId,
}

/// Delivery seam for outbound messages.
#[async_trait]
pub trait TransportSink: Send + Sync {
    /// Delivers a message on the given session.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TransportFailure` if the message could not
    /// be handed to the transport.
    async fn send(&self, message: FixMessage, session: &SessionId) -> HarnessResult<()>;
}

/// Channel-backed sink delivering into an in-process queue.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<OutboundMessage>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its messages arrive on.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl TransportSink for ChannelSink {
    async fn send(&self, message: FixMessage, session: &SessionId) -> HarnessResult<()> {
        self.tx
            .send(OutboundMessage {
                message,
                session: session.clone(),
            })
            .await
            .map_err(|e| {
                HarnessError::TransportFailure(format!("channel sink closed: {}", e))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::fix::message::msg_type;

    #[tokio::test]
    async fn delivers_message_with_session() {
        let (sink, mut rx) = ChannelSink::new(4);
        let session = SessionId::new("CLIENT", "VENUE");
        let message = FixMessage::new(msg_type::NEW_ORDER_SINGLE);

        sink.send(message.clone(), &session).await.unwrap();

        let outbound = rx.recv().await.unwrap();
        assert_eq!(outbound.message, message);
        assert_eq!(outbound.session, session);
    }

    #[tokio::test]
    async fn closed_receiver_is_transport_failure() {
        let (sink, rx) = ChannelSink::new(4);
        drop(rx);

        let session = SessionId::new("CLIENT", "VENUE");
        let result = sink
            .send(FixMessage::new(msg_type::NEW_ORDER_SINGLE), &session)
            .await;
        assert!(matches!(result, Err(HarnessError::TransportFailure(_))));
    }
}
