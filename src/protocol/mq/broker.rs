//! # Broker Seam
//!
//! Interface for message broker interactions.

use crate::domain::errors::HarnessResult;
use async_trait::async_trait;
use std::time::Duration;

/// Predicate over a message payload.
pub type PayloadFilter = dyn Fn(&str) -> bool + Send + Sync;

/// Pluggable interface for message broker interactions.
///
/// Implementations cover concrete brokers (ActiveMQ, IBM MQ, Kafka);
/// [`crate::protocol::mq::InMemoryBroker`] backs tests.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publishes a payload to the given destination (queue or topic).
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TransportFailure` if the broker rejected
    /// the publish.
    async fn publish(&self, destination: &str, payload: &str) -> HarnessResult<()>;

    /// Waits for a single message on the destination.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Timeout` if no message arrived in time, or
    /// `HarnessError::TransportFailure` if the broker is closed.
    async fn listen(&self, destination: &str, timeout: Duration) -> HarnessResult<String>;

    /// Waits for the first message on the destination matching the filter.
    ///
    /// Non-matching messages are left on the queue.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Timeout` if no matching message arrived in
    /// time, or `HarnessError::TransportFailure` if the broker is closed.
    async fn listen_with_filter(
        &self,
        destination: &str,
        filter: &PayloadFilter,
        timeout: Duration,
    ) -> HarnessResult<String>;

    /// Returns true if the broker connection is active.
    fn is_connected(&self) -> bool;

    /// Closes the broker connection and releases resources.
    fn close(&self);
}
