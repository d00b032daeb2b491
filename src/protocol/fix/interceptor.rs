//! # Interceptor
//!
//! Evaluates inbound venue-side messages against the [`StubRegistry`] and
//! auto-generates responses.
//!
//! For each handled message the interceptor applies the rule's delay
//! (interruptible on shutdown), generates the next response in the rule's
//! sequence, normalises the response header so it routes back to the
//! original sender, copies the configured correlation fields from the
//! request, and hands the response to the transport sink.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use synthex::protocol::fix::{ChannelSink, FixInterceptor, StubRegistry};
//!
//! let registry = Arc::new(StubRegistry::new());
//! let (sink, _rx) = ChannelSink::new(16);
//! let interceptor = FixInterceptor::new(registry, Arc::new(sink));
//! # let _ = interceptor;
//! ```

use crate::domain::errors::HarnessResult;
use crate::protocol::fix::message::{FixMessage, tags};
use crate::protocol::fix::session::SessionId;
use crate::protocol::fix::stub_registry::StubRegistry;
use crate::protocol::fix::transport::TransportSink;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Venue-side message interceptor driven by the stub registry.
pub struct FixInterceptor {
    registry: Arc<StubRegistry>,
    sink: Arc<dyn TransportSink>,
    correlation_tags: Vec<u32>,
    shutdown_tx: broadcast::Sender<()>,
    shut_down: AtomicBool,
}

impl FixInterceptor {
    /// Creates an interceptor over the given registry and sink.
    ///
    /// ClOrdID (11) is the default correlation tag.
    #[must_use]
    pub fn new(registry: Arc<StubRegistry>, sink: Arc<dyn TransportSink>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            registry,
            sink,
            correlation_tags: vec![tags::CL_ORD_ID],
            shutdown_tx,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Replaces the set of correlation tags copied from request to
    /// response.
    #[must_use]
    pub fn with_correlation_tags(mut self, correlation_tags: Vec<u32>) -> Self {
        self.correlation_tags = correlation_tags;
        self
    }

    /// Returns the registry driving this interceptor.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<StubRegistry> {
        &self.registry
    }

    /// Interrupts every in-flight stub delay and makes future delays abort
    /// immediately. Interrupted messages get no response.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
        info!("Interceptor shut down");
    }

    /// Processes an inbound message against the stub registry.
    ///
    /// The session identifies the inbound message's (sender, target) pair;
    /// the generated response is addressed with the pair swapped so it
    /// routes back to the original sender.
    ///
    /// Returns `Ok(true)` if a stub handled the message, `Ok(false)` if no
    /// rule matched, the rule generated no response, or the delay was
    /// interrupted by shutdown.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TransportFailure` if the sink rejected the
    /// response. Transport errors never poison the registry; the
    /// interceptor stays usable.
    pub async fn intercept(
        &self,
        message: &FixMessage,
        session: &SessionId,
    ) -> HarnessResult<bool> {
        let Some(rule) = self.registry.find_match(message) else {
            debug!(session = %session, "No stub match for message");
            return Ok(false);
        };

        if !self.apply_delay(rule.delay()).await {
            warn!(
                stub = %rule.description(),
                session = %session,
                "Stub delay interrupted by shutdown, dropping response"
            );
            return Ok(false);
        }

        let Some(mut response) = rule.generate_response(message) else {
            warn!(stub = %rule.description(), "Stub generated no response");
            return Ok(false);
        };

        // Route the response back to the original sender.
        response.set_sender_comp_id(session.target_comp_id());
        response.set_target_comp_id(session.sender_comp_id());

        for tag in &self.correlation_tags {
            if let Some(value) = message.get(*tag) {
                response.set(*tag, value.clone());
            }
        }

        self.sink.send(response, session).await?;
        info!(
            stub = %rule.description(),
            session = %session,
            "Stub response sent"
        );
        Ok(true)
    }

    /// Sleeps for the stub delay. Returns false if shutdown interrupted
    /// the wait (or had already been requested).
    async fn apply_delay(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            return true;
        }
        if self.shut_down.load(Ordering::SeqCst) {
            return false;
        }
        debug!(delay_ms = delay.as_millis() as u64, "Applying stub delay");
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::select! {
            () = sleep(delay) => true,
            _ = shutdown_rx.recv() => false,
        }
    }
}

impl fmt::Debug for FixInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixInterceptor")
            .field("registry", &self.registry)
            .field("correlation_tags", &self.correlation_tags)
            .field("shut_down", &self.shut_down.load(Ordering::SeqCst))
            .finish()
    }
}
