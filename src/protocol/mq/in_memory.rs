//! # In-Memory Broker
//!
//! Queue-per-destination broker implementation for tests.
//!
//! Payloads are held in named FIFO queues; listeners are woken on every
//! publish and on close. Suitable for tests that populate the ledger's
//! MQ source without a real broker.

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::protocol::mq::broker::{MessageBroker, PayloadFilter};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

/// In-memory queue broker.
#[derive(Debug, Clone)]
pub struct InMemoryBroker {
    queues: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
    notify: Arc<Notify>,
    connected: Arc<AtomicBool>,
}

impl InMemoryBroker {
    /// Creates a connected broker with no queues.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queues: Arc::new(Mutex::new(HashMap::new())),
            notify: Arc::new(Notify::new()),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns the number of payloads queued on a destination.
    #[must_use]
    pub fn queue_depth(&self, destination: &str) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(destination)
            .map_or(0, VecDeque::len)
    }

    /// Takes the first payload on the destination accepted by `take`,
    /// leaving everything else queued.
    fn try_take(
        &self,
        destination: &str,
        take: impl Fn(&str) -> bool,
    ) -> Option<String> {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = queues.get_mut(destination)?;
        let position = queue.iter().position(|payload| take(payload))?;
        queue.remove(position)
    }

    async fn receive(
        &self,
        destination: &str,
        take: impl Fn(&str) -> bool,
        timeout: Duration,
    ) -> HarnessResult<String> {
        let deadline = Instant::now() + timeout;
        loop {
            // Register for wakeups before checking the queue so a publish
            // between the check and the await is never missed.
            let mut notified = pin!(self.notify.notified());
            notified.as_mut().enable();

            if !self.is_connected() {
                return Err(HarnessError::TransportFailure(
                    "broker is closed".to_string(),
                ));
            }
            if let Some(payload) = self.try_take(destination, &take) {
                debug!(destination, "Message received");
                return Ok(payload);
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    key: destination.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            tokio::select! {
                () = &mut notified => {}
                () = sleep_until(deadline) => {}
            }
        }
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, destination: &str, payload: &str) -> HarnessResult<()> {
        if !self.is_connected() {
            return Err(HarnessError::TransportFailure(
                "broker is closed".to_string(),
            ));
        }
        {
            let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
            queues
                .entry(destination.to_string())
                .or_default()
                .push_back(payload.to_string());
        }
        debug!(destination, "Message published");
        self.notify.notify_waiters();
        Ok(())
    }

    async fn listen(&self, destination: &str, timeout: Duration) -> HarnessResult<String> {
        self.receive(destination, |_| true, timeout).await
    }

    async fn listen_with_filter(
        &self,
        destination: &str,
        filter: &PayloadFilter,
        timeout: Duration,
    ) -> HarnessResult<String> {
        self.receive(destination, filter, timeout).await
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
        info!("In-memory broker closed");
    }
}
