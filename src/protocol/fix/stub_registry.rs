//! # Stub Registry
//!
//! Thread-safe registry of stub rules, providing a WireMock-like API for
//! configuring how the synthetic venue responds to incoming messages.
//!
//! Rules are evaluated in registration order; the first rule whose
//! predicate accepts the message wins. Each rule carries one or more
//! response generators: invocation `i` uses generator `i`, and once the
//! sequence is exhausted the last generator answers every further call.
//!
//! # Concurrency
//!
//! `find_match` iterates a snapshot of the rule list, so evaluations see a
//! stable prefix even while other threads register rules or reset the
//! registry. Response-generator advancement is atomic per rule: concurrent
//! invocations observe distinct, monotonically advancing indices and the
//! combined call count equals the number of invocations.
//!
//! # Examples
//!
//! ```
//! use synthex::protocol::fix::{FixMessageBuilder, FixVersion, StubRegistry, tags};
//!
//! let registry = StubRegistry::new();
//! registry
//!     .when(|msg| msg.get_str(tags::SYMBOL) == Some("AAPL"))
//!     .respond_with(|req| {
//!         FixMessageBuilder::rejection_for(req, FixVersion::Fix44, "Fat-finger price check failed").ok()
//!     })
//!     .described_as("AAPL fat-finger rejection")
//!     .register()
//!     .unwrap();
//!
//! assert_eq!(registry.size(), 1);
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::protocol::fix::message::FixMessage;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Predicate over an incoming message.
pub type StubPredicate = dyn Fn(&FixMessage) -> bool + Send + Sync;

/// Response generator. May return `None` to signal "no response".
pub type ResponseGenerator = dyn Fn(&FixMessage) -> Option<FixMessage> + Send + Sync;

/// A single stub rule: a match predicate plus an ordered response sequence.
pub struct StubRule {
    predicate: Box<StubPredicate>,
    generators: Vec<Box<ResponseGenerator>>,
    delay: Duration,
    description: String,
    call_count: AtomicU64,
    response_index: AtomicUsize,
}

impl StubRule {
    /// Evaluates the predicate against a message.
    ///
    /// Callers wanting panic containment should go through
    /// [`StubRegistry::find_match`], which treats a panicking predicate as
    /// "no match".
    #[must_use]
    pub fn matches(&self, message: &FixMessage) -> bool {
        (self.predicate)(message)
    }

    /// Generates the next response in the sequence.
    ///
    /// Advancement saturates at the last generator, which answers every
    /// invocation after the sequence is exhausted. The chosen index and the
    /// call count advance atomically with respect to concurrent callers.
    #[must_use]
    pub fn generate_response(&self, request: &FixMessage) -> Option<FixMessage> {
        let last = self.generators.len() - 1;
        let index = self
            .response_index
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| {
                Some((i + 1).min(last))
            })
            .unwrap_or(last);
        self.call_count.fetch_add(1, Ordering::SeqCst);
        debug!(stub = %self.description, index, "Generating stub response");
        self.generators
            .get(index.min(last))
            .and_then(|generator| generator(request))
    }

    /// Returns the configured delay before responding.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the human-readable description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns how many times a response has been generated.
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for StubRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubRule")
            .field("description", &self.description)
            .field("generators", &self.generators.len())
            .field("delay", &self.delay)
            .field("call_count", &self.call_count())
            .finish()
    }
}

/// Ordered, thread-safe collection of stub rules.
pub struct StubRegistry {
    rules: RwLock<Vec<Arc<StubRule>>>,
}

impl StubRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Starts building a new stub rule with the given match criteria.
    #[must_use]
    pub fn when<P>(&self, predicate: P) -> StubRuleBuilder<'_>
    where
        P: Fn(&FixMessage) -> bool + Send + Sync + 'static,
    {
        StubRuleBuilder {
            registry: self,
            predicate: Box::new(predicate),
            generators: Vec::new(),
            delay: Duration::ZERO,
            description: "unnamed stub".to_string(),
        }
    }

    /// Finds the first rule, in registration order, matching the message.
    ///
    /// A predicate that panics is logged and treated as "no match"; the
    /// scan continues with later rules and the faulting rule stays
    /// registered.
    #[must_use]
    pub fn find_match(&self, message: &FixMessage) -> Option<Arc<StubRule>> {
        let snapshot = self.snapshot();
        for rule in snapshot {
            match catch_unwind(AssertUnwindSafe(|| rule.matches(message))) {
                Ok(true) => {
                    debug!(stub = %rule.description(), "Stub match found");
                    return Some(rule);
                }
                Ok(false) => {}
                Err(_) => {
                    warn!(
                        stub = %rule.description(),
                        "Stub predicate panicked, treating as no match"
                    );
                }
            }
        }
        None
    }

    /// Returns a snapshot copy of all registered rules.
    #[must_use]
    pub fn mappings(&self) -> Vec<Arc<StubRule>> {
        self.snapshot()
    }

    /// Removes all registered rules.
    ///
    /// Safe to call while evaluations are in flight: a `find_match` that
    /// began before the reset may still return a pre-reset rule.
    pub fn reset(&self) {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        info!("Stub registry reset");
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn snapshot(&self) -> Vec<Arc<StubRule>> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, rule: StubRule) -> usize {
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        rules.push(Arc::new(rule));
        rules.len()
    }
}

impl Default for StubRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StubRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubRegistry")
            .field("size", &self.size())
            .finish()
    }
}

/// Builder collecting the pieces of a stub rule before registration.
pub struct StubRuleBuilder<'a> {
    registry: &'a StubRegistry,
    predicate: Box<StubPredicate>,
    generators: Vec<Box<ResponseGenerator>>,
    delay: Duration,
    description: String,
}

impl StubRuleBuilder<'_> {
    /// Adds a response generator.
    #[must_use]
    pub fn respond_with<G>(mut self, generator: G) -> Self
    where
        G: Fn(&FixMessage) -> Option<FixMessage> + Send + Sync + 'static,
    {
        self.generators.push(Box::new(generator));
        self
    }

    /// Adds a further response for sequential response support.
    ///
    /// After all earlier responses have been used, this one takes over.
    #[must_use]
    pub fn then_respond_with<G>(self, generator: G) -> Self
    where
        G: Fn(&FixMessage) -> Option<FixMessage> + Send + Sync + 'static,
    {
        self.respond_with(generator)
    }

    /// Adds a delay before the stub sends its response.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets a human-readable description for the rule.
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Registers the rule in the registry.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::EmptyResponseSequence` if no response
    /// generator was configured.
    pub fn register(self) -> HarnessResult<()> {
        if self.generators.is_empty() {
            return Err(HarnessError::EmptyResponseSequence(self.description));
        }
        let description = self.description.clone();
        let total = self.registry.push(StubRule {
            predicate: self.predicate,
            generators: self.generators,
            delay: self.delay,
            description: self.description,
            call_count: AtomicU64::new(0),
            response_index: AtomicUsize::new(0),
        });
        info!(stub = %description, total, "Registered stub rule");
        Ok(())
    }
}

impl fmt::Debug for StubRuleBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubRuleBuilder")
            .field("description", &self.description)
            .field("generators", &self.generators.len())
            .finish()
    }
}
