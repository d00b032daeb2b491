//! # Message Bus
//!
//! Pluggable broker seam for the messaging-bus observation channel, plus
//! an in-memory queue broker for tests.
//!
//! Concrete broker integrations (ActiveMQ, IBM MQ, Kafka) live outside
//! this crate; tests that populate the ledger's MQ source use
//! [`InMemoryBroker`].

pub mod broker;
pub mod in_memory;

pub use broker::MessageBroker;
pub use in_memory::InMemoryBroker;
