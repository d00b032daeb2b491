//! # FIX Protocol Components
//!
//! The order-protocol side of the harness: the tag-addressed message
//! model, message builders, the stub registry driving the synthetic
//! venue, and the session wrappers for both sides of the connection.
//!
//! ## Core Types
//!
//! - [`FixMessage`] / [`FieldValue`]: tag-addressed message envelope
//! - [`FixMessageBuilder`]: fluent builder for application messages
//! - [`FixVersion`]: protocol version identifiers
//! - [`SessionId`]: session identity (sender/target comp ids)
//! - [`StubRegistry`] / [`StubRule`]: ordered, thread-safe response rules
//! - [`FixInterceptor`]: venue-side rule evaluation and response routing
//! - [`FixInitiator`]: client-side sending with response correlation
//! - [`FixAcceptor`]: venue-side session wrapper with message recording
//! - [`TransportSink`] / [`ChannelSink`]: outbound delivery seam

pub mod acceptor;
pub mod builder;
pub mod initiator;
pub mod interceptor;
pub mod message;
pub mod session;
pub mod stub_registry;
pub mod transport;
pub mod version;

pub use acceptor::FixAcceptor;
pub use builder::FixMessageBuilder;
pub use initiator::FixInitiator;
pub use interceptor::FixInterceptor;
pub use message::{FieldValue, FixMessage, msg_type, tags};
pub use session::SessionId;
pub use stub_registry::{ResponseGenerator, StubPredicate, StubRegistry, StubRule, StubRuleBuilder};
pub use transport::{ChannelSink, OutboundMessage, TransportSink};
pub use version::FixVersion;
