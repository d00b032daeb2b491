//! # Synthex
//!
//! Core engine of a financial-protocol test harness: a programmable
//! synthetic trading venue, request/response correlation, and three-way
//! trade reconciliation under numeric tolerance.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain`): error taxonomy, validated value objects,
//!   and the reconciliation data model
//! - **Core Layer** (`core`): business calendar, synthetic data
//!   generation, the trade ledger, and its assertion surface
//! - **Protocol Layer** (`protocol`): the FIX message model, stub registry,
//!   interceptor, initiator, and the bus/API collaborator seams
//! - **Scenario Layer** (`scenario`): deterministic and LLM-backed
//!   translation of natural-language intent into order specifications
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use synthex::protocol::fix::{
//!     ChannelSink, FixMessageBuilder, FixVersion, StubRegistry, tags,
//! };
//!
//! // Program the synthetic venue: reject every AAPL order.
//! let registry = Arc::new(StubRegistry::new());
//! registry
//!     .when(|msg| msg.get_str(tags::SYMBOL) == Some("AAPL"))
//!     .respond_with(|req| {
//!         FixMessageBuilder::rejection_for(req, FixVersion::Fix44, "Fat-finger price check failed")
//!             .ok()
//!     })
//!     .described_as("AAPL fat-finger rejection")
//!     .register()
//!     .unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod domain;
pub mod protocol;
pub mod scenario;
