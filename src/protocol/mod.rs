//! # Protocol Layer
//!
//! The three observation channels the harness drives and reconciles:
//! the FIX order protocol, the message bus, and the query API.

pub mod fix;
pub mod mq;
pub mod rest;
