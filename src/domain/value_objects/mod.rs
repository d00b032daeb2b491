//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Domain Enums
//!
//! - [`OrderSide`]: Buy, Sell, or ShortSell
//! - [`OrderType`]: Market, Limit, Stop, StopLimit
//! - [`TimeInForce`]: Day, GTC, IOC, FOK, GTD, AtClose
//! - [`ExecType`]: execution report type (tag 150)
//! - [`RecordSource`]: closed FIX / MQ / API source variant
//! - [`SettlementCycle`]: T0, T1, T2
//!
//! ## Order Specification
//!
//! - [`OrderSpec`]: immutable, validated order description
//! - [`OrderSpecBuilder`]: fluent builder with build-time validation

pub mod enums;
pub mod order;

pub use enums::{
    ExecType, OrderSide, OrderType, ParseEnumError, RecordSource, SettlementCycle, TimeInForce,
};
pub use order::{OrderSpec, OrderSpecBuilder};
