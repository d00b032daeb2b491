//! # REST Interfaces
//!
//! Seams for the query-API observation channel.
//!
//! Concrete HTTP clients and OAuth flows live outside this crate; the
//! engine only sees [`ApiClient`] for path-based requests and
//! [`Authenticator`] for bearer tokens. [`TokenCache`] adds caching and
//! pre-expiry refresh on top of any authenticator.

pub mod auth;
pub mod client;

pub use auth::{Authenticator, BearerToken, TokenCache};
pub use client::{ApiClient, ApiResponse};
