//! # Harness Errors
//!
//! Typed error definitions for the test harness core.
//!
//! This module provides the [`HarnessError`] enum for representing
//! harness-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: Correlation and session errors
//! - **3000-3999**: Transport errors
//! - **4000-4999**: Assertion errors
//! - **9000-9999**: Internal errors
//!
//! # Examples
//!
//! ```
//! use synthex::domain::errors::HarnessError;
//!
//! let error = HarnessError::InvalidParameter("sigma must be non-negative".to_string());
//! assert_eq!(error.code(), 1001);
//! ```

use thiserror::Error;

/// Harness-level error with numeric error codes.
///
/// Covers domain validation, request correlation, transport delivery,
/// and reconciliation assertion failures. Every variant carries enough
/// context to reproduce the failing test from the message alone.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | Correlation and session errors |
/// | 3000-3999 | Transport errors |
/// | 4000-4999 | Assertion errors |
/// | 9000-9999 | Internal errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Domain parameter validation failed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Date range with end before start.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Stub registered without any response generator.
    #[error("stub '{0}' registered without a response generator")]
    EmptyResponseSequence(String),

    /// Trade record carries neither a request key nor a venue order id.
    #[error("trade record has no correlation key (request key or order id): {0}")]
    MissingCorrelationKey(String),

    // ========================================================================
    // Correlation and Session Errors (2000-2999)
    // ========================================================================
    /// A response is already awaited under the same request key.
    #[error("request key '{0}' is already awaiting a response")]
    DuplicateKey(String),

    /// Send attempted with no transport session bound.
    #[error("no active session: {0}")]
    NoSession(String),

    /// The awaited response did not arrive within the deadline.
    #[error("timed out after {timeout_ms} ms awaiting response for key '{key}'")]
    Timeout {
        /// The request key that was being awaited.
        key: String,
        /// The deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    // ========================================================================
    // Transport Errors (3000-3999)
    // ========================================================================
    /// The downstream transport could not deliver a message.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    // ========================================================================
    // Assertion Errors (4000-4999)
    // ========================================================================
    /// A reconciliation assertion detected a mismatch.
    ///
    /// The detail names the field and the three observed values.
    #[error("assertion failed for key '{key}': {detail}")]
    AssertionFailure {
        /// The correlation key under assertion.
        key: String,
        /// Field name and the FIX/MQ/API values involved.
        detail: String,
    },

    // ========================================================================
    // Internal Errors (9000-9999)
    // ========================================================================
    /// An invariant the harness relies on was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HarnessError {
    /// Returns the numeric error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthex::domain::errors::HarnessError;
    ///
    /// assert_eq!(HarnessError::InvalidParameter("x".to_string()).code(), 1001);
    /// assert_eq!(HarnessError::TransportFailure("x".to_string()).code(), 3001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidParameter(_) => 1001,
            Self::InvalidRange(_) => 1002,
            Self::EmptyResponseSequence(_) => 1003,
            Self::MissingCorrelationKey(_) => 1004,

            // Correlation and session errors (2000-2999)
            Self::DuplicateKey(_) => 2001,
            Self::NoSession(_) => 2002,
            Self::Timeout { .. } => 2003,

            // Transport errors (3000-3999)
            Self::TransportFailure(_) => 3001,

            // Assertion errors (4000-4999)
            Self::AssertionFailure { .. } => 4001,

            // Internal errors (9000-9999)
            Self::Internal(_) => 9001,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "correlation",
            3000..=3999 => "transport",
            4000..=4999 => "assertion",
            _ => "internal",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a correlation or session error.
    #[inline]
    #[must_use]
    pub const fn is_correlation_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is a transport error.
    #[inline]
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }

    /// Returns true if this is an assertion error.
    #[inline]
    #[must_use]
    pub const fn is_assertion_error(&self) -> bool {
        matches!(self.code(), 4000..=4999)
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
