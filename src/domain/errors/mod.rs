//! # Errors
//!
//! Harness error taxonomy.
//!
//! - [`HarnessError`]: coded error enum covering validation, correlation,
//!   transport, and assertion failures
//! - [`HarnessResult`]: result type alias for harness operations

pub mod harness_error;

pub use harness_error::{HarnessError, HarnessResult};
