//! # Domain Layer
//!
//! Core types shared by every harness component: the error taxonomy,
//! validated value objects, and the reconciliation data model.

pub mod errors;
pub mod model;
pub mod value_objects;
