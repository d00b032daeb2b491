//! # Domain Model
//!
//! Records and results the reconciliation engine operates on.
//!
//! - [`TradeRecord`]: per-source normalized fill view
//! - [`FieldComparison`]: single field verdict across the three sources
//! - [`ReconciliationResult`]: ordered verdicts plus the aggregate outcome

pub mod reconciliation;
pub mod trade_record;

pub use reconciliation::{FieldComparison, ReconciliationResult};
pub use trade_record::TradeRecord;
