//! # Core Engine
//!
//! Calendar arithmetic, synthetic data generation, and the cross-source
//! reconciliation ledger with its assertion surface.
//!
//! ## Components
//!
//! - [`BusinessCalendar`]: weekend and holiday aware date arithmetic
//! - [`MarketMaker`]: statistical test-data generation
//! - [`TradeLedger`]: three-way trade record reconciliation
//! - [`LedgerAssert`]: fluent assertions over reconciliation results

pub mod calendar;
pub mod ledger;
pub mod ledger_assert;
pub mod market_maker;

pub use calendar::BusinessCalendar;
pub use ledger::TradeLedger;
pub use ledger_assert::LedgerAssert;
pub use market_maker::MarketMaker;
