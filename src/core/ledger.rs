//! # Trade Ledger
//!
//! Cross-source reconciliation engine.
//!
//! Accepts trade records observed on the FIX, MQ, and API channels and
//! performs field-by-field comparison under a configurable numeric
//! tolerance. Records are stored per source in insertion order so
//! [`TradeLedger::reconcile_all`] reports keys in the order tests
//! produced them.
//!
//! # Comparison rules
//!
//! - `price`, `quantity`, `amount`: both sides rounded to the configured
//!   precision (significant figures, banker's rounding), then
//!   `|a - b| <= tolerance`
//! - `settlement_date`: exact equality, absent values compare equal
//! - `symbol`, `currency`, `account`: exact string equality
//! - A value absent from a source is reported as "N/A" and never fails
//!   the field; only pairs where both values are present are compared
//!
//! # Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use synthex::core::TradeLedger;
//! use synthex::domain::model::TradeRecord;
//!
//! let ledger = TradeLedger::default();
//! ledger.add_record(
//!     TradeRecord::from_fix()
//!         .with_request_key("ORD-1")
//!         .with_symbol("MSFT")
//!         .with_price(Decimal::from(305)),
//! ).unwrap();
//!
//! let result = ledger.reconcile("ORD-1");
//! assert!(result.passed());
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::domain::model::{FieldComparison, ReconciliationResult, TradeRecord};
use crate::domain::value_objects::RecordSource;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Default rounding precision in significant figures.
const DEFAULT_PRECISION: u32 = 8;

/// Three sharded record stores plus the comparison engine.
///
/// The stores may be written concurrently from test threads; reconciling a
/// key takes a consistent snapshot of that key's three records before
/// comparing.
#[derive(Debug, Clone)]
pub struct TradeLedger {
    precision: u32,
    tolerance: Decimal,
    fix_records: Arc<RwLock<IndexMap<String, TradeRecord>>>,
    mq_records: Arc<RwLock<IndexMap<String, TradeRecord>>>,
    api_records: Arc<RwLock<IndexMap<String, TradeRecord>>>,
}

impl TradeLedger {
    /// Creates a ledger with the given rounding precision (significant
    /// figures) and numeric tolerance.
    #[must_use]
    pub fn new(precision: u32, tolerance: Decimal) -> Self {
        Self {
            precision,
            tolerance,
            fix_records: Arc::new(RwLock::new(IndexMap::new())),
            mq_records: Arc::new(RwLock::new(IndexMap::new())),
            api_records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Returns the rounding precision in significant figures.
    #[inline]
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the numeric comparison tolerance.
    #[inline]
    #[must_use]
    pub const fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Adds a trade record. The record's source determines which internal
    /// store it lands in; a repeat key overwrites in place.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::MissingCorrelationKey` if the record has
    /// neither a request key nor a venue order id.
    pub fn add_record(&self, record: TradeRecord) -> HarnessResult<()> {
        let key = record
            .correlation_key()
            .ok_or_else(|| HarnessError::MissingCorrelationKey(record.to_string()))?
            .to_string();

        let store = self.store(record.source());
        let mut guard = store.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        debug!(source = %record.source(), %key, "Added trade record");
        guard.insert(key, record);
        Ok(())
    }

    /// Reconciles the records stored under the given correlation key.
    ///
    /// Compares price, quantity, amount, settlement date, symbol, currency,
    /// and account, in that order.
    #[must_use]
    pub fn reconcile(&self, correlation_key: &str) -> ReconciliationResult {
        info!(key = %correlation_key, "Reconciling records");

        // Snapshot the three records before comparing so a concurrent
        // writer cannot produce a torn view of the key.
        let fix = self.snapshot(RecordSource::Fix, correlation_key);
        let mq = self.snapshot(RecordSource::Mq, correlation_key);
        let api = self.snapshot(RecordSource::Api, correlation_key);

        let mut result = ReconciliationResult::new(correlation_key);

        self.compare_amounts(
            &mut result,
            "price",
            fix.as_ref().and_then(TradeRecord::price),
            mq.as_ref().and_then(TradeRecord::price),
            api.as_ref().and_then(TradeRecord::price),
        );
        self.compare_amounts(
            &mut result,
            "quantity",
            fix.as_ref().and_then(TradeRecord::quantity),
            mq.as_ref().and_then(TradeRecord::quantity),
            api.as_ref().and_then(TradeRecord::quantity),
        );
        self.compare_amounts(
            &mut result,
            "amount",
            fix.as_ref().and_then(TradeRecord::amount),
            mq.as_ref().and_then(TradeRecord::amount),
            api.as_ref().and_then(TradeRecord::amount),
        );
        compare_dates(
            &mut result,
            "settlementDate",
            fix.as_ref().and_then(TradeRecord::settlement_date),
            mq.as_ref().and_then(TradeRecord::settlement_date),
            api.as_ref().and_then(TradeRecord::settlement_date),
        );
        compare_strings(
            &mut result,
            "symbol",
            fix.as_ref().and_then(|r| r.symbol().map(str::to_string)),
            mq.as_ref().and_then(|r| r.symbol().map(str::to_string)),
            api.as_ref().and_then(|r| r.symbol().map(str::to_string)),
        );
        compare_strings(
            &mut result,
            "currency",
            fix.as_ref().and_then(|r| r.currency().map(str::to_string)),
            mq.as_ref().and_then(|r| r.currency().map(str::to_string)),
            api.as_ref().and_then(|r| r.currency().map(str::to_string)),
        );
        compare_strings(
            &mut result,
            "account",
            fix.as_ref().and_then(|r| r.account().map(str::to_string)),
            mq.as_ref().and_then(|r| r.account().map(str::to_string)),
            api.as_ref().and_then(|r| r.account().map(str::to_string)),
        );

        let outcome = if result.passed() { "PASSED" } else { "FAILED" };
        info!(key = %correlation_key, outcome, "Reconciliation complete");
        result
    }

    /// Reconciles every known correlation key, preserving insertion order
    /// across the three sources.
    #[must_use]
    pub fn reconcile_all(&self) -> Vec<ReconciliationResult> {
        let mut keys: IndexMap<String, ()> = IndexMap::new();
        for source in [RecordSource::Fix, RecordSource::Mq, RecordSource::Api] {
            let store = self.store(source);
            let guard = store.read().unwrap_or_else(std::sync::PoisonError::into_inner);
            for key in guard.keys() {
                keys.entry(key.clone()).or_insert(());
            }
        }
        keys.keys().map(|key| self.reconcile(key)).collect()
    }

    /// Returns true if the FIX store contains a rejected execution
    /// (`exec_type == "8"`) for the given symbol.
    #[must_use]
    pub fn verify_rejection_handled(&self, symbol: &str) -> bool {
        let guard = self
            .fix_records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .values()
            .any(|r| r.symbol() == Some(symbol) && r.exec_type() == Some("8"))
    }

    /// Returns the number of records currently stored for a source.
    #[must_use]
    pub fn record_count(&self, source: RecordSource) -> usize {
        self.store(source)
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Clears all records from all three stores.
    pub fn clear(&self) {
        for source in [RecordSource::Fix, RecordSource::Mq, RecordSource::Api] {
            self.store(source)
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clear();
        }
        info!("Ledger cleared");
    }

    fn store(&self, source: RecordSource) -> &Arc<RwLock<IndexMap<String, TradeRecord>>> {
        match source {
            RecordSource::Fix => &self.fix_records,
            RecordSource::Mq => &self.mq_records,
            RecordSource::Api => &self.api_records,
        }
    }

    fn snapshot(&self, source: RecordSource, key: &str) -> Option<TradeRecord> {
        self.store(source)
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn compare_amounts(
        &self,
        result: &mut ReconciliationResult,
        field_name: &str,
        fix: Option<Decimal>,
        mq: Option<Decimal>,
        api: Option<Decimal>,
    ) {
        let fix = fix.map(|v| self.normalize(v));
        let mq = mq.map(|v| self.normalize(v));
        let api = api.map(|v| self.normalize(v));

        let matched = self.amounts_match(fix, mq)
            && self.amounts_match(fix, api)
            && self.amounts_match(mq, api);

        let comparison = if matched {
            FieldComparison::matched(field_name, str_of(fix), str_of(mq), str_of(api))
        } else {
            FieldComparison::mismatched(field_name, str_of(fix), str_of(mq), str_of(api))
        };
        result.add_comparison(comparison);
    }

    /// Rounds a value to the configured precision before comparison.
    fn normalize(&self, value: Decimal) -> Decimal {
        value
            .round_sf_with_strategy(self.precision, RoundingStrategy::MidpointNearestEven)
            .unwrap_or(value)
    }

    /// Tolerance comparison over present values. A pair with an absent side
    /// matches by definition; the verdict records it as "N/A".
    fn amounts_match(&self, a: Option<Decimal>, b: Option<Decimal>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => (a - b).abs() <= self.tolerance,
            _ => true,
        }
    }
}

impl Default for TradeLedger {
    /// Eight significant figures, tolerance 1e-4.
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION, Decimal::new(1, 4))
    }
}

fn compare_dates(
    result: &mut ReconciliationResult,
    field_name: &str,
    fix: Option<NaiveDate>,
    mq: Option<NaiveDate>,
    api: Option<NaiveDate>,
) {
    let matched = dates_match(fix, mq) && dates_match(fix, api) && dates_match(mq, api);
    let to_str = |d: Option<NaiveDate>| d.map(|v| v.to_string());
    let comparison = if matched {
        FieldComparison::matched(field_name, to_str(fix), to_str(mq), to_str(api))
    } else {
        FieldComparison::mismatched(field_name, to_str(fix), to_str(mq), to_str(api))
    };
    result.add_comparison(comparison);
}

fn dates_match(a: Option<NaiveDate>, b: Option<NaiveDate>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn compare_strings(
    result: &mut ReconciliationResult,
    field_name: &str,
    fix: Option<String>,
    mq: Option<String>,
    api: Option<String>,
) {
    let pair = |a: &Option<String>, b: &Option<String>| match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    };
    let matched = pair(&fix, &mq) && pair(&fix, &api) && pair(&mq, &api);
    let comparison = if matched {
        FieldComparison::matched(field_name, fix, mq, api)
    } else {
        FieldComparison::mismatched(field_name, fix, mq, api)
    };
    result.add_comparison(comparison);
}

fn str_of(value: Option<Decimal>) -> Option<String> {
    value.map(|v| v.to_string())
}
