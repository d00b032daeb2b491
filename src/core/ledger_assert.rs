//! # Ledger Assertions
//!
//! Fluent assertion surface over reconciliation results.
//!
//! Assertions are chainable and return explicit `Result` values instead of
//! panicking, so test code propagates them with `?` and failure output
//! always names the key, the field, and the three observed values.
//!
//! # Examples
//!
//! ```
//! use synthex::core::{LedgerAssert, TradeLedger};
//! use synthex::domain::model::TradeRecord;
//!
//! # fn demo() -> synthex::domain::errors::HarnessResult<()> {
//! let ledger = TradeLedger::default();
//! ledger.add_record(TradeRecord::from_fix().with_request_key("K-1"))?;
//!
//! let result = ledger.reconcile("K-1");
//! LedgerAssert::assert_that(&result)
//!     .assert_parity()?
//!     .assert_settlement_date_match()?;
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::domain::model::{FieldComparison, ReconciliationResult};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{error, info};

/// Assertion DSL for trade reconciliation results.
#[derive(Debug, Clone, Copy)]
pub struct LedgerAssert<'a> {
    result: &'a ReconciliationResult,
}

impl<'a> LedgerAssert<'a> {
    /// Creates a new assertion over the given reconciliation result.
    #[must_use]
    pub const fn assert_that(result: &'a ReconciliationResult) -> Self {
        Self { result }
    }

    /// Returns the underlying reconciliation result.
    #[inline]
    #[must_use]
    pub const fn result(&self) -> &ReconciliationResult {
        self.result
    }

    /// Asserts that every field matches across all three sources.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::AssertionFailure` listing every mismatching
    /// field with its FIX, MQ, and API values.
    pub fn assert_parity(self) -> HarnessResult<Self> {
        if !self.result.passed() {
            let mut detail = String::from("reconciliation FAILED:");
            for mismatch in self.result.mismatches() {
                detail.push_str("\n  ");
                detail.push_str(&mismatch.to_string());
            }
            return self.fail(detail);
        }
        info!(key = %self.result.correlation_key(), "Parity assertion PASSED");
        Ok(self)
    }

    /// Asserts that the amount and price fields match within the supplied
    /// tolerance.
    ///
    /// Unlike reconciliation, only pairs where **both** sides are present
    /// are re-checked; an absent source never fails this assertion.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::AssertionFailure` naming the field, the pair,
    /// and the delta that exceeded the tolerance.
    pub fn assert_amount_match(self, tolerance: Decimal) -> HarnessResult<Self> {
        for comparison in self.result.comparisons() {
            if comparison.field_name() != "amount" && comparison.field_name() != "price" {
                continue;
            }
            self.check_pair(comparison, "FIX", comparison.fix_value(), "MQ", comparison.mq_value(), tolerance)?;
            self.check_pair(comparison, "FIX", comparison.fix_value(), "API", comparison.api_value(), tolerance)?;
            self.check_pair(comparison, "MQ", comparison.mq_value(), "API", comparison.api_value(), tolerance)?;
        }
        info!(key = %self.result.correlation_key(), "Amount match assertion PASSED");
        Ok(self)
    }

    /// Asserts that the settlement dates match across all sources.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::AssertionFailure` with the three values.
    pub fn assert_settlement_date_match(self) -> HarnessResult<Self> {
        self.assert_field_match("settlementDate")
    }

    /// Asserts that the named field matches across all sources.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::AssertionFailure` with the three values.
    pub fn assert_field_match(self, field_name: &str) -> HarnessResult<Self> {
        for comparison in self.result.comparisons() {
            if comparison.field_name() == field_name && !comparison.is_match() {
                return self.fail(format!("field mismatch {}", comparison));
            }
        }
        info!(
            key = %self.result.correlation_key(),
            field = field_name,
            "Field assertion PASSED"
        );
        Ok(self)
    }

    fn check_pair(
        &self,
        comparison: &FieldComparison,
        left_name: &str,
        left: Option<&str>,
        right_name: &str,
        right: Option<&str>,
        tolerance: Decimal,
    ) -> HarnessResult<()> {
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(());
        };
        let left_value = parse_decimal(comparison.field_name(), left_name, left)?;
        let right_value = parse_decimal(comparison.field_name(), right_name, right)?;
        let delta = (left_value - right_value).abs();
        if delta > tolerance {
            let detail = format!(
                "[{}] {}={} | {}={} (delta={} > tolerance={})",
                comparison.field_name(),
                left_name,
                left,
                right_name,
                right,
                delta,
                tolerance
            );
            error!(key = %self.result.correlation_key(), %detail, "Assertion failed");
            return Err(HarnessError::AssertionFailure {
                key: self.result.correlation_key().to_string(),
                detail,
            });
        }
        Ok(())
    }

    fn fail<T>(&self, detail: String) -> HarnessResult<T> {
        error!(key = %self.result.correlation_key(), %detail, "Assertion failed");
        Err(HarnessError::AssertionFailure {
            key: self.result.correlation_key().to_string(),
            detail,
        })
    }
}

fn parse_decimal(field: &str, source: &str, value: &str) -> HarnessResult<Decimal> {
    Decimal::from_str(value).map_err(|_| HarnessError::Internal(format!(
        "non-numeric {} value recorded for {}: '{}'",
        source, field, value
    )))
}
