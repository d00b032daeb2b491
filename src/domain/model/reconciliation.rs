//! # Reconciliation Model
//!
//! Structured result of a cross-source reconciliation.
//!
//! A [`ReconciliationResult`] holds the ordered field-level
//! [`FieldComparison`] verdicts for one correlation key, plus the aggregate
//! pass/fail derived from them.
//!
//! # Invariants
//!
//! - `passed` is true iff every comparison matched
//! - Comparisons keep the order in which they were added

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field comparison across the three sources.
///
/// Absent values mean the field was not observed on that channel; the
/// detailed report renders them as "N/A".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldComparison {
    field_name: String,
    fix_value: Option<String>,
    mq_value: Option<String>,
    api_value: Option<String>,
    is_match: bool,
}

impl FieldComparison {
    /// Creates a matching comparison.
    #[must_use]
    pub fn matched(
        field_name: impl Into<String>,
        fix_value: Option<String>,
        mq_value: Option<String>,
        api_value: Option<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            fix_value,
            mq_value,
            api_value,
            is_match: true,
        }
    }

    /// Creates a mismatching comparison.
    #[must_use]
    pub fn mismatched(
        field_name: impl Into<String>,
        fix_value: Option<String>,
        mq_value: Option<String>,
        api_value: Option<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            fix_value,
            mq_value,
            api_value,
            is_match: false,
        }
    }

    /// Returns the field name.
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the value observed on the FIX channel, if any.
    #[must_use]
    pub fn fix_value(&self) -> Option<&str> {
        self.fix_value.as_deref()
    }

    /// Returns the value observed on the MQ channel, if any.
    #[must_use]
    pub fn mq_value(&self) -> Option<&str> {
        self.mq_value.as_deref()
    }

    /// Returns the value observed on the API channel, if any.
    #[must_use]
    pub fn api_value(&self) -> Option<&str> {
        self.api_value.as_deref()
    }

    /// Returns true if the field matched across all present sources.
    #[inline]
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.is_match
    }
}

impl fmt::Display for FieldComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] FIX={} | MQ={} | API={}",
            self.field_name,
            self.fix_value.as_deref().unwrap_or("N/A"),
            self.mq_value.as_deref().unwrap_or("N/A"),
            self.api_value.as_deref().unwrap_or("N/A"),
        )
    }
}

/// Ordered field verdicts for a single correlation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    correlation_key: String,
    comparisons: Vec<FieldComparison>,
    passed: bool,
}

impl ReconciliationResult {
    /// Creates an empty result for the given key. An empty result passes.
    #[must_use]
    pub fn new(correlation_key: impl Into<String>) -> Self {
        Self {
            correlation_key: correlation_key.into(),
            comparisons: Vec::new(),
            passed: true,
        }
    }

    /// Appends a field comparison, updating the aggregate verdict.
    pub fn add_comparison(&mut self, comparison: FieldComparison) {
        if !comparison.is_match {
            self.passed = false;
        }
        self.comparisons.push(comparison);
    }

    /// Returns the correlation key.
    #[inline]
    #[must_use]
    pub fn correlation_key(&self) -> &str {
        &self.correlation_key
    }

    /// Returns the ordered comparisons.
    #[inline]
    #[must_use]
    pub fn comparisons(&self) -> &[FieldComparison] {
        &self.comparisons
    }

    /// Returns true iff every comparison matched.
    #[inline]
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Returns only the mismatching comparisons.
    #[must_use]
    pub fn mismatches(&self) -> Vec<&FieldComparison> {
        self.comparisons.iter().filter(|c| !c.is_match).collect()
    }

    /// Returns a formatted table of the reconciliation outcome.
    #[must_use]
    pub fn to_detailed_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "=== Reconciliation: {} [{}] ===\n",
            self.correlation_key,
            if self.passed { "PASSED" } else { "FAILED" }
        ));
        report.push_str(&format!(
            "{:<20} | {:<20} | {:<20} | {:<20} | Status\n",
            "Field", "FIX", "MQ", "API"
        ));
        report.push_str(&"-".repeat(100));
        report.push('\n');
        for c in &self.comparisons {
            report.push_str(&format!(
                "{:<20} | {:<20} | {:<20} | {:<20} | {}\n",
                c.field_name,
                c.fix_value.as_deref().unwrap_or("N/A"),
                c.mq_value.as_deref().unwrap_or("N/A"),
                c.api_value.as_deref().unwrap_or("N/A"),
                if c.is_match { "MATCH" } else { "MISMATCH" }
            ));
        }
        report
    }
}

impl fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReconciliationResult{{key='{}', passed={}, comparisons={}, mismatches={}}}",
            self.correlation_key,
            self.passed,
            self.comparisons.len(),
            self.mismatches().len(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    mod aggregate {
        use super::*;

        #[test]
        fn empty_result_passes() {
            let result = ReconciliationResult::new("K-1");
            assert!(result.passed());
            assert!(result.comparisons().is_empty());
        }

        #[test]
        fn all_matches_pass() {
            let mut result = ReconciliationResult::new("K-1");
            result.add_comparison(FieldComparison::matched(
                "price",
                some("100"),
                some("100"),
                some("100"),
            ));
            result.add_comparison(FieldComparison::matched(
                "symbol",
                some("AAPL"),
                some("AAPL"),
                some("AAPL"),
            ));
            assert!(result.passed());
            assert!(result.mismatches().is_empty());
        }

        #[test]
        fn single_mismatch_fails_aggregate() {
            let mut result = ReconciliationResult::new("K-1");
            result.add_comparison(FieldComparison::matched(
                "price",
                some("100"),
                some("100"),
                some("100"),
            ));
            result.add_comparison(FieldComparison::mismatched(
                "quantity",
                some("100"),
                some("200"),
                some("100"),
            ));
            assert!(!result.passed());
            assert_eq!(result.mismatches().len(), 1);
            assert_eq!(result.mismatches()[0].field_name(), "quantity");
        }

        #[test]
        fn comparison_order_preserved() {
            let mut result = ReconciliationResult::new("K-1");
            for name in ["price", "quantity", "amount"] {
                result.add_comparison(FieldComparison::matched(name, None, None, None));
            }
            let names: Vec<&str> = result
                .comparisons()
                .iter()
                .map(FieldComparison::field_name)
                .collect();
            assert_eq!(names, vec!["price", "quantity", "amount"]);
        }
    }

    mod report {
        use super::*;

        #[test]
        fn report_renders_absent_values_as_na() {
            let mut result = ReconciliationResult::new("K-1");
            result.add_comparison(FieldComparison::matched(
                "account",
                some("ACC-1"),
                None,
                None,
            ));
            let report = result.to_detailed_report();
            assert!(report.contains("N/A"));
            assert!(report.contains("PASSED"));
            assert!(report.contains("account"));
        }

        #[test]
        fn report_marks_mismatches() {
            let mut result = ReconciliationResult::new("K-1");
            result.add_comparison(FieldComparison::mismatched(
                "price",
                some("100"),
                some("101"),
                some("100"),
            ));
            let report = result.to_detailed_report();
            assert!(report.contains("FAILED"));
            assert!(report.contains("MISMATCH"));
        }

        #[test]
        fn comparison_display_format() {
            let comparison =
                FieldComparison::mismatched("price", some("100"), some("101"), None);
            assert_eq!(
                comparison.to_string(),
                "[price] FIX=100 | MQ=101 | API=N/A"
            );
        }
    }
}
