//! # Trade Record
//!
//! Per-source normalized view of a fill.
//!
//! A [`TradeRecord`] is what the reconciliation ledger stores: one record
//! per (source, correlation key), with whatever fields that channel could
//! observe. Absent fields stay `None`; the comparison engine treats them
//! as "N/A".
//!
//! # Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use synthex::domain::model::TradeRecord;
//!
//! let record = TradeRecord::from_fix()
//!     .with_request_key("ORD-001")
//!     .with_symbol("AAPL")
//!     .with_price(Decimal::new(15025, 2))
//!     .with_quantity(Decimal::from(100));
//!
//! assert_eq!(record.correlation_key(), Some("ORD-001"));
//! ```

use crate::domain::value_objects::RecordSource;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Normalized trade record from a single observation channel.
///
/// # Invariants
///
/// - The source never changes after construction
/// - A record is only accepted by the ledger if it has a correlation key
///   (request key or venue order id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    source: RecordSource,
    order_id: Option<String>,
    request_key: Option<String>,
    symbol: Option<String>,
    quantity: Option<Decimal>,
    price: Option<Decimal>,
    amount: Option<Decimal>,
    currency: Option<String>,
    settlement_date: Option<NaiveDate>,
    execution_time: Option<NaiveDateTime>,
    account: Option<String>,
    exec_type: Option<String>,
    additional_fields: HashMap<String, String>,
}

impl TradeRecord {
    /// Creates an empty record for the given source.
    #[must_use]
    pub fn new(source: RecordSource) -> Self {
        Self {
            source,
            order_id: None,
            request_key: None,
            symbol: None,
            quantity: None,
            price: None,
            amount: None,
            currency: None,
            settlement_date: None,
            execution_time: None,
            account: None,
            exec_type: None,
            additional_fields: HashMap::new(),
        }
    }

    /// Creates an empty record observed on the order-protocol channel.
    #[must_use]
    pub fn from_fix() -> Self {
        Self::new(RecordSource::Fix)
    }

    /// Creates an empty record observed on the messaging-bus channel.
    #[must_use]
    pub fn from_mq() -> Self {
        Self::new(RecordSource::Mq)
    }

    /// Creates an empty record observed on the query-API channel.
    #[must_use]
    pub fn from_api() -> Self {
        Self::new(RecordSource::Api)
    }

    // ========================================================================
    // Fluent setters
    // ========================================================================

    /// Sets the venue-assigned order id.
    #[must_use]
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Sets the client-assigned request key.
    #[must_use]
    pub fn with_request_key(mut self, key: impl Into<String>) -> Self {
        self.request_key = Some(key.into());
        self
    }

    /// Sets the instrument symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Sets the filled quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the fill price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the notional amount.
    #[must_use]
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the settlement date.
    #[must_use]
    pub fn with_settlement_date(mut self, date: NaiveDate) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Sets the execution timestamp.
    #[must_use]
    pub fn with_execution_time(mut self, time: NaiveDateTime) -> Self {
        self.execution_time = Some(time);
        self
    }

    /// Sets the account.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the execution type code (e.g. "8" for rejected).
    #[must_use]
    pub fn with_exec_type(mut self, exec_type: impl Into<String>) -> Self {
        self.exec_type = Some(exec_type.into());
        self
    }

    /// Adds an auxiliary field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_fields.insert(key.into(), value.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the source channel.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> RecordSource {
        self.source
    }

    /// Returns the venue-assigned order id, if any.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    /// Returns the client-assigned request key, if any.
    #[must_use]
    pub fn request_key(&self) -> Option<&str> {
        self.request_key.as_deref()
    }

    /// Returns the instrument symbol, if any.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Returns the filled quantity, if any.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> Option<Decimal> {
        self.quantity
    }

    /// Returns the fill price, if any.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Returns the notional amount, if any.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Returns the currency, if any.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Returns the settlement date, if any.
    #[inline]
    #[must_use]
    pub const fn settlement_date(&self) -> Option<NaiveDate> {
        self.settlement_date
    }

    /// Returns the execution timestamp, if any.
    #[inline]
    #[must_use]
    pub const fn execution_time(&self) -> Option<NaiveDateTime> {
        self.execution_time
    }

    /// Returns the account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Returns the execution type code, if any.
    #[must_use]
    pub fn exec_type(&self) -> Option<&str> {
        self.exec_type.as_deref()
    }

    /// Looks up an auxiliary field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.additional_fields.get(key).map(String::as_str)
    }

    /// Returns all auxiliary fields.
    #[must_use]
    pub const fn additional_fields(&self) -> &HashMap<String, String> {
        &self.additional_fields
    }

    /// Returns the key used to match this record across sources.
    ///
    /// The request key wins when present; otherwise the venue order id.
    #[must_use]
    pub fn correlation_key(&self) -> Option<&str> {
        self.request_key.as_deref().or(self.order_id.as_deref())
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradeRecord{{source={}, key={}, symbol={}, qty={}, price={}, amount={}, settle={}}}",
            self.source,
            self.correlation_key().unwrap_or("none"),
            self.symbol.as_deref().unwrap_or("none"),
            opt(self.quantity),
            opt(self.price),
            opt(self.amount),
            self.settlement_date
                .map_or_else(|| "none".to_string(), |d| d.to_string()),
        )
    }
}

fn opt(value: Option<Decimal>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    mod correlation_key {
        use super::*;

        #[test]
        fn request_key_wins_over_order_id() {
            let record = TradeRecord::from_fix()
                .with_request_key("CL-1")
                .with_order_id("VENUE-9");
            assert_eq!(record.correlation_key(), Some("CL-1"));
        }

        #[test]
        fn order_id_used_when_no_request_key() {
            let record = TradeRecord::from_mq().with_order_id("VENUE-9");
            assert_eq!(record.correlation_key(), Some("VENUE-9"));
        }

        #[test]
        fn none_when_neither_present() {
            let record = TradeRecord::from_api();
            assert_eq!(record.correlation_key(), None);
        }
    }

    mod builder {
        use super::*;

        #[test]
        fn all_fields_round_trip() {
            let date = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
            let record = TradeRecord::from_fix()
                .with_request_key("ORD-1")
                .with_order_id("VENUE-1")
                .with_symbol("MSFT")
                .with_quantity(dec!(500))
                .with_price(dec!(305.50))
                .with_amount(dec!(152750))
                .with_currency("USD")
                .with_settlement_date(date)
                .with_account("FUND-001")
                .with_exec_type("2")
                .with_field("venue", "SIM");

            assert_eq!(record.source(), RecordSource::Fix);
            assert_eq!(record.symbol(), Some("MSFT"));
            assert_eq!(record.quantity(), Some(dec!(500)));
            assert_eq!(record.price(), Some(dec!(305.50)));
            assert_eq!(record.amount(), Some(dec!(152750)));
            assert_eq!(record.currency(), Some("USD"));
            assert_eq!(record.settlement_date(), Some(date));
            assert_eq!(record.account(), Some("FUND-001"));
            assert_eq!(record.exec_type(), Some("2"));
            assert_eq!(record.field("venue"), Some("SIM"));
            assert_eq!(record.field("missing"), None);
        }

        #[test]
        fn source_constructors() {
            assert_eq!(TradeRecord::from_fix().source(), RecordSource::Fix);
            assert_eq!(TradeRecord::from_mq().source(), RecordSource::Mq);
            assert_eq!(TradeRecord::from_api().source(), RecordSource::Api);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_shows_key_and_symbol() {
            let record = TradeRecord::from_fix()
                .with_request_key("ORD-1")
                .with_symbol("AAPL");
            let text = record.to_string();
            assert!(text.contains("FIX"));
            assert!(text.contains("ORD-1"));
            assert!(text.contains("AAPL"));
        }
    }
}
