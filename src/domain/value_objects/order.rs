//! # Order Specification
//!
//! Immutable, validated description of an order a test intends to send.
//!
//! This module provides the [`OrderSpec`] value and its [`OrderSpecBuilder`].
//! Required fields are constructor parameters; optional fields are supplied
//! via `with_*` setters; invalid combinations are rejected at build time.
//!
//! # Invariants
//!
//! - Symbol is non-empty
//! - Quantity is >= 1
//! - LIMIT, STOP, and STOP_LIMIT orders carry a positive price
//! - Once built, the specification is immutable
//!
//! # Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use synthex::domain::value_objects::{OrderSide, OrderSpec, OrderType, TimeInForce};
//!
//! let order = OrderSpec::builder("AAPL", OrderSide::Buy, OrderType::Limit, 100)
//!     .with_price(Decimal::new(15000, 2))
//!     .with_time_in_force(TimeInForce::Day)
//!     .with_request_key("ORD-001")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(order.symbol(), "AAPL");
//! assert_eq!(order.currency(), "USD");
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::domain::value_objects::enums::{ExecType, OrderSide, OrderType, TimeInForce};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default currency applied when none is specified.
const DEFAULT_CURRENCY: &str = "USD";

/// Immutable order specification.
///
/// Built via [`OrderSpec::builder`]; see the module documentation for the
/// invariants enforced at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    price: Option<Decimal>,
    quantity: u64,
    time_in_force: TimeInForce,
    account: Option<String>,
    request_key: Option<String>,
    currency: String,
    expected_exec_type: Option<ExecType>,
}

impl OrderSpec {
    /// Starts building an order specification.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The instrument symbol (must be non-empty)
    /// * `side` - The order side
    /// * `order_type` - The order type
    /// * `quantity` - The order quantity (must be >= 1)
    #[must_use]
    pub fn builder(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: u64,
    ) -> OrderSpecBuilder {
        OrderSpecBuilder::new(symbol, side, order_type, quantity)
    }

    /// Returns the instrument symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the order side.
    #[inline]
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Returns the order type.
    #[inline]
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Returns the limit/stop price, if any.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Returns the order quantity.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Returns the time in force.
    #[inline]
    #[must_use]
    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Returns the account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Returns the client-assigned request key, if any.
    #[must_use]
    pub fn request_key(&self) -> Option<&str> {
        self.request_key.as_deref()
    }

    /// Returns the currency.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the execution type the test expects the venue to report.
    #[inline]
    #[must_use]
    pub const fn expected_exec_type(&self) -> Option<ExecType> {
        self.expected_exec_type
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderSpec{{symbol='{}', side={}, type={}, price={}, qty={}, tif={}, currency={}}}",
            self.symbol,
            self.side,
            self.order_type,
            self.price
                .map_or_else(|| "none".to_string(), |p| p.to_string()),
            self.quantity,
            self.time_in_force,
            self.currency,
        )
    }
}

/// Builder for [`OrderSpec`].
///
/// Collects optional fields and validates the combination at [`build`].
///
/// [`build`]: OrderSpecBuilder::build
#[derive(Debug, Clone)]
pub struct OrderSpecBuilder {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    quantity: u64,
    price: Option<Decimal>,
    time_in_force: TimeInForce,
    account: Option<String>,
    request_key: Option<String>,
    currency: Option<String>,
    expected_exec_type: Option<ExecType>,
}

impl OrderSpecBuilder {
    /// Creates a new builder with the required fields.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price: None,
            time_in_force: TimeInForce::Day,
            account: None,
            request_key: None,
            currency: None,
            expected_exec_type: None,
        }
    }

    /// Sets the limit/stop price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the time in force. Defaults to DAY.
    #[must_use]
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Sets the account.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the client-assigned request key.
    #[must_use]
    pub fn with_request_key(mut self, key: impl Into<String>) -> Self {
        self.request_key = Some(key.into());
        self
    }

    /// Sets the currency. Defaults to USD.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the execution type the test expects the venue to report.
    #[must_use]
    pub fn with_expected_exec_type(mut self, exec_type: ExecType) -> Self {
        self.expected_exec_type = Some(exec_type);
        self
    }

    /// Validates the collected fields and builds the immutable spec.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` if:
    /// - the symbol is empty
    /// - the quantity is zero
    /// - the order type requires a price and none was supplied
    /// - a supplied price is not positive
    pub fn build(self) -> HarnessResult<OrderSpec> {
        if self.symbol.trim().is_empty() {
            return Err(HarnessError::InvalidParameter(
                "order symbol must be non-empty".to_string(),
            ));
        }
        if self.quantity == 0 {
            return Err(HarnessError::InvalidParameter(
                "order quantity must be positive".to_string(),
            ));
        }
        if self.order_type.requires_price() && self.price.is_none() {
            return Err(HarnessError::InvalidParameter(format!(
                "{} order requires a price",
                self.order_type
            )));
        }
        if let Some(price) = self.price
            && price <= Decimal::ZERO
        {
            return Err(HarnessError::InvalidParameter(format!(
                "order price must be positive, got {}",
                price
            )));
        }

        Ok(OrderSpec {
            symbol: self.symbol,
            side: self.side,
            order_type: self.order_type,
            price: self.price,
            quantity: self.quantity,
            time_in_force: self.time_in_force,
            account: self.account,
            request_key: self.request_key,
            currency: self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            expected_exec_type: self.expected_exec_type,
        })
    }
}
