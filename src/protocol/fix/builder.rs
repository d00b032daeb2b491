//! # FIX Message Builder
//!
//! Fluent builder for the common application message types.
//!
//! Supports NewOrderSingle, ExecutionReport, and OrderCancelRequest, plus
//! convenience constructors that derive a full execution report (fill or
//! rejection) from the order being answered.
//!
//! # Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use synthex::protocol::fix::{FixMessageBuilder, FixVersion, tags};
//! use synthex::domain::value_objects::{OrderSide, OrderType};
//!
//! let order = FixMessageBuilder::new_order_single(FixVersion::Fix44)
//!     .cl_ord_id("ORD-001")
//!     .symbol("MSFT")
//!     .side(OrderSide::Buy)
//!     .order_type(OrderType::Limit)
//!     .price(Decimal::new(30550, 2))
//!     .quantity(500)
//!     .transact_time_now()
//!     .build();
//!
//! assert_eq!(order.get_str(tags::CL_ORD_ID), Some("ORD-001"));
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::domain::value_objects::{ExecType, OrderSide, OrderSpec, OrderType, TimeInForce};
use crate::protocol::fix::message::{FieldValue, FixMessage, msg_type, tags};
use crate::protocol::fix::version::FixVersion;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

/// Fluent builder for FIX application messages.
#[derive(Debug, Clone)]
pub struct FixMessageBuilder {
    message: FixMessage,
}

impl FixMessageBuilder {
    fn new(message_type: &str, version: FixVersion) -> Self {
        let mut message = FixMessage::new(message_type);
        message.set_header_str(tags::BEGIN_STRING, version.begin_string());
        Self { message }
    }

    // ========================================================================
    // Factory methods
    // ========================================================================

    /// Creates a NewOrderSingle (MsgType=D) builder.
    #[must_use]
    pub fn new_order_single(version: FixVersion) -> Self {
        Self::new(msg_type::NEW_ORDER_SINGLE, version)
    }

    /// Creates an ExecutionReport (MsgType=8) builder.
    #[must_use]
    pub fn execution_report(version: FixVersion) -> Self {
        Self::new(msg_type::EXECUTION_REPORT, version)
    }

    /// Creates an OrderCancelRequest (MsgType=F) builder.
    #[must_use]
    pub fn order_cancel_request(version: FixVersion) -> Self {
        Self::new(msg_type::ORDER_CANCEL_REQUEST, version)
    }

    // ========================================================================
    // Common fields
    // ========================================================================

    /// Sets ClOrdID (11).
    #[must_use]
    pub fn cl_ord_id(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::CL_ORD_ID, value);
        self
    }

    /// Sets OrderID (37).
    #[must_use]
    pub fn order_id(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::ORDER_ID, value);
        self
    }

    /// Sets ExecID (17).
    #[must_use]
    pub fn exec_id(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::EXEC_ID, value);
        self
    }

    /// Sets Symbol (55).
    #[must_use]
    pub fn symbol(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::SYMBOL, value);
        self
    }

    /// Sets Side (54).
    #[must_use]
    pub fn side(mut self, side: OrderSide) -> Self {
        self.message.set_char(tags::SIDE, side.fix_value());
        self
    }

    /// Sets Side (54) from a raw FIX value.
    #[must_use]
    pub fn side_char(mut self, side: char) -> Self {
        self.message.set_char(tags::SIDE, side);
        self
    }

    /// Sets OrdType (40).
    #[must_use]
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.message.set_char(tags::ORD_TYPE, order_type.fix_value());
        self
    }

    /// Sets Price (44).
    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.message.set_decimal(tags::PRICE, price);
        self
    }

    /// Sets OrderQty (38).
    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.message.set_int(tags::ORDER_QTY, quantity);
        self
    }

    /// Sets TimeInForce (59).
    #[must_use]
    pub fn time_in_force(mut self, tif: TimeInForce) -> Self {
        self.message.set_char(tags::TIME_IN_FORCE, tif.fix_value());
        self
    }

    /// Sets Account (1).
    #[must_use]
    pub fn account(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::ACCOUNT, value);
        self
    }

    /// Sets Currency (15).
    #[must_use]
    pub fn currency(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::CURRENCY, value);
        self
    }

    /// Sets TransactTime (60).
    #[must_use]
    pub fn transact_time(mut self, time: NaiveDateTime) -> Self {
        self.message.set_timestamp(tags::TRANSACT_TIME, time);
        self
    }

    /// Sets TransactTime (60) to the current UTC time.
    #[must_use]
    pub fn transact_time_now(self) -> Self {
        self.transact_time(Utc::now().naive_utc())
    }

    // ========================================================================
    // Execution report fields
    // ========================================================================

    /// Sets ExecType (150).
    #[must_use]
    pub fn exec_type(mut self, exec_type: ExecType) -> Self {
        self.message.set_char(tags::EXEC_TYPE, exec_type.fix_value());
        self
    }

    /// Sets OrdStatus (39).
    #[must_use]
    pub fn ord_status(mut self, status: char) -> Self {
        self.message.set_char(tags::ORD_STATUS, status);
        self
    }

    /// Sets LastPx (31).
    #[must_use]
    pub fn last_px(mut self, price: Decimal) -> Self {
        self.message.set_decimal(tags::LAST_PX, price);
        self
    }

    /// Sets LastQty (32).
    #[must_use]
    pub fn last_qty(mut self, quantity: i64) -> Self {
        self.message.set_int(tags::LAST_QTY, quantity);
        self
    }

    /// Sets LeavesQty (151).
    #[must_use]
    pub fn leaves_qty(mut self, quantity: i64) -> Self {
        self.message.set_int(tags::LEAVES_QTY, quantity);
        self
    }

    /// Sets CumQty (14).
    #[must_use]
    pub fn cum_qty(mut self, quantity: i64) -> Self {
        self.message.set_int(tags::CUM_QTY, quantity);
        self
    }

    /// Sets AvgPx (6).
    #[must_use]
    pub fn avg_px(mut self, price: Decimal) -> Self {
        self.message.set_decimal(tags::AVG_PX, price);
        self
    }

    /// Sets Text (58).
    #[must_use]
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.message.set_str(tags::TEXT, value);
        self
    }

    /// Sets an arbitrary body field.
    #[must_use]
    pub fn field(mut self, tag: u32, value: FieldValue) -> Self {
        self.message.set(tag, value);
        self
    }

    /// Returns the built message.
    #[must_use]
    pub fn build(self) -> FixMessage {
        self.message
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// Builds a NewOrderSingle from an order specification.
    ///
    /// A missing request key is replaced with a fresh UUID so the message
    /// is always correlatable.
    #[must_use]
    pub fn from_order_spec(spec: &OrderSpec, version: FixVersion) -> FixMessage {
        let cl_ord_id = spec
            .request_key()
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

        let mut builder = Self::new_order_single(version)
            .cl_ord_id(cl_ord_id)
            .symbol(spec.symbol())
            .side(spec.side())
            .order_type(spec.order_type())
            .quantity(spec.quantity() as i64)
            .time_in_force(spec.time_in_force())
            .currency(spec.currency())
            .transact_time_now();

        if let Some(price) = spec.price() {
            builder = builder.price(price);
        }
        if let Some(account) = spec.account() {
            builder = builder.account(account);
        }

        debug!(order = %spec, "Built NewOrderSingle from order spec");
        builder.build()
    }

    /// Builds a rejection ExecutionReport answering the given order.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` if the order lacks ClOrdID,
    /// Symbol, or Side.
    pub fn rejection_for(
        order: &FixMessage,
        version: FixVersion,
        reject_reason: &str,
    ) -> HarnessResult<FixMessage> {
        let (cl_ord_id, symbol, side) = order_identity(order)?;
        Ok(Self::execution_report(version)
            .cl_ord_id(cl_ord_id)
            .order_id(Uuid::new_v4().to_string())
            .exec_id(Uuid::new_v4().to_string())
            .exec_type(ExecType::Rejected)
            .ord_status('8')
            .symbol(symbol)
            .side_char(side)
            .leaves_qty(0)
            .cum_qty(0)
            .avg_px(Decimal::ZERO)
            .text(reject_reason)
            .transact_time_now()
            .build())
    }

    /// Builds a full-fill ExecutionReport answering the given order.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` if the order lacks ClOrdID,
    /// Symbol, Side, or OrderQty.
    pub fn fill_for(
        order: &FixMessage,
        version: FixVersion,
        fill_price: Decimal,
    ) -> HarnessResult<FixMessage> {
        let (cl_ord_id, symbol, side) = order_identity(order)?;
        let quantity = order.get_int(tags::ORDER_QTY).ok_or_else(|| {
            HarnessError::InvalidParameter("order has no OrderQty (38)".to_string())
        })?;
        Ok(Self::execution_report(version)
            .cl_ord_id(cl_ord_id)
            .order_id(Uuid::new_v4().to_string())
            .exec_id(Uuid::new_v4().to_string())
            .exec_type(ExecType::Fill)
            .ord_status('2')
            .symbol(symbol)
            .side_char(side)
            .last_px(fill_price)
            .last_qty(quantity)
            .leaves_qty(0)
            .cum_qty(quantity)
            .avg_px(fill_price)
            .transact_time_now()
            .build())
    }
}

/// Extracts the fields every derived execution report needs.
fn order_identity(order: &FixMessage) -> HarnessResult<(String, String, char)> {
    let cl_ord_id = order
        .get_str(tags::CL_ORD_ID)
        .ok_or_else(|| HarnessError::InvalidParameter("order has no ClOrdID (11)".to_string()))?;
    let symbol = order
        .get_str(tags::SYMBOL)
        .ok_or_else(|| HarnessError::InvalidParameter("order has no Symbol (55)".to_string()))?;
    let side = order
        .get_char(tags::SIDE)
        .ok_or_else(|| HarnessError::InvalidParameter("order has no Side (54)".to_string()))?;
    Ok((cl_ord_id.to_string(), symbol.to_string(), side))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> FixMessage {
        FixMessageBuilder::new_order_single(FixVersion::Fix44)
            .cl_ord_id("ORD-001")
            .symbol("MSFT")
            .side(OrderSide::Buy)
            .order_type(OrderType::Limit)
            .price(dec!(305.50))
            .quantity(500)
            .account("FUND-001")
            .time_in_force(TimeInForce::Day)
            .transact_time_now()
            .build()
    }

    mod new_order_single {
        use super::*;

        #[test]
        fn populates_all_fields() {
            let order = sample_order();
            assert_eq!(order.msg_type(), "D");
            assert_eq!(order.get_header_str(tags::BEGIN_STRING), Some("FIX.4.4"));
            assert_eq!(order.get_str(tags::CL_ORD_ID), Some("ORD-001"));
            assert_eq!(order.get_str(tags::SYMBOL), Some("MSFT"));
            assert_eq!(order.get_char(tags::SIDE), Some('1'));
            assert_eq!(order.get_char(tags::ORD_TYPE), Some('2'));
            assert_eq!(order.get_decimal(tags::PRICE), Some(dec!(305.50)));
            assert_eq!(order.get_int(tags::ORDER_QTY), Some(500));
            assert_eq!(order.get_str(tags::ACCOUNT), Some("FUND-001"));
            assert!(order.is_set(tags::TRANSACT_TIME));
        }
    }

    mod from_order_spec {
        use super::*;

        #[test]
        fn carries_spec_fields() {
            let spec = OrderSpec::builder("AAPL", OrderSide::Sell, OrderType::Limit, 200)
                .with_price(dec!(180))
                .with_request_key("K-7")
                .with_account("ACC-1")
                .build()
                .unwrap();

            let order = FixMessageBuilder::from_order_spec(&spec, FixVersion::Fix44);
            assert_eq!(order.get_str(tags::CL_ORD_ID), Some("K-7"));
            assert_eq!(order.get_str(tags::SYMBOL), Some("AAPL"));
            assert_eq!(order.get_char(tags::SIDE), Some('2'));
            assert_eq!(order.get_decimal(tags::PRICE), Some(dec!(180)));
            assert_eq!(order.get_str(tags::CURRENCY), Some("USD"));
            assert_eq!(order.get_str(tags::ACCOUNT), Some("ACC-1"));
        }

        #[test]
        fn market_order_has_no_price() {
            let spec = OrderSpec::builder("AAPL", OrderSide::Buy, OrderType::Market, 100)
                .build()
                .unwrap();
            let order = FixMessageBuilder::from_order_spec(&spec, FixVersion::Fix44);
            assert!(!order.is_set(tags::PRICE));
        }

        #[test]
        fn missing_request_key_minted() {
            let spec = OrderSpec::builder("AAPL", OrderSide::Buy, OrderType::Market, 100)
                .build()
                .unwrap();
            let order = FixMessageBuilder::from_order_spec(&spec, FixVersion::Fix44);
            assert!(order.get_str(tags::CL_ORD_ID).is_some());
        }
    }

    mod rejection_for {
        use super::*;

        #[test]
        fn copies_identity_and_sets_reject_fields() {
            let order = sample_order();
            let rejection =
                FixMessageBuilder::rejection_for(&order, FixVersion::Fix44, "Fat finger check")
                    .unwrap();

            assert_eq!(rejection.msg_type(), "8");
            assert_eq!(rejection.get_str(tags::CL_ORD_ID), Some("ORD-001"));
            assert_eq!(rejection.get_str(tags::SYMBOL), Some("MSFT"));
            assert_eq!(rejection.get_char(tags::EXEC_TYPE), Some('8'));
            assert_eq!(rejection.get_char(tags::ORD_STATUS), Some('8'));
            assert_eq!(rejection.get_str(tags::TEXT), Some("Fat finger check"));
            assert_eq!(rejection.get_int(tags::LEAVES_QTY), Some(0));
            assert_eq!(rejection.get_decimal(tags::AVG_PX), Some(Decimal::ZERO));
        }

        #[test]
        fn order_without_cl_ord_id_fails() {
            let order = FixMessageBuilder::new_order_single(FixVersion::Fix44)
                .symbol("MSFT")
                .side(OrderSide::Buy)
                .build();
            let result = FixMessageBuilder::rejection_for(&order, FixVersion::Fix44, "x");
            assert!(matches!(result, Err(HarnessError::InvalidParameter(_))));
        }
    }

    mod fill_for {
        use super::*;

        #[test]
        fn fills_full_quantity_at_given_price() {
            let order = sample_order();
            let fill =
                FixMessageBuilder::fill_for(&order, FixVersion::Fix44, dec!(305.25)).unwrap();

            assert_eq!(fill.get_char(tags::EXEC_TYPE), Some('2'));
            assert_eq!(fill.get_char(tags::ORD_STATUS), Some('2'));
            assert_eq!(fill.get_decimal(tags::LAST_PX), Some(dec!(305.25)));
            assert_eq!(fill.get_int(tags::LAST_QTY), Some(500));
            assert_eq!(fill.get_int(tags::CUM_QTY), Some(500));
            assert_eq!(fill.get_int(tags::LEAVES_QTY), Some(0));
            assert_eq!(fill.get_decimal(tags::AVG_PX), Some(dec!(305.25)));
        }

        #[test]
        fn fresh_ids_minted_per_report() {
            let order = sample_order();
            let a = FixMessageBuilder::fill_for(&order, FixVersion::Fix44, dec!(1)).unwrap();
            let b = FixMessageBuilder::fill_for(&order, FixVersion::Fix44, dec!(1)).unwrap();
            assert_ne!(a.get_str(tags::EXEC_ID), b.get_str(tags::EXEC_ID));
            assert_ne!(a.get_str(tags::ORDER_ID), b.get_str(tags::ORDER_ID));
        }

        #[test]
        fn order_without_quantity_fails() {
            let order = FixMessageBuilder::new_order_single(FixVersion::Fix44)
                .cl_ord_id("ORD-1")
                .symbol("MSFT")
                .side(OrderSide::Buy)
                .build();
            assert!(FixMessageBuilder::fill_for(&order, FixVersion::Fix44, dec!(1)).is_err());
        }
    }
}
