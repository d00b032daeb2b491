//! # FIX Message Model
//!
//! Tag-addressed message envelope.
//!
//! A [`FixMessage`] is a mapping from integer tag to typed [`FieldValue`],
//! with header fields kept separate from body fields. The engine reads and
//! writes by tag and never assumes a particular wire encoding; concrete
//! codecs live outside this crate.
//!
//! # Examples
//!
//! ```
//! use synthex::protocol::fix::{FixMessage, msg_type, tags};
//!
//! let mut order = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
//! order.set_str(tags::CL_ORD_ID, "ORD-001");
//! order.set_char(tags::SIDE, '1');
//!
//! assert!(order.is_set(tags::CL_ORD_ID));
//! assert_eq!(order.get_str(tags::CL_ORD_ID), Some("ORD-001"));
//! ```

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// FIX message type constants.
pub mod msg_type {
    /// NewOrderSingle message type.
    pub const NEW_ORDER_SINGLE: &str = "D";
    /// ExecutionReport message type.
    pub const EXECUTION_REPORT: &str = "8";
    /// OrderCancelRequest message type.
    pub const ORDER_CANCEL_REQUEST: &str = "F";
    /// Reject message type.
    pub const REJECT: &str = "3";
}

/// FIX field tag constants.
pub mod tags {
    /// Account (1).
    pub const ACCOUNT: u32 = 1;
    /// AvgPx (6).
    pub const AVG_PX: u32 = 6;
    /// BeginString (8). Header field.
    pub const BEGIN_STRING: u32 = 8;
    /// ClOrdID (11).
    pub const CL_ORD_ID: u32 = 11;
    /// CumQty (14).
    pub const CUM_QTY: u32 = 14;
    /// Currency (15).
    pub const CURRENCY: u32 = 15;
    /// ExecID (17).
    pub const EXEC_ID: u32 = 17;
    /// LastPx (31).
    pub const LAST_PX: u32 = 31;
    /// LastQty (32).
    pub const LAST_QTY: u32 = 32;
    /// MsgType (35). Header field.
    pub const MSG_TYPE: u32 = 35;
    /// OrderID (37).
    pub const ORDER_ID: u32 = 37;
    /// OrderQty (38).
    pub const ORDER_QTY: u32 = 38;
    /// OrdStatus (39).
    pub const ORD_STATUS: u32 = 39;
    /// OrdType (40).
    pub const ORD_TYPE: u32 = 40;
    /// Price (44).
    pub const PRICE: u32 = 44;
    /// SenderCompID (49). Header field.
    pub const SENDER_COMP_ID: u32 = 49;
    /// SendingTime (52). Header field.
    pub const SENDING_TIME: u32 = 52;
    /// Side (54).
    pub const SIDE: u32 = 54;
    /// Symbol (55).
    pub const SYMBOL: u32 = 55;
    /// TargetCompID (56). Header field.
    pub const TARGET_COMP_ID: u32 = 56;
    /// Text (58).
    pub const TEXT: u32 = 58;
    /// TimeInForce (59).
    pub const TIME_IN_FORCE: u32 = 59;
    /// TransactTime (60).
    pub const TRANSACT_TIME: u32 = 60;
    /// SettlDate (64).
    pub const SETTL_DATE: u32 = 64;
    /// ExecType (150).
    pub const EXEC_TYPE: u32 = 150;
    /// LeavesQty (151).
    pub const LEAVES_QTY: u32 = 151;
}

/// A typed FIX field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// String value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Single-character value.
    Char(char),
    /// Decimal value.
    Decimal(Decimal),
    /// Timestamp value.
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Renders the value the way it would appear on the wire.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Timestamp(t) => t.format("%Y%m%d-%H:%M:%S%.3f").to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Tag-addressed FIX message with separate header and body fields.
///
/// # Invariants
///
/// - MsgType (35) is always present in the header
/// - Fields iterate in ascending tag order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixMessage {
    header: BTreeMap<u32, FieldValue>,
    body: BTreeMap<u32, FieldValue>,
}

impl FixMessage {
    /// Creates a message with the given MsgType (35).
    #[must_use]
    pub fn new(msg_type: &str) -> Self {
        let mut header = BTreeMap::new();
        header.insert(tags::MSG_TYPE, FieldValue::Str(msg_type.to_string()));
        Self {
            header,
            body: BTreeMap::new(),
        }
    }

    /// Returns the MsgType (35) value.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        match self.header.get(&tags::MSG_TYPE) {
            Some(FieldValue::Str(s)) => s.as_str(),
            _ => "",
        }
    }

    // ========================================================================
    // Body accessors
    // ========================================================================

    /// Returns true if the body has a value for the tag.
    #[must_use]
    pub fn is_set(&self, tag: u32) -> bool {
        self.body.contains_key(&tag)
    }

    /// Returns the raw field value for a body tag.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<&FieldValue> {
        self.body.get(&tag)
    }

    /// Returns a body string field.
    #[must_use]
    pub fn get_str(&self, tag: u32) -> Option<&str> {
        match self.body.get(&tag) {
            Some(FieldValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns a body integer field.
    #[must_use]
    pub fn get_int(&self, tag: u32) -> Option<i64> {
        match self.body.get(&tag) {
            Some(FieldValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Returns a body character field.
    #[must_use]
    pub fn get_char(&self, tag: u32) -> Option<char> {
        match self.body.get(&tag) {
            Some(FieldValue::Char(c)) => Some(*c),
            _ => None,
        }
    }

    /// Returns a body decimal field.
    #[must_use]
    pub fn get_decimal(&self, tag: u32) -> Option<Decimal> {
        match self.body.get(&tag) {
            Some(FieldValue::Decimal(d)) => Some(*d),
            _ => None,
        }
    }

    /// Returns a body timestamp field.
    #[must_use]
    pub fn get_timestamp(&self, tag: u32) -> Option<NaiveDateTime> {
        match self.body.get(&tag) {
            Some(FieldValue::Timestamp(t)) => Some(*t),
            _ => None,
        }
    }

    /// Sets a raw body field value.
    pub fn set(&mut self, tag: u32, value: FieldValue) {
        self.body.insert(tag, value);
    }

    /// Sets a body string field.
    pub fn set_str(&mut self, tag: u32, value: impl Into<String>) {
        self.body.insert(tag, FieldValue::Str(value.into()));
    }

    /// Sets a body integer field.
    pub fn set_int(&mut self, tag: u32, value: i64) {
        self.body.insert(tag, FieldValue::Int(value));
    }

    /// Sets a body character field.
    pub fn set_char(&mut self, tag: u32, value: char) {
        self.body.insert(tag, FieldValue::Char(value));
    }

    /// Sets a body decimal field.
    pub fn set_decimal(&mut self, tag: u32, value: Decimal) {
        self.body.insert(tag, FieldValue::Decimal(value));
    }

    /// Sets a body timestamp field.
    pub fn set_timestamp(&mut self, tag: u32, value: NaiveDateTime) {
        self.body.insert(tag, FieldValue::Timestamp(value));
    }

    /// Removes a body field, returning its previous value.
    pub fn remove(&mut self, tag: u32) -> Option<FieldValue> {
        self.body.remove(&tag)
    }

    /// Iterates body fields in ascending tag order.
    pub fn fields(&self) -> impl Iterator<Item = (u32, &FieldValue)> {
        self.body.iter().map(|(tag, value)| (*tag, value))
    }

    // ========================================================================
    // Header accessors
    // ========================================================================

    /// Returns true if the header has a value for the tag.
    #[must_use]
    pub fn is_header_set(&self, tag: u32) -> bool {
        self.header.contains_key(&tag)
    }

    /// Returns a header string field.
    #[must_use]
    pub fn get_header_str(&self, tag: u32) -> Option<&str> {
        match self.header.get(&tag) {
            Some(FieldValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Sets a header string field.
    pub fn set_header_str(&mut self, tag: u32, value: impl Into<String>) {
        self.header.insert(tag, FieldValue::Str(value.into()));
    }

    /// Returns the SenderCompID (49), if set.
    #[must_use]
    pub fn sender_comp_id(&self) -> Option<&str> {
        self.get_header_str(tags::SENDER_COMP_ID)
    }

    /// Returns the TargetCompID (56), if set.
    #[must_use]
    pub fn target_comp_id(&self) -> Option<&str> {
        self.get_header_str(tags::TARGET_COMP_ID)
    }

    /// Sets the SenderCompID (49).
    pub fn set_sender_comp_id(&mut self, value: impl Into<String>) {
        self.set_header_str(tags::SENDER_COMP_ID, value);
    }

    /// Sets the TargetCompID (56).
    pub fn set_target_comp_id(&mut self, value: impl Into<String>) {
        self.set_header_str(tags::TARGET_COMP_ID, value);
    }
}

impl fmt::Display for FixMessage {
    /// Pipe-delimited `tag=value` rendering, header fields first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (tag, value) in self.header.iter().chain(self.body.iter()) {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}={}", tag, value.render())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    mod typed_fields {
        use super::*;

        #[test]
        fn string_round_trip() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_str(tags::SYMBOL, "AAPL");
            assert_eq!(msg.get_str(tags::SYMBOL), Some("AAPL"));
            assert!(msg.is_set(tags::SYMBOL));
            assert!(!msg.is_set(tags::PRICE));
        }

        #[test]
        fn int_round_trip() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_int(tags::ORDER_QTY, 500);
            assert_eq!(msg.get_int(tags::ORDER_QTY), Some(500));
        }

        #[test]
        fn char_round_trip() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_char(tags::SIDE, '1');
            assert_eq!(msg.get_char(tags::SIDE), Some('1'));
        }

        #[test]
        fn decimal_round_trip() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_decimal(tags::PRICE, dec!(150.25));
            assert_eq!(msg.get_decimal(tags::PRICE), Some(dec!(150.25)));
        }

        #[test]
        fn timestamp_round_trip() {
            let ts = NaiveDate::from_ymd_opt(2026, 8, 3)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap();
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_timestamp(tags::TRANSACT_TIME, ts);
            assert_eq!(msg.get_timestamp(tags::TRANSACT_TIME), Some(ts));
        }

        #[test]
        fn typed_getter_rejects_wrong_variant() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_str(tags::PRICE, "not-a-decimal");
            assert_eq!(msg.get_decimal(tags::PRICE), None);
            assert_eq!(msg.get_str(tags::PRICE), Some("not-a-decimal"));
        }

        #[test]
        fn remove_clears_field() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_str(tags::TEXT, "hello");
            assert!(msg.remove(tags::TEXT).is_some());
            assert!(!msg.is_set(tags::TEXT));
            assert!(msg.remove(tags::TEXT).is_none());
        }
    }

    mod header {
        use super::*;

        #[test]
        fn msg_type_always_present() {
            let msg = FixMessage::new(msg_type::EXECUTION_REPORT);
            assert_eq!(msg.msg_type(), "8");
            assert!(msg.is_header_set(tags::MSG_TYPE));
        }

        #[test]
        fn comp_ids_round_trip() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_sender_comp_id("CLIENT");
            msg.set_target_comp_id("VENUE");
            assert_eq!(msg.sender_comp_id(), Some("CLIENT"));
            assert_eq!(msg.target_comp_id(), Some("VENUE"));
        }

        #[test]
        fn header_and_body_are_separate() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_sender_comp_id("CLIENT");
            assert!(!msg.is_set(tags::SENDER_COMP_ID));
            assert!(msg.is_header_set(tags::SENDER_COMP_ID));
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn display_orders_by_tag() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_str(tags::SYMBOL, "AAPL");
            msg.set_char(tags::SIDE, '1');
            msg.set_str(tags::CL_ORD_ID, "ORD-1");
            assert_eq!(msg.to_string(), "35=D|11=ORD-1|54=1|55=AAPL");
        }

        #[test]
        fn timestamp_renders_fix_format() {
            let ts = NaiveDate::from_ymd_opt(2026, 8, 3)
                .unwrap()
                .and_hms_opt(14, 30, 5)
                .unwrap();
            assert_eq!(
                FieldValue::Timestamp(ts).render(),
                "20260803-14:30:05.000"
            );
        }

        #[test]
        fn fields_iterate_in_tag_order() {
            let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
            msg.set_str(tags::SYMBOL, "AAPL");
            msg.set_str(tags::CL_ORD_ID, "ORD-1");
            let tags_seen: Vec<u32> = msg.fields().map(|(tag, _)| tag).collect();
            assert_eq!(tags_seen, vec![tags::CL_ORD_ID, tags::SYMBOL]);
        }
    }
}
