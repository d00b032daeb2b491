//! # Domain Enums
//!
//! Closed enumerations shared across the harness.
//!
//! Every order-related enum carries its FIX character value so messages can
//! be built from, and compared against, the wire representation without
//! string juggling at call sites.
//!
//! # Examples
//!
//! ```
//! use synthex::domain::value_objects::{OrderSide, OrderType};
//!
//! assert_eq!(OrderSide::Buy.fix_value(), '1');
//! assert_eq!(OrderType::from_fix('2'), Some(OrderType::Limit));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from an unknown value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    /// The enum kind being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
    /// Short sell.
    ShortSell,
}

impl OrderSide {
    /// Returns the FIX tag 54 value.
    #[inline]
    #[must_use]
    pub const fn fix_value(self) -> char {
        match self {
            Self::Buy => '1',
            Self::Sell => '2',
            Self::ShortSell => '5',
        }
    }

    /// Resolves a FIX tag 54 value.
    #[must_use]
    pub const fn from_fix(value: char) -> Option<Self> {
        match value {
            '1' => Some(Self::Buy),
            '2' => Some(Self::Sell),
            '5' => Some(Self::ShortSell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::ShortSell => write!(f, "SHORT_SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "SHORT_SELL" => Ok(Self::ShortSell),
            other => Err(ParseEnumError::new("OrderSide", other)),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order.
    Market,
    /// Limit order. Requires a price.
    Limit,
    /// Stop order. Requires a price.
    Stop,
    /// Stop-limit order. Requires a price.
    StopLimit,
}

impl OrderType {
    /// Returns the FIX tag 40 value.
    #[inline]
    #[must_use]
    pub const fn fix_value(self) -> char {
        match self {
            Self::Market => '1',
            Self::Limit => '2',
            Self::Stop => '3',
            Self::StopLimit => '4',
        }
    }

    /// Resolves a FIX tag 40 value.
    #[must_use]
    pub const fn from_fix(value: char) -> Option<Self> {
        match value {
            '1' => Some(Self::Market),
            '2' => Some(Self::Limit),
            '3' => Some(Self::Stop),
            '4' => Some(Self::StopLimit),
            _ => None,
        }
    }

    /// Returns true if this order type requires a price at build time.
    #[inline]
    #[must_use]
    pub const fn requires_price(self) -> bool {
        matches!(self, Self::Limit | Self::Stop | Self::StopLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Stop => write!(f, "STOP"),
            Self::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MARKET" => Ok(Self::Market),
            "LIMIT" => Ok(Self::Limit),
            "STOP" => Ok(Self::Stop),
            "STOP_LIMIT" => Ok(Self::StopLimit),
            other => Err(ParseEnumError::new("OrderType", other)),
        }
    }
}

/// Time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Day order.
    Day,
    /// Good till cancel.
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
    /// Good till date.
    Gtd,
    /// At the close.
    AtClose,
}

impl TimeInForce {
    /// Returns the FIX tag 59 value.
    #[inline]
    #[must_use]
    pub const fn fix_value(self) -> char {
        match self {
            Self::Day => '0',
            Self::Gtc => '1',
            Self::Ioc => '3',
            Self::Fok => '4',
            Self::Gtd => '6',
            Self::AtClose => '7',
        }
    }

    /// Resolves a FIX tag 59 value.
    #[must_use]
    pub const fn from_fix(value: char) -> Option<Self> {
        match value {
            '0' => Some(Self::Day),
            '1' => Some(Self::Gtc),
            '3' => Some(Self::Ioc),
            '4' => Some(Self::Fok),
            '6' => Some(Self::Gtd),
            '7' => Some(Self::AtClose),
            _ => None,
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "DAY"),
            Self::Gtc => write!(f, "GTC"),
            Self::Ioc => write!(f, "IOC"),
            Self::Fok => write!(f, "FOK"),
            Self::Gtd => write!(f, "GTD"),
            Self::AtClose => write!(f, "AT_CLOSE"),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAY" => Ok(Self::Day),
            "GTC" => Ok(Self::Gtc),
            "IOC" => Ok(Self::Ioc),
            "FOK" => Ok(Self::Fok),
            "GTD" => Ok(Self::Gtd),
            "AT_CLOSE" => Ok(Self::AtClose),
            other => Err(ParseEnumError::new("TimeInForce", other)),
        }
    }
}

/// Execution type reported on an execution report (FIX tag 150).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecType {
    /// Order accepted.
    New,
    /// Partially filled.
    PartialFill,
    /// Fully filled.
    Fill,
    /// Canceled.
    Canceled,
    /// Replaced.
    Replaced,
    /// Cancel pending.
    PendingCancel,
    /// Rejected.
    Rejected,
}

impl ExecType {
    /// Returns the FIX tag 150 value.
    #[inline]
    #[must_use]
    pub const fn fix_value(self) -> char {
        match self {
            Self::New => '0',
            Self::PartialFill => '1',
            Self::Fill => '2',
            Self::Canceled => '4',
            Self::Replaced => '5',
            Self::PendingCancel => '6',
            Self::Rejected => '8',
        }
    }

    /// Resolves a FIX tag 150 value.
    #[must_use]
    pub const fn from_fix(value: char) -> Option<Self> {
        match value {
            '0' => Some(Self::New),
            '1' => Some(Self::PartialFill),
            '2' => Some(Self::Fill),
            '4' => Some(Self::Canceled),
            '5' => Some(Self::Replaced),
            '6' => Some(Self::PendingCancel),
            '8' => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ExecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::PartialFill => write!(f, "PARTIAL_FILL"),
            Self::Fill => write!(f, "FILL"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Replaced => write!(f, "REPLACED"),
            Self::PendingCancel => write!(f, "PENDING_CANCEL"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl FromStr for ExecType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PARTIAL_FILL" => Ok(Self::PartialFill),
            "FILL" => Ok(Self::Fill),
            "CANCELED" => Ok(Self::Canceled),
            "REPLACED" => Ok(Self::Replaced),
            "PENDING_CANCEL" => Ok(Self::PendingCancel),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ParseEnumError::new("ExecType", other)),
        }
    }
}

/// Source channel a trade record was observed on.
///
/// The reconciliation output order depends on this enum being closed:
/// FIX, then MQ, then API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordSource {
    /// Order-protocol channel.
    Fix,
    /// Messaging-bus channel.
    Mq,
    /// Query-API channel.
    Api,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fix => write!(f, "FIX"),
            Self::Mq => write!(f, "MQ"),
            Self::Api => write!(f, "API"),
        }
    }
}

/// Settlement cycle for trade date generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementCycle {
    /// Same-day settlement.
    T0,
    /// Next business day.
    T1,
    /// Two business days.
    T2,
}

impl SettlementCycle {
    /// Returns the number of business days to settlement.
    #[inline]
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::T0 => 0,
            Self::T1 => 1,
            Self::T2 => 2,
        }
    }
}

impl fmt::Display for SettlementCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::T0 => write!(f, "T0"),
            Self::T1 => write!(f, "T1"),
            Self::T2 => write!(f, "T2"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod fix_values {
        use super::*;

        #[test]
        fn side_round_trips() {
            for side in [OrderSide::Buy, OrderSide::Sell, OrderSide::ShortSell] {
                assert_eq!(OrderSide::from_fix(side.fix_value()), Some(side));
            }
            assert_eq!(OrderSide::from_fix('X'), None);
        }

        #[test]
        fn order_type_round_trips() {
            for ot in [
                OrderType::Market,
                OrderType::Limit,
                OrderType::Stop,
                OrderType::StopLimit,
            ] {
                assert_eq!(OrderType::from_fix(ot.fix_value()), Some(ot));
            }
        }

        #[test]
        fn time_in_force_round_trips() {
            for tif in [
                TimeInForce::Day,
                TimeInForce::Gtc,
                TimeInForce::Ioc,
                TimeInForce::Fok,
                TimeInForce::Gtd,
                TimeInForce::AtClose,
            ] {
                assert_eq!(TimeInForce::from_fix(tif.fix_value()), Some(tif));
            }
        }

        #[test]
        fn exec_type_round_trips() {
            for et in [
                ExecType::New,
                ExecType::PartialFill,
                ExecType::Fill,
                ExecType::Canceled,
                ExecType::Replaced,
                ExecType::PendingCancel,
                ExecType::Rejected,
            ] {
                assert_eq!(ExecType::from_fix(et.fix_value()), Some(et));
            }
        }

        #[test]
        fn rejected_is_fix_eight() {
            assert_eq!(ExecType::Rejected.fix_value(), '8');
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn side_from_str() {
            assert_eq!("BUY".parse::<OrderSide>().unwrap(), OrderSide::Buy);
            assert_eq!(
                "SHORT_SELL".parse::<OrderSide>().unwrap(),
                OrderSide::ShortSell
            );
            assert!("LONG".parse::<OrderSide>().is_err());
        }

        #[test]
        fn requires_price() {
            assert!(!OrderType::Market.requires_price());
            assert!(OrderType::Limit.requires_price());
            assert!(OrderType::Stop.requires_price());
            assert!(OrderType::StopLimit.requires_price());
        }

        #[test]
        fn parse_error_names_kind_and_value() {
            let err = "MOC".parse::<TimeInForce>().unwrap_err();
            assert_eq!(err.to_string(), "unknown TimeInForce value: MOC");
        }
    }

    mod display {
        use super::*;

        #[test]
        fn source_display() {
            assert_eq!(RecordSource::Fix.to_string(), "FIX");
            assert_eq!(RecordSource::Mq.to_string(), "MQ");
            assert_eq!(RecordSource::Api.to_string(), "API");
        }

        #[test]
        fn settlement_cycle_days() {
            assert_eq!(SettlementCycle::T0.days(), 0);
            assert_eq!(SettlementCycle::T1.days(), 1);
            assert_eq!(SettlementCycle::T2.days(), 2);
        }
    }

    mod serde_round_trip {
        use super::*;

        #[test]
        fn side_serializes_screaming_snake() {
            let json = serde_json::to_string(&OrderSide::ShortSell).unwrap();
            assert_eq!(json, "\"SHORT_SELL\"");
            let side: OrderSide = serde_json::from_str(&json).unwrap();
            assert_eq!(side, OrderSide::ShortSell);
        }

        #[test]
        fn exec_type_deserializes() {
            let et: ExecType = serde_json::from_str("\"REJECTED\"").unwrap();
            assert_eq!(et, ExecType::Rejected);
        }
    }
}
