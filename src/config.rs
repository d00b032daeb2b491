//! # Configuration
//!
//! Plain-value harness configuration.
//!
//! The engine has no global state: callers construct a [`HarnessConfig`]
//! (or individual sections) and pass it to the components they build.
//! All sections deserialize with defaults, so a configuration file only
//! needs the values it overrides.
//!
//! # Examples
//!
//! ```
//! use synthex::config::HarnessConfig;
//!
//! let config = HarnessConfig::default();
//! assert_eq!(config.ledger.precision, 8);
//! assert_eq!(config.fix.version().begin_string(), "FIX.4.4");
//! ```

use crate::core::BusinessCalendar;
use crate::protocol::fix::{FixVersion, SessionId, tags};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// FIX Configuration
// ============================================================================

/// FIX session and correlation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixConfig {
    /// Protocol version string ("FIX44" or "FIX.4.4" spellings accepted).
    #[serde(default = "default_fix_version")]
    pub version: String,

    /// SenderCompID of the initiator side.
    #[serde(default = "default_sender_comp_id")]
    pub sender_comp_id: String,

    /// TargetCompID of the initiator side (the synthetic venue).
    #[serde(default = "default_target_comp_id")]
    pub target_comp_id: String,

    /// Response deadline for correlated requests, in milliseconds.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Tags the interceptor copies from request to response.
    #[serde(default = "default_correlation_tags")]
    pub correlation_tags: Vec<u32>,
}

impl FixConfig {
    /// Resolves the configured protocol version.
    #[must_use]
    pub fn version(&self) -> FixVersion {
        FixVersion::resolve(&self.version)
    }

    /// Returns the response deadline as a duration.
    #[must_use]
    pub const fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Returns the initiator-side session identity.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        SessionId::new(self.sender_comp_id.clone(), self.target_comp_id.clone())
    }
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            version: default_fix_version(),
            sender_comp_id: default_sender_comp_id(),
            target_comp_id: default_target_comp_id(),
            response_timeout_ms: default_response_timeout_ms(),
            correlation_tags: default_correlation_tags(),
        }
    }
}

// ============================================================================
// Ledger Configuration
// ============================================================================

/// Reconciliation precision and tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Rounding precision in significant figures.
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Numeric comparison tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            tolerance: default_tolerance(),
        }
    }
}

// ============================================================================
// Market Data Configuration
// ============================================================================

/// Synthetic data generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Calendar preset name: NYSE, LSE, or TSE (anything else selects an
    /// empty weekends-only calendar under that name).
    #[serde(default = "default_calendar")]
    pub calendar: String,

    /// Prefix for minted request keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl MarketConfig {
    /// Builds the configured business calendar.
    #[must_use]
    pub fn business_calendar(&self) -> BusinessCalendar {
        match self.calendar.to_ascii_uppercase().as_str() {
            "NYSE" => BusinessCalendar::nyse(),
            "LSE" => BusinessCalendar::lse(),
            "TSE" => BusinessCalendar::tse(),
            other => BusinessCalendar::new(other),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            calendar: default_calendar(),
            key_prefix: default_key_prefix(),
        }
    }
}

// ============================================================================
// Scenario Configuration
// ============================================================================

/// Scenario translation preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Prefer LLM output when a provider is configured and reachable.
    #[serde(default)]
    pub prefer_llm: bool,

    /// Fall back to deterministic generation when the LLM fails.
    #[serde(default = "default_true")]
    pub fallback_to_deterministic: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            prefer_llm: false,
            fallback_to_deterministic: true,
        }
    }
}

// ============================================================================
// Harness Configuration
// ============================================================================

/// Top-level harness configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// FIX session and correlation settings.
    #[serde(default)]
    pub fix: FixConfig,

    /// Reconciliation settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Synthetic data settings.
    #[serde(default)]
    pub market: MarketConfig,

    /// Scenario translation settings.
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

fn default_fix_version() -> String {
    "FIX44".to_string()
}

fn default_sender_comp_id() -> String {
    "SYNTHEX_CLIENT".to_string()
}

fn default_target_comp_id() -> String {
    "SYNTHEX_VENUE".to_string()
}

const fn default_response_timeout_ms() -> u64 {
    30_000
}

fn default_correlation_tags() -> Vec<u32> {
    vec![tags::CL_ORD_ID]
}

const fn default_precision() -> u32 {
    8
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 4)
}

fn default_calendar() -> String {
    "NYSE".to_string()
}

fn default_key_prefix() -> String {
    "SYNTHEX".to_string()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.fix.version(), FixVersion::Fix44);
        assert_eq!(config.fix.response_timeout(), Duration::from_secs(30));
        assert_eq!(config.fix.correlation_tags, vec![tags::CL_ORD_ID]);
        assert_eq!(config.ledger.precision, 8);
        assert_eq!(config.ledger.tolerance, Decimal::new(1, 4));
        assert_eq!(config.market.calendar, "NYSE");
        assert!(!config.scenario.prefer_llm);
        assert!(config.scenario.fallback_to_deterministic);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{"ledger":{"precision":4}}"#).unwrap();
        assert_eq!(config.ledger.precision, 4);
        assert_eq!(config.ledger.tolerance, Decimal::new(1, 4));
        assert_eq!(config.fix.sender_comp_id, "SYNTHEX_CLIENT");
    }

    #[test]
    fn session_id_from_comp_ids() {
        let config = FixConfig::default();
        let session = config.session_id();
        assert_eq!(session.sender_comp_id(), "SYNTHEX_CLIENT");
        assert_eq!(session.target_comp_id(), "SYNTHEX_VENUE");
    }

    #[test]
    fn calendar_presets_resolve() {
        for (name, expected) in [("NYSE", "NYSE"), ("lse", "LSE"), ("tse", "TSE")] {
            let market = MarketConfig {
                calendar: name.to_string(),
                ..MarketConfig::default()
            };
            assert_eq!(market.business_calendar().name(), expected);
        }

        let custom = MarketConfig {
            calendar: "XETRA".to_string(),
            ..MarketConfig::default()
        };
        // Unknown names get an empty weekends-only calendar.
        assert_eq!(custom.business_calendar().name(), "XETRA");
    }
}
