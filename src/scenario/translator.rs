//! # Scenario Translator
//!
//! Translates free-form natural-language intent into a structured
//! [`OrderSpec`].
//!
//! Two modes:
//!
//! - **Deterministic**: keyword extraction with fixed precedence rules.
//!   Identical input always produces identical output; no I/O, no
//!   randomness. Suitable for CI.
//! - **LLM**: when a provider is configured and reachable, the intent is
//!   sent to the model and the JSON reply parsed; on any failure the
//!   deterministic path answers instead (unless fallback is disabled).
//!
//! # Examples
//!
//! ```
//! use synthex::scenario::ScenarioTranslator;
//! use synthex::domain::value_objects::{OrderSide, OrderType};
//!
//! let translator = ScenarioTranslator::new();
//! let order = translator
//!     .generate_deterministic("Sell 500 shares of AAPL limit at 180")
//!     .unwrap();
//!
//! assert_eq!(order.side(), OrderSide::Sell);
//! assert_eq!(order.order_type(), OrderType::Limit);
//! assert_eq!(order.symbol(), "AAPL");
//! assert_eq!(order.quantity(), 500);
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use crate::domain::value_objects::{
    ExecType, OrderSide, OrderSpec, OrderType, TimeInForce,
};
use crate::scenario::llm::LlmProvider;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// System prompt for LLM-backed generation.
const SYSTEM_PROMPT: &str = r#"You are a QA expert in the FIX protocol. Translate natural language
scenarios into structured JSON configurations for NewOrderSingle. Rules:
- If the user says 'Market On Close', set timeInForce to 'AT_CLOSE'.
- If the user says 'Limit', set orderType to 'LIMIT' and require a price.
- If the user says 'Market', set orderType to 'MARKET'.
- If the user says 'Rejection' or 'reject', set expectedExecType to 'REJECTED'.
- If the user says 'Buy', set side to 'BUY'. If 'Sell', set side to 'SELL'.
- Default currency is 'USD' unless specified.
- Default quantity is 100 unless specified.
Return ONLY valid JSON matching this structure:
{"symbol":"...","side":"BUY|SELL","orderType":"MARKET|LIMIT|STOP","price":null|number,
 "quantity":number,"timeInForce":"DAY|GTC|IOC|FOK|GTD|AT_CLOSE",
 "currency":"USD","expectedExecType":"NEW|FILL|REJECTED|null"}"#;

/// Ticker dictionary: lowercase alias to symbol.
const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("aapl", "AAPL"),
    ("apple", "AAPL"),
    ("goog", "GOOG"),
    ("google", "GOOG"),
    ("msft", "MSFT"),
    ("microsoft", "MSFT"),
    ("tsla", "TSLA"),
    ("tesla", "TSLA"),
    ("amzn", "AMZN"),
    ("amazon", "AMZN"),
];

/// Default quantity when the intent names none.
const DEFAULT_QUANTITY: u64 = 100;

/// Shape of the JSON the LLM is asked to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderDraft {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    price: Option<Decimal>,
    quantity: u64,
    #[serde(default)]
    time_in_force: Option<TimeInForce>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    expected_exec_type: Option<ExecType>,
}

/// NLP-to-order translation agent.
pub struct ScenarioTranslator {
    provider: Option<Arc<dyn LlmProvider>>,
    fallback_to_deterministic: bool,
    quantity_pattern: Regex,
    price_pattern: Regex,
}

impl ScenarioTranslator {
    /// Creates a deterministic-only translator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            fallback_to_deterministic: true,
            // The unwraps cannot fire: both patterns are literals.
            quantity_pattern: Regex::new(r"(\d+)\s*(?:shares?|units?|lots?)?")
                .unwrap_or_else(|_| unreachable!("static pattern")),
            price_pattern: Regex::new(r"(?:at|@|price)\s+(\d+\.?\d*)")
                .unwrap_or_else(|_| unreachable!("static pattern")),
        }
    }

    /// Attaches an LLM provider.
    ///
    /// With `fallback` set, any LLM failure falls back to deterministic
    /// generation; without it the failure propagates.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>, fallback: bool) -> Self {
        self.provider = Some(provider);
        self.fallback_to_deterministic = fallback;
        self
    }

    /// Generates an order specification, preferring the LLM when one is
    /// configured and available.
    ///
    /// # Errors
    ///
    /// Returns the LLM error when fallback is disabled; otherwise errors
    /// only if the deterministic path produced an invalid combination
    /// (which its defaults prevent).
    pub async fn generate(&self, intent: &str) -> HarnessResult<OrderSpec> {
        info!(intent, "Generating order spec from intent");

        if let Some(provider) = &self.provider {
            if provider.is_available().await {
                match self.generate_from_llm(provider.as_ref(), intent).await {
                    Ok(spec) => return Ok(spec),
                    Err(e) => {
                        warn!(error = %e, "LLM generation failed");
                        if !self.fallback_to_deterministic {
                            return Err(e);
                        }
                    }
                }
            } else {
                warn!(
                    provider = provider.provider_name(),
                    "LLM provider not available, using deterministic path"
                );
            }
        }

        self.generate_deterministic(intent)
    }

    /// Deterministic keyword-based generation.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` only if the extracted
    /// combination fails order validation; the extraction defaults make
    /// this unreachable for any input.
    pub fn generate_deterministic(&self, intent: &str) -> HarnessResult<OrderSpec> {
        let lower = intent.to_lowercase();

        let side = if lower.contains("sell") || lower.contains("short") {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        };

        let order_type = if lower.contains("limit") {
            OrderType::Limit
        } else if lower.contains("stop") {
            OrderType::Stop
        } else {
            OrderType::Market
        };

        let time_in_force = if lower.contains("close") || lower.contains("moc") {
            TimeInForce::AtClose
        } else if lower.contains("gtc") {
            TimeInForce::Gtc
        } else if lower.contains("ioc") || lower.contains("immediate") {
            TimeInForce::Ioc
        } else {
            TimeInForce::Day
        };

        let symbol = self.extract_symbol(&lower);
        let quantity = self.extract_quantity(&lower);

        let mut builder = OrderSpec::builder(symbol, side, order_type, quantity)
            .with_time_in_force(time_in_force)
            .with_currency("USD");

        // The price is only retained for priced order types.
        if order_type.requires_price() {
            builder = builder.with_price(self.extract_price(&lower));
        }

        if lower.contains("reject") || lower.contains("fat-finger") || lower.contains("fat finger")
        {
            builder = builder.with_expected_exec_type(ExecType::Rejected);
        } else if lower.contains("fill") {
            builder = builder.with_expected_exec_type(ExecType::Fill);
        }

        let spec = builder.build()?;
        info!(order = %spec, "Deterministic generation complete");
        Ok(spec)
    }

    async fn generate_from_llm(
        &self,
        provider: &dyn LlmProvider,
        intent: &str,
    ) -> HarnessResult<OrderSpec> {
        let response = provider.complete(SYSTEM_PROMPT, intent).await?;
        debug!(response, "LLM raw response");

        let json = extract_json(&response);
        let draft: OrderDraft = serde_json::from_str(json).map_err(|e| {
            HarnessError::InvalidParameter(format!("LLM response is not a valid order: {}", e))
        })?;

        let mut builder =
            OrderSpec::builder(draft.symbol, draft.side, draft.order_type, draft.quantity);
        if let Some(price) = draft.price {
            builder = builder.with_price(price);
        }
        if let Some(tif) = draft.time_in_force {
            builder = builder.with_time_in_force(tif);
        }
        if let Some(currency) = draft.currency {
            builder = builder.with_currency(currency);
        }
        if let Some(exec_type) = draft.expected_exec_type {
            builder = builder.with_expected_exec_type(exec_type);
        }

        let spec = builder.build()?;
        info!(order = %spec, provider = provider.provider_name(), "LLM generation complete");
        Ok(spec)
    }

    fn extract_symbol(&self, lower: &str) -> String {
        for (alias, symbol) in KNOWN_SYMBOLS {
            if lower.contains(alias) {
                return (*symbol).to_string();
            }
        }
        "UNKNOWN".to_string()
    }

    fn extract_quantity(&self, lower: &str) -> u64 {
        for captures in self.quantity_pattern.captures_iter(lower) {
            if let Some(quantity) = captures.get(1).and_then(|m| m.as_str().parse::<u64>().ok())
                && quantity > 0
                && quantity < 10_000_000
            {
                return quantity;
            }
        }
        DEFAULT_QUANTITY
    }

    fn extract_price(&self, lower: &str) -> Decimal {
        self.price_pattern
            .captures(lower)
            .and_then(|captures| captures.get(1))
            .and_then(|m| Decimal::from_str(m.as_str()).ok())
            .unwrap_or_else(|| Decimal::from(100))
    }
}

impl Default for ScenarioTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScenarioTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioTranslator")
            .field("has_provider", &self.provider.is_some())
            .field("fallback", &self.fallback_to_deterministic)
            .finish()
    }
}

/// Strips markdown code fences from an LLM reply.
fn extract_json(response: &str) -> &str {
    let mut cleaned = response.trim();
    if let Some(stripped) = cleaned.strip_prefix("```json") {
        cleaned = stripped;
    } else if let Some(stripped) = cleaned.strip_prefix("```") {
        cleaned = stripped;
    }
    if let Some(stripped) = cleaned.strip_suffix("```") {
        cleaned = stripped;
    }
    cleaned.trim()
}
