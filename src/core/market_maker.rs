//! # Market Maker
//!
//! Generates realistic financial test data using statistical distributions.
//!
//! All methods are thread-safe: pseudo-random state is taken from the
//! calling thread's generator, so concurrent test threads never contend.
//!
//! # Examples
//!
//! ```
//! use synthex::core::{BusinessCalendar, MarketMaker};
//! use synthex::domain::value_objects::SettlementCycle;
//!
//! let mm = MarketMaker::new(BusinessCalendar::nyse());
//!
//! let price = mm.price(150.0, 2.5).unwrap();
//! assert!(price > rust_decimal::Decimal::ZERO);
//!
//! let volume = mm.volume(500.0).unwrap();
//! assert!(volume >= 1);
//! ```

use crate::core::calendar::BusinessCalendar;
use crate::domain::errors::{HarnessError, HarnessResult};
use crate::domain::value_objects::SettlementCycle;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::Rng;
use rand::distributions::Distribution;
use rust_decimal::{Decimal, RoundingStrategy};
use statrs::distribution::{Normal, Poisson};
use std::cell::RefCell;
use tracing::debug;

/// Significant figures applied to every generated price.
const PRICE_SIGNIFICANT_FIGURES: u32 = 10;

/// Seconds in the 09:30-16:00 trading window.
const MARKET_WINDOW_SECONDS: i64 = (6 * 3600) + 1800;

thread_local! {
    // Last request key minted on this thread, used to guarantee that two
    // consecutive calls never return the same key.
    static LAST_REQUEST_KEY: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Statistical test-data generator backed by a business calendar.
#[derive(Debug, Clone)]
pub struct MarketMaker {
    calendar: BusinessCalendar,
    key_prefix: String,
}

impl MarketMaker {
    /// Creates a market maker using the given calendar.
    #[must_use]
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self {
            calendar,
            key_prefix: "SYNTHEX".to_string(),
        }
    }

    /// Sets the prefix used by [`MarketMaker::new_request_key`].
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Returns the configured calendar.
    #[inline]
    #[must_use]
    pub const fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Generates a price from a Normal (Gaussian) distribution.
    ///
    /// The sample's absolute value is taken and the result rounded to 10
    /// significant figures with banker's rounding. A zero standard
    /// deviation collapses to `|mean|` exactly.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` if `std_dev` is negative or
    /// either argument is not finite.
    pub fn price(&self, mean: f64, std_dev: f64) -> HarnessResult<Decimal> {
        if std_dev < 0.0 || !std_dev.is_finite() || !mean.is_finite() {
            return Err(HarnessError::InvalidParameter(format!(
                "standard deviation must be finite and non-negative, got mean={}, std_dev={}",
                mean, std_dev
            )));
        }

        let sample = if std_dev == 0.0 {
            mean
        } else {
            let distribution = Normal::new(mean, std_dev).map_err(|e| {
                HarnessError::InvalidParameter(format!("invalid normal distribution: {}", e))
            })?;
            distribution.sample(&mut rand::thread_rng())
        };

        let price = round_price(sample.abs());
        debug!(%price, mean, std_dev, "Generated price");
        Ok(price)
    }

    /// Generates a trade volume from a Poisson distribution, clamped to >= 1.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` if `lambda` is not positive.
    pub fn volume(&self, lambda: f64) -> HarnessResult<u64> {
        if lambda <= 0.0 || !lambda.is_finite() {
            return Err(HarnessError::InvalidParameter(format!(
                "lambda must be positive, got {}",
                lambda
            )));
        }
        let distribution = Poisson::new(lambda).map_err(|e| {
            HarnessError::InvalidParameter(format!("invalid poisson distribution: {}", e))
        })?;
        let sample = distribution.sample(&mut rand::thread_rng());
        let volume = (sample as u64).max(1);
        debug!(volume, lambda, "Generated volume");
        Ok(volume)
    }

    /// Generates a series of serially correlated prices.
    ///
    /// The first latent sample is N(0,1); each subsequent one is
    /// `Z[i] = rho * Z[i-1] + sqrt(1 - rho^2) * eps[i]` with iid standard
    /// normal `eps`. Prices are `|mean + std_dev * Z[i]|`, rounded like
    /// [`MarketMaker::price`].
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidParameter` if `correlation` is outside
    /// `[-1, 1]` or `count` is zero.
    pub fn correlated_prices(
        &self,
        mean: f64,
        std_dev: f64,
        correlation: f64,
        count: usize,
    ) -> HarnessResult<Vec<Decimal>> {
        if !(-1.0..=1.0).contains(&correlation) {
            return Err(HarnessError::InvalidParameter(format!(
                "correlation must be between -1 and 1, got {}",
                correlation
            )));
        }
        if count == 0 {
            return Err(HarnessError::InvalidParameter(
                "count must be positive".to_string(),
            ));
        }

        let standard = Normal::new(0.0, 1.0)
            .map_err(|e| HarnessError::Internal(format!("standard normal: {}", e)))?;
        let mut rng = rand::thread_rng();
        let decay = (1.0 - correlation * correlation).sqrt();

        let mut prices = Vec::with_capacity(count);
        let mut previous = 0.0;
        for i in 0..count {
            let epsilon = standard.sample(&mut rng);
            let latent = if i == 0 {
                epsilon
            } else {
                correlation * previous + decay * epsilon
            };
            previous = latent;
            prices.push(round_price((mean + std_dev * latent).abs()));
        }

        debug!(
            count,
            mean, std_dev, correlation, "Generated correlated price series"
        );
        Ok(prices)
    }

    /// Generates a settlement date for the given cycle against the
    /// configured calendar, starting from today.
    #[must_use]
    pub fn settlement_date(&self, cycle: SettlementCycle) -> NaiveDate {
        let trade_date = Local::now().date_naive();
        let settlement = self.calendar.add_business_days(trade_date, cycle.days());
        debug!(%trade_date, %settlement, %cycle, "Generated settlement date");
        settlement
    }

    /// Generates a trade timestamp at a uniformly random second within
    /// today's 09:30-16:00 trading window.
    #[must_use]
    pub fn market_hours_timestamp(&self) -> NaiveDateTime {
        let today = Local::now().date_naive();
        let offset = rand::thread_rng().gen_range(0..MARKET_WINDOW_SECONDS);
        let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN);
        today.and_time(open) + Duration::seconds(offset)
    }

    /// Mints a request key in the form `{prefix}-{ms-since-epoch}-{4-digit}`.
    ///
    /// Two consecutive calls on the same thread always return distinct keys:
    /// on a collision with the previous key the random suffix is re-rolled.
    #[must_use]
    pub fn new_request_key(&self) -> String {
        LAST_REQUEST_KEY.with(|last| {
            let mut last = last.borrow_mut();
            loop {
                let key = format!(
                    "{}-{}-{:04}",
                    self.key_prefix,
                    Utc::now().timestamp_millis(),
                    rand::thread_rng().gen_range(0..10_000)
                );
                if last.as_deref() != Some(key.as_str()) {
                    *last = Some(key.clone());
                    return key;
                }
            }
        })
    }

    /// Generates a random account identifier like `{prefix}-{8 digits}`.
    #[must_use]
    pub fn account_id(&self, prefix: &str) -> String {
        format!(
            "{}-{:08}",
            prefix,
            rand::thread_rng().gen_range(0..100_000_000u64)
        )
    }
}

impl Default for MarketMaker {
    fn default() -> Self {
        Self::new(BusinessCalendar::default())
    }
}

/// Rounds a sampled price to the financial precision used everywhere in
/// the harness: 10 significant figures, banker's rounding.
fn round_price(value: f64) -> Decimal {
    let decimal = Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO);
    decimal
        .round_sf_with_strategy(
            PRICE_SIGNIFICANT_FIGURES,
            RoundingStrategy::MidpointNearestEven,
        )
        .unwrap_or(decimal)
        .normalize()
}
