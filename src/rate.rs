// 9.0: exchange-rate feed decoding and rate locking.
// the HTTP fetch belongs to the caller; this only decodes the payload it got back.

use crate::types::{round_to, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const RATE_DP: u32 = 4;
pub const TARGET_CURRENCY: &str = "CNY";

// Frankfurter shape: {"amount":1.0,"base":"USD","date":"2024-05-10","rates":{"CNY":7.2231}}
#[derive(Debug, Deserialize)]
struct FeedPayload {
    #[serde(default)]
    rates: HashMap<String, Decimal>,
    date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRate {
    pub rate: Decimal,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateFeedError {
    #[error("Malformed rate payload: {0}")]
    Malformed(String),

    #[error("Rate payload has no {0} entry")]
    MissingRate(&'static str),

    #[error("Invalid rate {0}")]
    InvalidRate(Decimal),
}

pub fn decode_feed(json: &str) -> Result<FeedRate, RateFeedError> {
    let payload: FeedPayload =
        serde_json::from_str(json).map_err(|e| RateFeedError::Malformed(e.to_string()))?;

    let rate = payload
        .rates
        .get(TARGET_CURRENCY)
        .copied()
        .ok_or(RateFeedError::MissingRate(TARGET_CURRENCY))?;

    if rate <= Decimal::ZERO {
        tracing::warn!(%rate, "rejecting non-positive feed rate");
        return Err(RateFeedError::InvalidRate(rate));
    }

    let rate = round_to(rate, RATE_DP);
    tracing::debug!(%rate, date = ?payload.date, "decoded exchange rate");
    Ok(FeedRate {
        rate,
        date: payload.date,
    })
}

/// A rate anchored on the quote page so settlement is protected from drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedRate {
    pub rate: Decimal,
    pub locked_at: Timestamp,
}

impl LockedRate {
    pub fn new(rate: Decimal, locked_at: Timestamp) -> Self {
        Self { rate, locked_at }
    }

    // relative drift of a live rate against the locked one, 0.01 = 1%
    pub fn drift(&self, live_rate: Decimal) -> Decimal {
        if self.rate.is_zero() {
            return Decimal::ZERO;
        }
        match live_rate.checked_sub(self.rate) {
            Some(diff) => diff.abs().checked_div(self.rate).unwrap_or(Decimal::ZERO),
            None => Decimal::ZERO,
        }
    }

    pub fn drifted_beyond(&self, live_rate: Decimal, tolerance: Decimal) -> bool {
        self.drift(live_rate) > tolerance
    }
}

// default drift tolerance before a seller should re-quote
pub const DEFAULT_DRIFT_TOLERANCE: Decimal = dec!(0.01);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decodes_and_rounds_rate() {
        let json = r#"{"amount":1.0,"base":"USD","date":"2024-05-10","rates":{"CNY":7.22318}}"#;
        let feed = decode_feed(json).unwrap();
        assert_eq!(feed.rate, dec!(7.2232));
        assert_eq!(feed.date.as_deref(), Some("2024-05-10"));
    }

    #[test]
    fn missing_currency_is_an_error() {
        let json = r#"{"date":"2024-05-10","rates":{"EUR":0.92}}"#;
        assert_eq!(decode_feed(json), Err(RateFeedError::MissingRate("CNY")));
        assert_eq!(decode_feed(r#"{}"#), Err(RateFeedError::MissingRate("CNY")));
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        let json = r#"{"rates":{"CNY":0}}"#;
        assert!(matches!(decode_feed(json), Err(RateFeedError::InvalidRate(_))));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(decode_feed("not json"), Err(RateFeedError::Malformed(_))));
    }

    #[test]
    fn locked_rate_drift() {
        let locked = LockedRate::new(dec!(7.25), Timestamp::from_millis(0));
        assert_eq!(locked.drift(dec!(7.25)), Decimal::ZERO);
        assert!(!locked.drifted_beyond(dec!(7.30), DEFAULT_DRIFT_TOLERANCE));
        assert!(locked.drifted_beyond(dec!(7.00), DEFAULT_DRIFT_TOLERANCE));
    }

    #[test]
    fn extreme_live_rate_does_not_panic() {
        let locked = LockedRate::new(dec!(7.25), Timestamp::from_millis(0));
        assert_eq!(locked.drift(Decimal::MIN), Decimal::ZERO);
        assert!(locked.drift(Decimal::MAX) > DEFAULT_DRIFT_TOLERANCE);
    }
}
