// 1.0: all the primitives live here. money, percentages, trade modes, timestamps.
// money is a newtype per currency so the compiler catches CNY/USD mixups.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

// precision of every terminal CNY/USD amount
pub const MONEY_DP: u32 = 2;

// 1.1: half-away-from-zero rounding at a fixed number of decimals.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_money(value: Decimal) -> Decimal {
    round_to(value, MONEY_DP)
}

// negative contributions count as nothing
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

// zero or negative divisor degrades to zero instead of panicking
pub fn safe_div(numerator: Decimal, divisor: Decimal) -> Decimal {
    if divisor <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(divisor).unwrap_or(Decimal::ZERO)
}

// overflow degrades to zero like any other unusable input
pub fn mul_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::ZERO)
}

pub fn add_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::ZERO)
}

/// Converts a caller-side float into a decimal. NaN and infinities become zero.
pub fn decimal_or_zero(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

// 1.2: renminbi amount. never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cny(Decimal);

impl Cny {
    pub fn new(value: Decimal) -> Self {
        Self(non_negative(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn mul(&self, factor: Decimal) -> Self {
        Self::new(mul_or_zero(self.0, factor))
    }

    // straight division by CNY-per-USD, rounded to cents
    pub fn to_usd(&self, exchange_rate: Decimal) -> Usd {
        Usd::new(round_money(safe_div(self.0, exchange_rate)))
    }
}

impl Add for Cny {
    type Output = Cny;

    fn add(self, other: Cny) -> Cny {
        Cny(add_or_zero(self.0, other.0))
    }
}

impl fmt::Display for Cny {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "¥{}", self.0)
    }
}

// 1.3: US dollar amount. never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Usd(Decimal);

impl Usd {
    pub fn new(value: Decimal) -> Self {
        Self(non_negative(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    // total -> per unit. quantity 0 is treated as 1
    pub fn per_unit(&self, quantity: u32) -> Self {
        let qty = Decimal::from(quantity.max(1));
        Self(round_money(self.0 / qty))
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

// 1.4: percentage of a base price. "15" means 15%. may exceed 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Percent(Decimal);

impl Percent {
    pub fn new(value: Decimal) -> Self {
        Self(non_negative(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    // 15% -> 0.15
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// 1.5: where the goods leave from. decides the default trucking fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipFrom {
    // consolidator in the yiwu market, trucked to port
    #[default]
    Yiwu,
    // supplier ships straight to port
    Factory,
}

// 1.6: export model. market purchase is customs supervision code 1039.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TradeMode {
    #[default]
    #[serde(rename = "1039")]
    MarketPurchase,
    #[serde(rename = "general")]
    General,
}

impl TradeMode {
    pub fn code(&self) -> &'static str {
        match self {
            TradeMode::MarketPurchase => "1039",
            TradeMode::General => "general",
        }
    }
}

impl fmt::Display for TradeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// 1.7: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn to_rfc3339(&self) -> Option<String> {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.0).map(|dt| dt.to_rfc3339())
    }
}
