// 7.0 config.rs: every override-able knob in one place. fees, trucking, divisor, rates.
// built once at startup and passed by reference; the math never reads the environment.

use crate::dimensions::AIR_DIVISOR;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_AGENT_FEE: &str = "AGENT_FEE";
pub const ENV_TRUCKING_YIWU: &str = "TRUCKING_YIWU";
pub const ENV_VOLUMETRIC_DIVISOR: &str = "VOLUMETRIC_DIVISOR";
pub const ENV_SETTLEMENT_FACTOR: &str = "SETTLEMENT_FACTOR";
pub const ENV_DEFAULT_EXCHANGE_RATE: &str = "DEFAULT_EXCHANGE_RATE";
pub const ENV_DEFAULT_PROFIT_MARGIN: &str = "DEFAULT_PROFIT_MARGIN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    // Trade agent fee per order in CNY (1039 mode)
    pub agent_fee: Decimal,
    // Trucking from the yiwu market to port in CNY
    pub trucking_yiwu: Decimal,
    // Volumetric divisor when the quote names none (6000 air, 5000 sea)
    pub volumetric_divisor: Decimal,
    // Value retained after remittance loss, in (0, 1]
    pub settlement_factor: Decimal,
    // CNY per USD
    pub default_exchange_rate: Decimal,
    // Profit margin percent when the seller leaves it blank
    pub default_profit_margin: Decimal,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            agent_fee: dec!(80),
            trucking_yiwu: dec!(120),
            volumetric_divisor: AIR_DIVISOR,
            settlement_factor: dec!(0.998),
            default_exchange_rate: dec!(7.25),
            default_profit_margin: dec!(15),
        }
    }
}

impl QuoteConfig {
    /// Preset for sellers with their own export rights: no agent, no remittance loss.
    pub fn general_trade() -> Self {
        Self {
            agent_fee: Decimal::ZERO,
            settlement_factor: Decimal::ONE,
            ..Self::default()
        }
    }

    /// Defaults overridden by whatever `lookup` returns for the `ENV_*` keys.
    /// Unparsable values keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let fields: [(&str, &mut Decimal); 6] = [
            (ENV_AGENT_FEE, &mut config.agent_fee),
            (ENV_TRUCKING_YIWU, &mut config.trucking_yiwu),
            (ENV_VOLUMETRIC_DIVISOR, &mut config.volumetric_divisor),
            (ENV_SETTLEMENT_FACTOR, &mut config.settlement_factor),
            (ENV_DEFAULT_EXCHANGE_RATE, &mut config.default_exchange_rate),
            (ENV_DEFAULT_PROFIT_MARGIN, &mut config.default_profit_margin),
        ];

        for (key, slot) in fields {
            let Some(raw) = lookup(key) else {
                continue;
            };
            match Decimal::from_str(raw.trim()) {
                Ok(value) => {
                    tracing::debug!(key, %value, "config override");
                    *slot = value;
                }
                Err(e) => {
                    tracing::warn!(key, raw = %raw, error = %e, "ignoring unparsable config value");
                }
            }
        }
        config
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_fee < Decimal::ZERO {
            return Err(ConfigError::NegativeFee {
                name: "agent_fee",
                value: self.agent_fee,
            });
        }
        if self.trucking_yiwu < Decimal::ZERO {
            return Err(ConfigError::NegativeFee {
                name: "trucking_yiwu",
                value: self.trucking_yiwu,
            });
        }
        if self.volumetric_divisor <= Decimal::ZERO {
            return Err(ConfigError::InvalidDivisor(self.volumetric_divisor));
        }
        if !settlement_factor_in_range(self.settlement_factor) {
            return Err(ConfigError::SettlementFactorOutOfRange(self.settlement_factor));
        }
        if self.default_exchange_rate <= Decimal::ZERO {
            return Err(ConfigError::InvalidExchangeRate(self.default_exchange_rate));
        }
        if self.default_profit_margin < Decimal::ZERO {
            return Err(ConfigError::NegativeMargin(self.default_profit_margin));
        }
        Ok(())
    }
}

// (0, 1]
pub fn settlement_factor_in_range(factor: Decimal) -> bool {
    factor > Decimal::ZERO && factor <= Decimal::ONE
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must not be negative, got {value}")]
    NegativeFee { name: &'static str, value: Decimal },

    #[error("Volumetric divisor must be positive, got {0}")]
    InvalidDivisor(Decimal),

    #[error("Settlement factor must be in (0, 1], got {0}")]
    SettlementFactorOutOfRange(Decimal),

    #[error("Exchange rate must be positive, got {0}")]
    InvalidExchangeRate(Decimal),

    #[error("Profit margin must not be negative, got {0}")]
    NegativeMargin(Decimal),
}
