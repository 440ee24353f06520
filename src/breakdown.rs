//! Cost breakdown and FOB derivation.
//!
//! Two trade models:
//!
//! - General trade: `FOB = EXW / rate`. Seller exports on its own rights.
//! - Market purchase (1039): a trade agent charges a fee and settles the
//!   proceeds at a small remittance loss:
//!
//! ```text
//! profit   = EXW × margin / 100
//! total    = EXW + agent fee + domestic + profit
//! FOB_USD  = total / (rate × settlement factor)
//! ```
//!
//! The breakdown keeps every term so the seller can audit the ladder before
//! committing, and FOB must be re-derivable from those terms alone.

use crate::config::QuoteConfig;
use crate::domestic::get_domestic_cny;
use crate::types::{round_money, safe_div, Cny, Percent, ShipFrom, TradeMode, Usd};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-quote overrides. Anything left `None` falls back to the config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOptions {
    pub ship_from: ShipFrom,
    pub domestic_cny: Option<Decimal>,
    pub agent_fee: Option<Decimal>,
    pub settlement_factor: Option<Decimal>,
}

/// Fully resolved cost inputs. Nothing optional past this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCosts {
    pub agent_fee: Cny,
    pub domestic_cny: Cny,
    pub settlement_factor: Decimal,
}

impl CostOptions {
    pub fn resolve(&self, config: &QuoteConfig) -> ResolvedCosts {
        ResolvedCosts {
            agent_fee: Cny::new(self.agent_fee.unwrap_or(config.agent_fee)),
            domestic_cny: get_domestic_cny(self.ship_from, self.domestic_cny, config),
            settlement_factor: self.settlement_factor.unwrap_or(config.settlement_factor),
        }
    }
}

impl ResolvedCosts {
    // what general trade amounts to: no agent, no domestic leg, no loss
    pub fn none() -> Self {
        Self {
            agent_fee: Cny::zero(),
            domestic_cny: Cny::zero(),
            settlement_factor: Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub trade_mode: TradeMode,
    pub exw: Cny,
    pub agent_fee: Cny,
    pub domestic_cny: Cny,
    pub profit: Cny,
    pub total_cny: Cny,
    pub exchange_rate: Decimal,
    pub settlement_factor: Decimal,
    pub fob_usd: Usd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderLine {
    pub label: &'static str,
    pub value: String,
}

impl CostBreakdown {
    /// Recomputes FOB from the stored terms only.
    pub fn rederive_fob(&self) -> Usd {
        let total = self.exw + self.agent_fee + self.domestic_cny + self.profit;
        fob_from_total(total, self.exchange_rate, self.settlement_factor)
    }

    pub fn is_consistent(&self) -> bool {
        let total = self.exw + self.agent_fee + self.domestic_cny + self.profit;
        total == self.total_cny && self.rederive_fob() == self.fob_usd
    }

    pub fn ladder(&self) -> Vec<LadderLine> {
        vec![
            LadderLine { label: "EXW", value: self.exw.to_string() },
            LadderLine { label: "Agent fee", value: self.agent_fee.to_string() },
            LadderLine { label: "Domestic freight", value: self.domestic_cny.to_string() },
            LadderLine { label: "Profit", value: self.profit.to_string() },
            LadderLine { label: "Total", value: self.total_cny.to_string() },
            LadderLine { label: "Exchange rate", value: self.exchange_rate.to_string() },
            LadderLine { label: "Settlement factor", value: self.settlement_factor.to_string() },
            LadderLine { label: "FOB", value: self.fob_usd.to_string() },
        ]
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trade mode: {}", self.trade_mode)?;
        for line in self.ladder() {
            writeln!(f, "  {:<18} {}", line.label, line.value)?;
        }
        Ok(())
    }
}

// total / (rate × factor), cents. bad divisors give zero rather than a panic
pub fn fob_from_total(total: Cny, exchange_rate: Decimal, settlement_factor: Decimal) -> Usd {
    let divisor = exchange_rate
        .checked_mul(settlement_factor)
        .unwrap_or(Decimal::ZERO);
    Usd::new(round_money(safe_div(total.value(), divisor)))
}

pub fn general_fob(exw: Decimal, exchange_rate: Decimal) -> Usd {
    fob_from_total(Cny::new(exw), exchange_rate, Decimal::ONE)
}

pub fn market_purchase_breakdown(
    exw: Decimal,
    margin: Percent,
    exchange_rate: Decimal,
    costs: &ResolvedCosts,
) -> CostBreakdown {
    let exw = Cny::new(exw);
    let profit = exw.mul(margin.as_fraction());
    let total_cny = exw + costs.agent_fee + costs.domestic_cny + profit;
    let fob_usd = fob_from_total(total_cny, exchange_rate, costs.settlement_factor);

    CostBreakdown {
        trade_mode: TradeMode::MarketPurchase,
        exw,
        agent_fee: costs.agent_fee,
        domestic_cny: costs.domestic_cny,
        profit,
        total_cny,
        exchange_rate,
        settlement_factor: costs.settlement_factor,
        fob_usd,
    }
}

// general trade carries no extra terms, so the ladder is EXW straight to FOB
pub fn general_breakdown(exw: Decimal, exchange_rate: Decimal) -> CostBreakdown {
    let exw = Cny::new(exw);
    let none = ResolvedCosts::none();
    CostBreakdown {
        trade_mode: TradeMode::General,
        exw,
        agent_fee: none.agent_fee,
        domestic_cny: none.domestic_cny,
        profit: Cny::zero(),
        total_cny: exw,
        exchange_rate,
        settlement_factor: none.settlement_factor,
        fob_usd: general_fob(exw.value(), exchange_rate),
    }
}

pub fn cost_breakdown(
    mode: TradeMode,
    exw: Decimal,
    margin: Percent,
    exchange_rate: Decimal,
    costs: &ResolvedCosts,
) -> CostBreakdown {
    match mode {
        TradeMode::MarketPurchase => market_purchase_breakdown(exw, margin, exchange_rate, costs),
        TradeMode::General => general_breakdown(exw, exchange_rate),
    }
}

/// FOB for the default 1039 model with config defaults and the given overrides.
pub fn calc_fob_usd(
    exw: Decimal,
    margin: Percent,
    exchange_rate: Decimal,
    options: &CostOptions,
    config: &QuoteConfig,
) -> Usd {
    market_purchase_breakdown(exw, margin, exchange_rate, &options.resolve(config)).fob_usd
}
