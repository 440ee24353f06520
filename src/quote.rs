// 8.0: order-level quote assembly. resolves every optional once, then runs the
// pure math leaves-first: cargo -> domestic -> breakdown -> freight -> incoterms.
// 8.1 is the live preview, 8.2 the record payload handed to persistence.

use crate::breakdown::{cost_breakdown, CostBreakdown, CostOptions};
use crate::config::QuoteConfig;
use crate::dimensions::{
    cargo_type, chargeable_weight, volume_cbm_with_allowance, volumetric_weight, CargoType,
    CarrierMode,
};
use crate::domestic::{carton_count, resolve_domestic, DomesticCharge};
use crate::incoterm::IncotermPrices;
use crate::rate::LockedRate;
use crate::sea_freight::{freight_usd, SeaFreight};
use crate::types::{
    mul_or_zero, non_negative, round_money, Percent, ShipFrom, Timestamp, TradeMode, Usd,
};
use crate::validation::{inspect, validate_for_submit, QuoteError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartonSpec {
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub gross_kg: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packing {
    pub units_per_carton: Option<u32>,
    pub carton: Option<CartonSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub product_name: String,
    pub customer_name: Option<String>,
    // CNY per unit
    pub exw_price: Decimal,
    pub profit_margin: Option<Decimal>,
    pub quantity: u32,
    pub trade_mode: TradeMode,
    pub exchange_rate: Option<Decimal>,
    pub lock_rate: bool,
    // buyer must request access before the price shows
    pub access_controlled: bool,
    pub ship_from: ShipFrom,
    pub domestic: DomesticCharge,
    pub packing: Packing,
    // added to every carton side for conservative volume
    pub allowance_cm: Decimal,
    pub carrier: Option<CarrierMode>,
    pub volumetric_divisor: Option<Decimal>,
    pub sea_freight: SeaFreight,
    pub insurance_usd: Decimal,
    pub agent_fee: Option<Decimal>,
    pub settlement_factor: Option<Decimal>,
}

impl QuoteRequest {
    pub fn new(product_name: impl Into<String>, exw_price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            customer_name: None,
            exw_price,
            profit_margin: None,
            quantity: 1,
            trade_mode: TradeMode::default(),
            exchange_rate: None,
            lock_rate: true,
            access_controlled: false,
            ship_from: ShipFrom::default(),
            domestic: DomesticCharge::default(),
            packing: Packing::default(),
            allowance_cm: Decimal::ZERO,
            carrier: None,
            volumetric_divisor: None,
            sea_freight: SeaFreight::default(),
            insurance_usd: Decimal::ZERO,
            agent_fee: None,
            settlement_factor: None,
        }
    }

    pub fn resolved_exchange_rate(&self, config: &QuoteConfig) -> Decimal {
        self.exchange_rate.unwrap_or(config.default_exchange_rate)
    }

    pub fn resolved_margin(&self, config: &QuoteConfig) -> Percent {
        Percent::new(self.profit_margin.unwrap_or(config.default_profit_margin))
    }

    // explicit divisor > carrier mode > config
    pub fn resolved_divisor(&self, config: &QuoteConfig) -> Decimal {
        self.volumetric_divisor
            .or_else(|| self.carrier.map(|c| c.divisor()))
            .unwrap_or(config.volumetric_divisor)
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.max(1)
    }
}

/// Physical basis of the shipment. Per-carton figures plus order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoSummary {
    pub cartons: u32,
    pub carton_cbm: Decimal,
    pub volumetric_kg: Decimal,
    pub chargeable_kg: Decimal,
    pub cargo_type: Option<CargoType>,
    pub total_cbm: Decimal,
    pub total_gross_kg: Decimal,
}

impl CargoSummary {
    pub fn from_carton(
        carton: &CartonSpec,
        cartons: u32,
        allowance_cm: Decimal,
        divisor: Decimal,
    ) -> Self {
        let carton_cbm = volume_cbm_with_allowance(
            carton.length_cm,
            carton.width_cm,
            carton.height_cm,
            allowance_cm,
        );
        let volumetric_kg =
            volumetric_weight(carton.length_cm, carton.width_cm, carton.height_cm, divisor);
        let count = Decimal::from(cartons);

        Self {
            cartons,
            carton_cbm,
            volumetric_kg,
            chargeable_kg: chargeable_weight(carton.gross_kg, volumetric_kg),
            cargo_type: cargo_type(carton.gross_kg, volumetric_kg),
            // order totals stay unrounded, the freight leg rounds once
            total_cbm: mul_or_zero(carton_cbm, count),
            total_gross_kg: mul_or_zero(non_negative(carton.gross_kg), count),
        }
    }

    // no packing data: one notional carton with nothing in it
    pub fn empty(cartons: u32) -> Self {
        Self {
            cartons,
            carton_cbm: Decimal::ZERO,
            volumetric_kg: Decimal::ZERO,
            chargeable_kg: Decimal::ZERO,
            cargo_type: None,
            total_cbm: Decimal::ZERO,
            total_gross_kg: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSheet {
    pub trade_mode: TradeMode,
    pub quantity: u32,
    pub cargo: CargoSummary,
    // computed on the order total
    pub breakdown: CostBreakdown,
    pub freight_usd: Usd,
    pub insurance_usd: Usd,
    pub total: IncotermPrices,
    pub unit: IncotermPrices,
}

impl QuoteSheet {
    pub fn exchange_rate(&self) -> Decimal {
        self.breakdown.exchange_rate
    }
}

/// Lenient pricing: bad input is clamped, never rejected.
pub fn price_quote(request: &QuoteRequest, config: &QuoteConfig) -> QuoteSheet {
    let quantity = request.quantity();
    let cartons = carton_count(quantity, request.packing.units_per_carton);
    let cargo = match &request.packing.carton {
        Some(carton) => CargoSummary::from_carton(
            carton,
            cartons,
            request.allowance_cm,
            request.resolved_divisor(config),
        ),
        None => CargoSummary::empty(cartons),
    };

    let domestic = resolve_domestic(
        &request.domestic,
        request.ship_from,
        cargo.chargeable_kg,
        cargo.carton_cbm,
        cartons,
        config,
    );
    let costs = CostOptions {
        ship_from: request.ship_from,
        domestic_cny: Some(domestic.value()),
        agent_fee: request.agent_fee,
        settlement_factor: request.settlement_factor,
    }
    .resolve(config);

    let exchange_rate = request.resolved_exchange_rate(config);
    let exw_total = mul_or_zero(request.exw_price, Decimal::from(quantity));
    let breakdown = cost_breakdown(
        request.trade_mode,
        exw_total,
        request.resolved_margin(config),
        exchange_rate,
        &costs,
    );

    let freight = freight_usd(
        &request.sea_freight,
        cargo.total_cbm,
        cargo.total_gross_kg,
        exchange_rate,
    );
    let insurance = Usd::new(round_money(request.insurance_usd));
    let total = IncotermPrices::derive(breakdown.fob_usd, freight.value(), insurance.value());
    let unit = IncotermPrices {
        fob: total.fob.per_unit(quantity),
        cfr: total.cfr.per_unit(quantity),
        cif: total.cif.per_unit(quantity),
    };

    tracing::debug!(
        product = %request.product_name,
        mode = %request.trade_mode,
        quantity,
        cartons,
        fob_total = %total.fob,
        fob_unit = %unit.fob,
        "priced quote"
    );

    QuoteSheet {
        trade_mode: request.trade_mode,
        quantity,
        cargo,
        breakdown,
        freight_usd: freight,
        insurance_usd: insurance,
        total,
        unit,
    }
}

/// Strict pricing for binding quotes: any clamping decision rejects the quote.
pub fn price_quote_strict(
    request: &QuoteRequest,
    config: &QuoteConfig,
) -> Result<QuoteSheet, QuoteError> {
    let warnings = inspect(request, config);
    if !warnings.is_empty() {
        return Err(QuoteError::Rejected(warnings));
    }
    Ok(price_quote(request, config))
}

// 8.1: live preview. nothing to show until EXW is positive
pub fn preview_fob(
    exw_price: Decimal,
    profit_margin: Option<Decimal>,
    exchange_rate: Option<Decimal>,
    trade_mode: TradeMode,
    config: &QuoteConfig,
) -> Option<Usd> {
    if exw_price <= Decimal::ZERO {
        return None;
    }
    let mut request = QuoteRequest::new(String::new(), exw_price);
    request.profit_margin = profit_margin;
    request.exchange_rate = exchange_rate;
    request.trade_mode = trade_mode;
    Some(price_quote(&request, config).unit.fob)
}

// 8.2: what the record-creation routine persists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub product_name: String,
    pub exw_price: Decimal,
    pub profit_margin: Decimal,
    pub fob_price_usd: Decimal,
    pub customer_name: Option<String>,
    pub trade_mode: TradeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate_locked: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_updated_at: Option<String>,
    pub access_controlled: bool,
}

impl QuoteRecord {
    pub fn build(
        request: &QuoteRequest,
        sheet: &QuoteSheet,
        config: &QuoteConfig,
        now: Timestamp,
    ) -> Result<Self, QuoteError> {
        validate_for_submit(request, config)?;

        let locked = request
            .lock_rate
            .then(|| LockedRate::new(sheet.exchange_rate(), now));
        let customer_name = request
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        tracing::info!(
            product = %request.product_name.trim(),
            mode = %request.trade_mode,
            fob = %sheet.unit.fob,
            locked = locked.is_some(),
            "quote record ready"
        );

        Ok(Self {
            product_name: request.product_name.trim().to_string(),
            exw_price: request.exw_price,
            profit_margin: request.resolved_margin(config).value(),
            fob_price_usd: sheet.unit.fob.value(),
            customer_name,
            trade_mode: request.trade_mode,
            exchange_rate_locked: locked.map(|l| l.rate),
            rate_updated_at: locked.and_then(|l| l.locked_at.to_rfc3339()),
            access_controlled: request.access_controlled,
        })
    }
}
