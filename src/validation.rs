//! Input inspection for quotes.
//!
//! The calculation functions silently clamp bad input so a half-filled form
//! still previews. That is fine for a live preview but can hide a data-entry
//! mistake in a binding quote, so [`inspect`] lists every clamping decision
//! the math would make and [`validate_for_submit`] is the gate run before a
//! quote record is created.

use crate::config::{settlement_factor_in_range, QuoteConfig};
use crate::domestic::DomesticCharge;
use crate::quote::QuoteRequest;
use crate::sea_freight::SeaFreight;
use crate::types::TradeMode;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputWarning {
    #[error("EXW price {0} is negative and counts as zero")]
    NegativeExw(Decimal),

    #[error("Profit margin {0}% is negative and counts as zero")]
    NegativeMargin(Decimal),

    #[error("Exchange rate {0} is not positive, FOB degrades to zero")]
    NonPositiveExchangeRate(Decimal),

    #[error("Settlement factor {0} is outside (0, 1]")]
    SettlementFactorOutOfRange(Decimal),

    #[error("Agent fee {0} is negative and counts as zero")]
    NegativeAgentFee(Decimal),

    #[error("Domestic freight {0} is negative and counts as zero")]
    NegativeDomesticFreight(Decimal),

    #[error("Tariff rate {0} is negative, the leg is priced at zero")]
    NegativeTariffRate(Decimal),

    #[error("Quantity is zero and is priced as one unit")]
    ZeroQuantity,

    #[error("Carton side {0} cm is not positive, volume and volumetric weight are zero")]
    NonPositiveDimension(Decimal),

    #[error("Carton side {side} cm plus allowance {allowance} cm is not positive")]
    NonPositiveAdjustedDimension { side: Decimal, allowance: Decimal },

    #[error("Allowance {0} cm is negative and shrinks every carton side")]
    NegativeAllowance(Decimal),

    #[error("Gross weight {0} kg is negative and counts as zero")]
    NegativeGrossWeight(Decimal),

    #[error("Volumetric divisor {0} is not positive, volumetric weight counts as zero")]
    NonPositiveDivisor(Decimal),

    #[error("Freight {0} USD is negative and is not subtracted")]
    NegativeFreight(Decimal),

    #[error("Insurance {0} USD is negative and is not subtracted")]
    NegativeInsurance(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("Product name is required")]
    MissingProductName,

    #[error("EXW price must be positive, got {0}")]
    InvalidExwPrice(Decimal),

    #[error("Exchange rate must be positive, got {0}")]
    InvalidExchangeRate(Decimal),

    #[error("Settlement factor must be in (0, 1], got {0}")]
    SettlementFactorOutOfRange(Decimal),

    #[error("Quote rejected with {} input warning(s)", .0.len())]
    Rejected(Vec<InputWarning>),
}

/// Every input the lenient math would clamp or zero out.
pub fn inspect(request: &QuoteRequest, config: &QuoteConfig) -> Vec<InputWarning> {
    let mut warnings = Vec::new();

    if request.exw_price < Decimal::ZERO {
        warnings.push(InputWarning::NegativeExw(request.exw_price));
    }
    if let Some(margin) = request.profit_margin.filter(|m| *m < Decimal::ZERO) {
        warnings.push(InputWarning::NegativeMargin(margin));
    }
    if request.quantity == 0 {
        warnings.push(InputWarning::ZeroQuantity);
    }

    let rate = request.resolved_exchange_rate(config);
    if rate <= Decimal::ZERO {
        warnings.push(InputWarning::NonPositiveExchangeRate(rate));
    }

    if request.trade_mode == TradeMode::MarketPurchase {
        let factor = request.settlement_factor.unwrap_or(config.settlement_factor);
        if !settlement_factor_in_range(factor) {
            warnings.push(InputWarning::SettlementFactorOutOfRange(factor));
        }
        if let Some(fee) = request.agent_fee.filter(|f| *f < Decimal::ZERO) {
            warnings.push(InputWarning::NegativeAgentFee(fee));
        }
        inspect_domestic(&request.domestic, &mut warnings);
    }

    if let Some(carton) = &request.packing.carton {
        let allowance = request.allowance_cm;
        if allowance < Decimal::ZERO {
            warnings.push(InputWarning::NegativeAllowance(allowance));
        }
        // volumetric weight uses the raw sides, volume the padded ones
        for side in [carton.length_cm, carton.width_cm, carton.height_cm] {
            if side <= Decimal::ZERO {
                warnings.push(InputWarning::NonPositiveDimension(side));
            } else if !side.checked_add(allowance).is_some_and(|s| s > Decimal::ZERO) {
                warnings.push(InputWarning::NonPositiveAdjustedDimension { side, allowance });
            }
        }
        if carton.gross_kg < Decimal::ZERO {
            warnings.push(InputWarning::NegativeGrossWeight(carton.gross_kg));
        }
        let divisor = request.resolved_divisor(config);
        if divisor <= Decimal::ZERO {
            warnings.push(InputWarning::NonPositiveDivisor(divisor));
        }
    }

    match request.sea_freight {
        SeaFreight::Manual { usd } if usd < Decimal::ZERO => {
            warnings.push(InputWarning::NegativeFreight(usd));
        }
        SeaFreight::Lcl { rate_per_ton } if rate_per_ton < Decimal::ZERO => {
            warnings.push(InputWarning::NegativeTariffRate(rate_per_ton));
        }
        SeaFreight::Fcl { rate_per_container, .. } if rate_per_container < Decimal::ZERO => {
            warnings.push(InputWarning::NegativeTariffRate(rate_per_container));
        }
        _ => {}
    }

    if request.insurance_usd < Decimal::ZERO {
        warnings.push(InputWarning::NegativeInsurance(request.insurance_usd));
    }

    for warning in &warnings {
        tracing::warn!(product = %request.product_name, %warning, "quote input clamped");
    }
    warnings
}

fn inspect_domestic(charge: &DomesticCharge, warnings: &mut Vec<InputWarning>) {
    match *charge {
        DomesticCharge::Fixed { amount: Some(amount) } if amount < Decimal::ZERO => {
            warnings.push(InputWarning::NegativeDomesticFreight(amount));
        }
        DomesticCharge::PerContainer { price } if price < Decimal::ZERO => {
            warnings.push(InputWarning::NegativeDomesticFreight(price));
        }
        DomesticCharge::ByWeight { rate_per_ton: rate }
        | DomesticCharge::ByVolume { rate_per_cbm: rate }
            if rate < Decimal::ZERO =>
        {
            warnings.push(InputWarning::NegativeTariffRate(rate));
        }
        _ => {}
    }
}

/// Is this a complete, submittable quote.
pub fn validate_for_submit(
    request: &QuoteRequest,
    config: &QuoteConfig,
) -> Result<(), QuoteError> {
    if request.product_name.trim().is_empty() {
        return Err(QuoteError::MissingProductName);
    }
    if request.exw_price <= Decimal::ZERO {
        return Err(QuoteError::InvalidExwPrice(request.exw_price));
    }
    let rate = request.resolved_exchange_rate(config);
    if rate <= Decimal::ZERO {
        return Err(QuoteError::InvalidExchangeRate(rate));
    }
    if request.trade_mode == TradeMode::MarketPurchase {
        let factor = request.settlement_factor.unwrap_or(config.settlement_factor);
        if !settlement_factor_in_range(factor) {
            return Err(QuoteError::SettlementFactorOutOfRange(factor));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{price_quote_strict, CartonSpec, Packing};
    use rust_decimal_macros::dec;

    fn clean_request() -> QuoteRequest {
        QuoteRequest::new("Massage gun 2000mAh", dec!(100))
    }

    #[test]
    fn clean_request_has_no_warnings() {
        assert!(inspect(&clean_request(), &QuoteConfig::default()).is_empty());
        assert!(validate_for_submit(&clean_request(), &QuoteConfig::default()).is_ok());
    }

    #[test]
    fn surfaces_clamped_money() {
        let mut req = clean_request();
        req.exw_price = dec!(-1);
        req.profit_margin = Some(dec!(-5));
        req.sea_freight = SeaFreight::Manual { usd: dec!(-30) };
        req.insurance_usd = dec!(-2);

        let warnings = inspect(&req, &QuoteConfig::default());
        assert!(warnings.contains(&InputWarning::NegativeExw(dec!(-1))));
        assert!(warnings.contains(&InputWarning::NegativeMargin(dec!(-5))));
        assert!(warnings.contains(&InputWarning::NegativeFreight(dec!(-30))));
        assert!(warnings.contains(&InputWarning::NegativeInsurance(dec!(-2))));
    }

    #[test]
    fn surfaces_bad_carton() {
        let mut req = clean_request();
        req.packing = Packing {
            units_per_carton: Some(10),
            carton: Some(CartonSpec {
                length_cm: dec!(60),
                width_cm: dec!(0),
                height_cm: dec!(50),
                gross_kg: dec!(-3),
            }),
        };
        let warnings = inspect(&req, &QuoteConfig::default());
        assert!(warnings.contains(&InputWarning::NonPositiveDimension(dec!(0))));
        assert!(warnings.contains(&InputWarning::NegativeGrossWeight(dec!(-3))));
    }

    fn carton(length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Packing {
        Packing {
            units_per_carton: None,
            carton: Some(CartonSpec { length_cm, width_cm, height_cm, gross_kg: dec!(18) }),
        }
    }

    #[test]
    fn allowance_does_not_hide_a_zero_side() {
        let mut req = clean_request();
        req.packing = carton(dec!(0), dec!(40), dec!(50));
        req.allowance_cm = dec!(2);
        let warnings = inspect(&req, &QuoteConfig::default());
        assert_eq!(warnings, vec![InputWarning::NonPositiveDimension(dec!(0))]);
        assert!(matches!(
            price_quote_strict(&req, &QuoteConfig::default()),
            Err(QuoteError::Rejected(_))
        ));
    }

    #[test]
    fn negative_allowance_is_flagged() {
        let mut req = clean_request();
        req.packing = carton(dec!(60), dec!(40), dec!(50));
        req.allowance_cm = dec!(-1);
        let warnings = inspect(&req, &QuoteConfig::default());
        assert_eq!(warnings, vec![InputWarning::NegativeAllowance(dec!(-1))]);

        req.packing = carton(dec!(60), dec!(40), dec!(5));
        req.allowance_cm = dec!(-5);
        let warnings = inspect(&req, &QuoteConfig::default());
        assert_eq!(
            warnings,
            vec![
                InputWarning::NegativeAllowance(dec!(-5)),
                InputWarning::NonPositiveAdjustedDimension { side: dec!(5), allowance: dec!(-5) },
            ]
        );
    }

    #[test]
    fn zero_quantity_is_flagged() {
        let mut req = clean_request();
        req.quantity = 0;
        let warnings = inspect(&req, &QuoteConfig::default());
        assert_eq!(warnings, vec![InputWarning::ZeroQuantity]);
        assert_eq!(
            price_quote_strict(&req, &QuoteConfig::default()),
            Err(QuoteError::Rejected(vec![InputWarning::ZeroQuantity]))
        );

        req.quantity = 1;
        assert!(price_quote_strict(&req, &QuoteConfig::default()).is_ok());
    }

    #[test]
    fn settlement_factor_only_matters_for_market_purchase() {
        let mut req = clean_request();
        req.settlement_factor = Some(dec!(1.5));
        let warnings = inspect(&req, &QuoteConfig::default());
        assert_eq!(warnings, vec![InputWarning::SettlementFactorOutOfRange(dec!(1.5))]);

        req.trade_mode = TradeMode::General;
        assert!(inspect(&req, &QuoteConfig::default()).is_empty());
    }

    #[test]
    fn negative_domestic_tariff() {
        let mut req = clean_request();
        req.domestic = DomesticCharge::ByVolume { rate_per_cbm: dec!(-10) };
        let warnings = inspect(&req, &QuoteConfig::default());
        assert_eq!(warnings, vec![InputWarning::NegativeTariffRate(dec!(-10))]);
    }

    #[test]
    fn submit_gate() {
        let config = QuoteConfig::default();

        let mut req = clean_request();
        req.product_name = "   ".to_string();
        assert_eq!(validate_for_submit(&req, &config), Err(QuoteError::MissingProductName));

        let mut req = clean_request();
        req.exw_price = Decimal::ZERO;
        assert_eq!(
            validate_for_submit(&req, &config),
            Err(QuoteError::InvalidExwPrice(Decimal::ZERO))
        );

        let mut req = clean_request();
        req.exchange_rate = Some(dec!(-7));
        assert_eq!(
            validate_for_submit(&req, &config),
            Err(QuoteError::InvalidExchangeRate(dec!(-7)))
        );

        let mut req = clean_request();
        req.settlement_factor = Some(Decimal::ZERO);
        assert!(matches!(
            validate_for_submit(&req, &config),
            Err(QuoteError::SettlementFactorOutOfRange(_))
        ));
    }

    #[test]
    fn rejected_error_message_counts_warnings() {
        let err = QuoteError::Rejected(vec![
            InputWarning::NegativeExw(dec!(-1)),
            InputWarning::NegativeInsurance(dec!(-1)),
        ]);
        assert_eq!(err.to_string(), "Quote rejected with 2 input warning(s)");
    }
}
