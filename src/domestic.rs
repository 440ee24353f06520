// 3.0: domestic leg (factory/market -> port). one tariff per quote.
// 3.1 is the fixed-fee default rule, 3.2 the tariff functions, 3.3 carton scaling.

use crate::config::QuoteConfig;
use crate::types::{mul_or_zero, round_money, Cny, ShipFrom};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const KG_PER_TON: Decimal = dec!(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DomesticCharge {
    // None = use the ship-from default
    Fixed { amount: Option<Decimal> },
    ByWeight { rate_per_ton: Decimal },
    ByVolume { rate_per_cbm: Decimal },
    PerContainer { price: Decimal },
}

impl Default for DomesticCharge {
    fn default() -> Self {
        DomesticCharge::Fixed { amount: None }
    }
}

// 3.1: yiwu goods get trucked by the consolidator, factory goods ship direct
pub fn get_domestic_cny(ship_from: ShipFrom, custom: Option<Decimal>, config: &QuoteConfig) -> Cny {
    match (ship_from, custom) {
        (_, Some(amount)) => Cny::new(amount),
        (ShipFrom::Yiwu, None) => Cny::new(config.trucking_yiwu),
        (ShipFrom::Factory, None) => Cny::zero(),
    }
}

// 3.2: yuan/ton × chargeable kg / 1000
pub fn domestic_cny_by_weight(chargeable_kg: Decimal, rate_per_ton: Decimal) -> Cny {
    if chargeable_kg <= Decimal::ZERO || rate_per_ton < Decimal::ZERO {
        return Cny::zero();
    }
    Cny::new(round_money(mul_or_zero(rate_per_ton, chargeable_kg) / KG_PER_TON))
}

pub fn domestic_cny_by_volume(volume_cbm: Decimal, rate_per_cbm: Decimal) -> Cny {
    if volume_cbm <= Decimal::ZERO || rate_per_cbm < Decimal::ZERO {
        return Cny::zero();
    }
    Cny::new(round_money(mul_or_zero(volume_cbm, rate_per_cbm)))
}

pub fn domestic_cny_per_container(price: Decimal) -> Cny {
    Cny::new(round_money(price))
}

// 3.3: ceil(units / units_per_carton), never less than one carton
pub fn carton_count(quantity: u32, units_per_carton: Option<u32>) -> u32 {
    match units_per_carton {
        Some(per_carton) if per_carton > 0 => quantity.div_ceil(per_carton).max(1),
        _ => 1,
    }
}

/// Resolves the selected tariff into one CNY figure for the whole order.
/// Weight and volume inputs are per carton; those two tariffs scale by
/// `cartons`, the flat ones do not.
pub fn resolve_domestic(
    charge: &DomesticCharge,
    ship_from: ShipFrom,
    chargeable_kg: Decimal,
    volume_cbm: Decimal,
    cartons: u32,
    config: &QuoteConfig,
) -> Cny {
    let cartons = Decimal::from(cartons.max(1));
    match *charge {
        DomesticCharge::Fixed { amount } => get_domestic_cny(ship_from, amount, config),
        DomesticCharge::ByWeight { rate_per_ton } => {
            domestic_cny_by_weight(chargeable_kg, rate_per_ton).mul(cartons)
        }
        DomesticCharge::ByVolume { rate_per_cbm } => {
            domestic_cny_by_volume(volume_cbm, rate_per_cbm).mul(cartons)
        }
        DomesticCharge::PerContainer { price } => domestic_cny_per_container(price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> QuoteConfig {
        QuoteConfig::default()
    }

    #[test]
    fn yiwu_defaults_to_trucking_fee() {
        let cny = get_domestic_cny(ShipFrom::Yiwu, None, &config());
        assert_eq!(cny.value(), dec!(120));
    }

    #[test]
    fn factory_defaults_to_zero() {
        let cny = get_domestic_cny(ShipFrom::Factory, None, &config());
        assert!(cny.is_zero());
    }

    #[test]
    fn explicit_amount_overrides_default() {
        let cfg = config();
        assert_eq!(get_domestic_cny(ShipFrom::Yiwu, Some(dec!(200)), &cfg).value(), dec!(200));
        assert_eq!(get_domestic_cny(ShipFrom::Factory, Some(dec!(50)), &cfg).value(), dec!(50));
        assert!(get_domestic_cny(ShipFrom::Yiwu, Some(dec!(-10)), &cfg).is_zero());
    }

    #[test]
    fn by_weight_tariff() {
        // 300 yuan/ton × 20 kg = 6 yuan
        assert_eq!(domestic_cny_by_weight(dec!(20), dec!(300)).value(), dec!(6));
        assert!(domestic_cny_by_weight(dec!(0), dec!(300)).is_zero());
        assert!(domestic_cny_by_weight(dec!(20), dec!(-1)).is_zero());
    }

    #[test]
    fn by_volume_tariff() {
        // 0.135408 CBM × 150 = 20.3112
        assert_eq!(domestic_cny_by_volume(dec!(0.135408), dec!(150)).value(), dec!(20.31));
        assert!(domestic_cny_by_volume(dec!(-1), dec!(150)).is_zero());
    }

    #[test]
    fn huge_tariffs_degrade_to_zero() {
        assert!(domestic_cny_by_weight(Decimal::MAX, dec!(300)).is_zero());
        assert!(domestic_cny_by_volume(Decimal::MAX, dec!(150)).is_zero());
        let by_weight = DomesticCharge::ByWeight { rate_per_ton: dec!(300) };
        let heavy_kg = dec!(1_000_000_000_000_000_000_000_000_000);
        let cny = resolve_domestic(&by_weight, ShipFrom::Yiwu, heavy_kg, dec!(0), 1, &config());
        assert!(cny.is_zero());
    }

    #[test]
    fn per_container_passes_through() {
        assert_eq!(domestic_cny_per_container(dec!(1800)).value(), dec!(1800));
        assert!(domestic_cny_per_container(dec!(-1800)).is_zero());
    }

    #[test]
    fn carton_count_rounds_up() {
        assert_eq!(carton_count(100, Some(24)), 5);
        assert_eq!(carton_count(96, Some(24)), 4);
        assert_eq!(carton_count(100, None), 1);
        assert_eq!(carton_count(0, Some(24)), 1);
        assert_eq!(carton_count(10, Some(0)), 1);
    }

    #[test]
    fn weight_and_volume_scale_by_cartons() {
        let cfg = config();
        let by_weight = DomesticCharge::ByWeight { rate_per_ton: dec!(300) };
        let cny = resolve_domestic(&by_weight, ShipFrom::Yiwu, dec!(20), dec!(0.12), 5, &cfg);
        assert_eq!(cny.value(), dec!(30));

        let by_volume = DomesticCharge::ByVolume { rate_per_cbm: dec!(150) };
        let cny = resolve_domestic(&by_volume, ShipFrom::Yiwu, dec!(20), dec!(0.12), 5, &cfg);
        assert_eq!(cny.value(), dec!(90));
    }

    #[test]
    fn flat_tariffs_ignore_cartons() {
        let cfg = config();
        let fixed = DomesticCharge::default();
        assert_eq!(
            resolve_domestic(&fixed, ShipFrom::Yiwu, dec!(20), dec!(0.12), 5, &cfg).value(),
            dec!(120)
        );
        let container = DomesticCharge::PerContainer { price: dec!(1800) };
        assert_eq!(
            resolve_domestic(&container, ShipFrom::Factory, dec!(20), dec!(0.12), 5, &cfg).value(),
            dec!(1800)
        );
    }
}
