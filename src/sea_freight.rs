// 4.0: international sea leg. LCL bills per chargeable ton (1 CBM ~ 1 ton),
// FCL per container. container type is bookkeeping only, no capacity checks.

use crate::types::{mul_or_zero, non_negative, round_money, round_to, Cny, Usd};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const TON_DP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "20GP")]
    Gp20,
    #[serde(rename = "40GP")]
    Gp40,
    #[serde(rename = "40HQ")]
    Hq40,
}

impl ContainerType {
    pub fn label(&self) -> &'static str {
        match self {
            ContainerType::Gp20 => "20GP",
            ContainerType::Gp40 => "40GP",
            ContainerType::Hq40 => "40HQ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SeaFreight {
    // FOB quote, no international leg
    #[default]
    None,
    Manual { usd: Decimal },
    Lcl { rate_per_ton: Decimal },
    Fcl {
        container: ContainerType,
        count: u32,
        rate_per_container: Decimal,
    },
}

// 4.1: max(CBM, kg/1000). negative inputs count as zero
pub fn sea_chargeable_ton(volume_cbm: Decimal, gross_weight_kg: Decimal) -> Decimal {
    let volume = non_negative(volume_cbm);
    let weight_ton = non_negative(gross_weight_kg) / dec!(1000);
    round_to(volume.max(weight_ton), TON_DP)
}

pub fn lcl_freight_cny(
    volume_cbm: Decimal,
    gross_weight_kg: Decimal,
    rate_per_ton: Decimal,
) -> Cny {
    if rate_per_ton < Decimal::ZERO {
        return Cny::zero();
    }
    let chargeable = sea_chargeable_ton(volume_cbm, gross_weight_kg);
    Cny::new(round_money(mul_or_zero(chargeable, rate_per_ton)))
}

// 4.2: count × per-container rate
pub fn fcl_freight_cny(container_count: u32, rate_per_container: Decimal) -> Cny {
    Cny::new(round_money(mul_or_zero(Decimal::from(container_count), rate_per_container)))
}

/// International freight for the whole order, in USD at `exchange_rate`.
/// LCL bills on the order's total volume and gross weight.
pub fn freight_usd(
    freight: &SeaFreight,
    total_cbm: Decimal,
    total_gross_kg: Decimal,
    exchange_rate: Decimal,
) -> Usd {
    match *freight {
        SeaFreight::None => Usd::zero(),
        SeaFreight::Manual { usd } => Usd::new(round_money(usd)),
        SeaFreight::Lcl { rate_per_ton } => {
            lcl_freight_cny(total_cbm, total_gross_kg, rate_per_ton).to_usd(exchange_rate)
        }
        SeaFreight::Fcl {
            count,
            rate_per_container,
            ..
        } => fcl_freight_cny(count, rate_per_container).to_usd(exchange_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn chargeable_ton_prefers_volume_when_bulky() {
        assert_eq!(sea_chargeable_ton(dec!(2.5), dec!(1800)), dec!(2.5));
    }

    #[test]
    fn chargeable_ton_prefers_weight_when_dense() {
        assert_eq!(sea_chargeable_ton(dec!(1.2), dec!(3456.78)), dec!(3.4568));
    }

    #[test]
    fn chargeable_ton_clamps_negatives() {
        assert_eq!(sea_chargeable_ton(dec!(-1), dec!(-500)), Decimal::ZERO);
        assert_eq!(sea_chargeable_ton(dec!(-1), dec!(500)), dec!(0.5));
    }

    #[test]
    fn lcl_cost() {
        assert_eq!(lcl_freight_cny(dec!(2.5), dec!(1800), dec!(600)).value(), dec!(1500));
        assert!(lcl_freight_cny(dec!(2.5), dec!(1800), dec!(-600)).is_zero());
    }

    #[test]
    fn fcl_cost() {
        assert_eq!(fcl_freight_cny(2, dec!(9800)).value(), dec!(19600));
        assert!(fcl_freight_cny(0, dec!(9800)).is_zero());
    }

    #[test]
    fn huge_rates_degrade_to_zero() {
        assert!(lcl_freight_cny(dec!(2.5), dec!(1800), Decimal::MAX).is_zero());
        assert!(fcl_freight_cny(3, Decimal::MAX).is_zero());
    }

    #[test]
    fn freight_converted_to_usd() {
        let lcl = SeaFreight::Lcl { rate_per_ton: dec!(600) };
        assert_eq!(freight_usd(&lcl, dec!(2.5), dec!(1800), dec!(7.25)).value(), dec!(206.90));

        let fcl = SeaFreight::Fcl {
            container: ContainerType::Hq40,
            count: 1,
            rate_per_container: dec!(14500),
        };
        assert_eq!(freight_usd(&fcl, dec!(0), dec!(0), dec!(7.25)).value(), dec!(2000));
    }

    #[test]
    fn manual_and_none() {
        let manual = SeaFreight::Manual { usd: dec!(-40) };
        assert!(freight_usd(&manual, dec!(1), dec!(1), dec!(7.25)).is_zero());
        assert!(freight_usd(&SeaFreight::None, dec!(1), dec!(1), dec!(7.25)).is_zero());
    }

    #[test]
    fn container_labels_do_not_change_cost() {
        for container in [ContainerType::Gp20, ContainerType::Gp40, ContainerType::Hq40] {
            let fcl = SeaFreight::Fcl { container, count: 1, rate_per_container: dec!(7250) };
            assert_eq!(freight_usd(&fcl, dec!(0), dec!(0), dec!(7.25)).value(), dec!(1000));
        }
    }
}
