//! Dimensional math for cartons: volume, volumetric weight and the
//! chargeable basis a carrier bills on.
//!
//! Carriers bill on rounded figures, so volumetric and chargeable weight are
//! rounded to 2 decimals here and volume to 6. Downstream carton scaling
//! relies on these exact rounding points.

use crate::types::{non_negative, round_to};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const CM3_PER_CBM: Decimal = dec!(1_000_000);
pub const AIR_DIVISOR: Decimal = dec!(6000);
pub const SEA_DIVISOR: Decimal = dec!(5000);

const VOLUME_DP: u32 = 6;
const WEIGHT_DP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierMode {
    Air,
    Sea,
}

impl CarrierMode {
    pub fn divisor(&self) -> Decimal {
        match self {
            CarrierMode::Air => AIR_DIVISOR,
            CarrierMode::Sea => SEA_DIVISOR,
        }
    }
}

/// Dense cargo is billed by real weight, bulky cargo by its volume equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoType {
    Heavy,
    Volume,
}

// L×W×H in cm³, or None when any side is non-positive or the product overflows
fn cubic_cm(length: Decimal, width: Decimal, height: Decimal) -> Option<Decimal> {
    if length <= Decimal::ZERO || width <= Decimal::ZERO || height <= Decimal::ZERO {
        return None;
    }
    length.checked_mul(width)?.checked_mul(height)
}

/// Carton volume in CBM from centimetre dimensions.
pub fn volume_cbm(length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Decimal {
    volume_cbm_with_allowance(length_cm, width_cm, height_cm, Decimal::ZERO)
}

/// Volume after adding `allowance_cm` to every side, for conservative quotes
/// when exact packaging is unknown. Zero allowance equals [`volume_cbm`].
pub fn volume_cbm_with_allowance(
    length_cm: Decimal,
    width_cm: Decimal,
    height_cm: Decimal,
    allowance_cm: Decimal,
) -> Decimal {
    let padded = (
        length_cm.checked_add(allowance_cm),
        width_cm.checked_add(allowance_cm),
        height_cm.checked_add(allowance_cm),
    );
    let (Some(length), Some(width), Some(height)) = padded else {
        return Decimal::ZERO;
    };
    cubic_cm(length, width, height)
        .and_then(|cm3| cm3.checked_div(CM3_PER_CBM))
        .map(|cbm| round_to(cbm, VOLUME_DP))
        .unwrap_or(Decimal::ZERO)
}

/// Weight equivalent in kg: L×W×H / divisor (6000 air, 5000 sea).
pub fn volumetric_weight(
    length_cm: Decimal,
    width_cm: Decimal,
    height_cm: Decimal,
    divisor: Decimal,
) -> Decimal {
    if divisor <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    cubic_cm(length_cm, width_cm, height_cm)
        .and_then(|cm3| cm3.checked_div(divisor))
        .map(|kg| round_to(kg, WEIGHT_DP))
        .unwrap_or(Decimal::ZERO)
}

pub fn chargeable_weight(actual_kg: Decimal, volumetric_kg: Decimal) -> Decimal {
    let actual = non_negative(actual_kg);
    let volumetric = non_negative(volumetric_kg);
    round_to(actual.max(volumetric), WEIGHT_DP)
}

// None when no cargo was specified at all. ties go to heavy
pub fn cargo_type(actual_kg: Decimal, volumetric_kg: Decimal) -> Option<CargoType> {
    if actual_kg <= Decimal::ZERO && volumetric_kg <= Decimal::ZERO {
        return None;
    }
    if actual_kg >= volumetric_kg {
        Some(CargoType::Heavy)
    } else {
        Some(CargoType::Volume)
    }
}
