// 6.0: incoterm chain FOB -> CFR -> CIF. each step takes the previous price as input
// and never recomputes it. negative freight/insurance is clamped, never subtracted.

use crate::types::{add_or_zero, non_negative, round_money, Usd};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub fn cfr_usd(fob: Usd, freight_usd: Decimal) -> Usd {
    Usd::new(round_money(add_or_zero(fob.value(), non_negative(freight_usd))))
}

pub fn cif_usd(fob: Usd, freight_usd: Decimal, insurance_usd: Decimal) -> Usd {
    let cfr = add_or_zero(fob.value(), non_negative(freight_usd));
    Usd::new(round_money(add_or_zero(cfr, non_negative(insurance_usd))))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncotermPrices {
    pub fob: Usd,
    pub cfr: Usd,
    pub cif: Usd,
}

impl IncotermPrices {
    pub fn derive(fob: Usd, freight_usd: Decimal, insurance_usd: Decimal) -> Self {
        Self {
            fob,
            cfr: cfr_usd(fob, freight_usd),
            cif: cif_usd(fob, freight_usd, insurance_usd),
        }
    }
}
