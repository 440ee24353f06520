//! Quote Core Simulation.
//!
//! Walks through the pricing scenarios a seller hits day to day: a 1039
//! market-purchase quote, a general-trade quote, LCL freight, degenerate
//! cartons, and a full order priced through to CIF.

use quote_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn main() {
    logging::init();

    let config = QuoteConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration, falling back to defaults");
        run(&QuoteConfig::default());
    } else {
        run(&config);
    }
}

fn run(config: &QuoteConfig) {
    println!("FOB Quote Engine Simulation");
    println!(
        "Agent fee ¥{}, Yiwu trucking ¥{}, settlement factor {}\n",
        config.agent_fee, config.trucking_yiwu, config.settlement_factor
    );

    scenario_1_market_purchase(config);
    scenario_2_general_trade();
    scenario_3_lcl_freight();
    scenario_4_degenerate_carton();
    scenario_5_full_order(config);

    println!("\nAll simulations completed successfully.");
}

/// 1039 mode: EXW 100, 15% margin, shipped from Yiwu.
fn scenario_1_market_purchase(config: &QuoteConfig) {
    println!("Scenario 1: Market Purchase (1039)\n");

    let costs = CostOptions::default().resolve(config);
    let breakdown =
        market_purchase_breakdown(dec!(100), Percent::new(dec!(15)), dec!(7.25), &costs);

    print!("{breakdown}");
    println!("  Re-derived FOB: {}\n", breakdown.rederive_fob());
}

/// General trade: FOB is just EXW over the rate.
fn scenario_2_general_trade() {
    println!("Scenario 2: General Trade\n");

    let fob = general_fob(dec!(100), dec!(7.25));
    println!("  EXW ¥100 @ 7.25 -> FOB {fob}\n");
}

/// LCL: 2.5 CBM, 1.8 t gross, 600 CNY per ton.
fn scenario_3_lcl_freight() {
    println!("Scenario 3: LCL Sea Freight\n");

    let ton = sea_chargeable_ton(dec!(2.5), dec!(1800));
    let cost = lcl_freight_cny(dec!(2.5), dec!(1800), dec!(600));
    println!("  Chargeable ton: {ton}");
    println!("  LCL cost: {cost} ({})", cost.to_usd(dec!(7.25)));

    let container = ContainerType::Gp20;
    let fcl = fcl_freight_cny(1, dec!(7250));
    println!("  1 × {} FCL: {fcl} ({})\n", container.label(), fcl.to_usd(dec!(7.25)));
}

/// A zero side degrades to zero rather than failing.
fn scenario_4_degenerate_carton() {
    println!("Scenario 4: Degenerate Carton\n");

    let volume = volume_cbm(dec!(0), dec!(40), dec!(50));
    let weight = volumetric_weight(dec!(0), dec!(40), dec!(50), CarrierMode::Air.divisor());
    println!("  Volume: {volume} CBM, volumetric weight: {weight} kg");
    println!("  Cargo type: {:?}\n", cargo_type(Decimal::ZERO, weight));
}

/// 100 units, 24 per carton, LCL to the buyer's port with insurance.
fn scenario_5_full_order(config: &QuoteConfig) {
    println!("Scenario 5: Full Order to CIF\n");

    let mut request = QuoteRequest::new("Massage gun 2000mAh", dec!(100));
    request.customer_name = Some("Acme Imports".to_string());
    request.quantity = 100;
    request.packing = Packing {
        units_per_carton: Some(24),
        carton: Some(CartonSpec {
            length_cm: dec!(60),
            width_cm: dec!(40),
            height_cm: dec!(50),
            gross_kg: dec!(18),
        }),
    };
    request.allowance_cm = dec!(1);
    request.domestic = DomesticCharge::ByVolume { rate_per_cbm: dec!(150) };
    request.sea_freight = SeaFreight::Lcl { rate_per_ton: dec!(600) };
    request.insurance_usd = dec!(12.5);

    let sheet = match price_quote_strict(&request, config) {
        Ok(sheet) => sheet,
        Err(e) => {
            println!("  Rejected: {e}\n");
            return;
        }
    };

    let cargo = &sheet.cargo;
    println!(
        "  {} cartons, {} CBM each, {} CBM total",
        cargo.cartons, cargo.carton_cbm, cargo.total_cbm
    );
    println!("  Chargeable {} kg per carton ({:?})", cargo.chargeable_kg, cargo.cargo_type);
    print!("{}", sheet.breakdown);
    println!("  Freight {}, insurance {}", sheet.freight_usd, sheet.insurance_usd);
    println!("  Unit:  FOB {} / CFR {} / CIF {}", sheet.unit.fob, sheet.unit.cfr, sheet.unit.cif);
    println!(
        "  Total: FOB {} / CFR {} / CIF {}",
        sheet.total.fob, sheet.total.cfr, sheet.total.cif
    );

    match QuoteRecord::build(&request, &sheet, config, Timestamp::now()) {
        Ok(record) => match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("\n  Record payload:\n{json}"),
            Err(e) => tracing::error!(error = %e, "could not serialize record"),
        },
        Err(e) => println!("  Not submittable: {e}"),
    }
}
