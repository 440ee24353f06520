// quote-core: FOB quotation engine for small export sellers.
// turns an EXW price plus trade costs into FOB/CFR/CIF with an auditable cost ladder.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Cny, Usd, Percent, ShipFrom, TradeMode, rounding
//   2.x  dimensions.rs: carton volume, volumetric/chargeable weight, cargo type
//   3.x  domestic.rs: domestic leg tariffs and carton scaling
//   4.x  sea_freight.rs: LCL chargeable ton, FCL containers, freight in USD
//   5.x  breakdown.rs: cost ladder and FOB for general / 1039 trade
//   6.x  incoterm.rs: CFR and CIF from FOB
//   7.x  config.rs: fee/rate defaults, env overrides, validation
//   8.x  quote.rs: order-level assembly, live preview, record payload
//   8.5  validation.rs: clamping warnings and the submit gate
//   9.x  rate.rs: exchange-rate feed decoding, locked rates
//   10.x logging.rs: tracing subscriber setup

pub mod breakdown;
pub mod dimensions;
pub mod domestic;
pub mod incoterm;
pub mod sea_freight;
pub mod types;

pub mod config;
pub mod logging;
pub mod quote;
pub mod rate;
pub mod validation;

// re exports for convenience
pub use breakdown::*;
pub use dimensions::*;
pub use domestic::*;
pub use incoterm::*;
pub use sea_freight::*;
pub use types::*;
pub use config::{ConfigError, QuoteConfig};
pub use quote::{
    preview_fob, price_quote, price_quote_strict, CargoSummary, CartonSpec, Packing, QuoteRecord,
    QuoteRequest, QuoteSheet,
};
pub use rate::{decode_feed, FeedRate, LockedRate, RateFeedError};
pub use validation::{inspect, validate_for_submit, InputWarning, QuoteError};
