use chrono::{DateTime, Local, Timelike};

pub use crate::domain::price::{DemandLevel, PriceQuote};
use crate::profile::production_at;
use crate::round2;
use crate::time::is_peak_hour;

pub const BASE_PRICE_PER_KWH: f64 = 5.0;
pub const MIN_PRICE_PER_KWH: f64 = 3.5;
pub const MAX_PRICE_PER_KWH: f64 = 8.5;

// Keeps the ratio finite while the panels are dark.
const MIN_SUPPLY_FACTOR: f64 = 0.1;
const LOG_SENSITIVITY: f64 = 0.1;

const HIGH_DEMAND_ABOVE_KWH: f64 = 4.0;
const MEDIUM_DEMAND_ABOVE_KWH: f64 = 1.5;

impl DemandLevel {
    pub fn from_demand(demand: f64) -> Self {
        if demand > HIGH_DEMAND_ABOVE_KWH {
            Self::High
        } else if demand > MEDIUM_DEMAND_ABOVE_KWH {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Price per kWh for `demand` against the current `production`.
///
/// Grows with the log of the demand/supply ratio and is clamped to
/// `[MIN_PRICE_PER_KWH, MAX_PRICE_PER_KWH]`. Total over any `demand`: a ratio
/// of exactly -1 prices at the floor, anything undefined prices at the cap.
pub fn suggested_price(demand: f64, production: f64) -> f64 {
    let supply_factor = production.max(MIN_SUPPLY_FACTOR);
    let ratio = demand / supply_factor;
    let price = BASE_PRICE_PER_KWH * (1.0 + LOG_SENSITIVITY * ratio.ln_1p());

    tracing::trace!(demand, supply_factor, ratio, price, "raw price");

    if price.is_nan() {
        return MAX_PRICE_PER_KWH;
    }
    round2(price.clamp(MIN_PRICE_PER_KWH, MAX_PRICE_PER_KWH))
}

pub fn price_quote(demand: f64, now: DateTime<Local>) -> PriceQuote {
    let hour = now.hour();

    PriceQuote {
        demand,
        suggested_price_per_kwh: suggested_price(demand, production_at(hour)),
        demand_level: DemandLevel::from_demand(demand),
        is_peak_hour: is_peak_hour(hour),
        timestamp: now,
    }
}
