use chrono::{DateTime, Local, Timelike};
use rand::Rng;
use std::f64::consts::PI;

use crate::domain::forecast::{DemandForecast, ForecastPoint};
use crate::round2;
use crate::time::next_hours;

pub const FORECAST_HORIZON_HOURS: u32 = 6;

pub const MIN_PREDICTED_DEMAND_KWH: f64 = 0.2;
const DEMAND_NOISE_KWH: f64 = 0.3;

const BASE_CONFIDENCE: f64 = 0.85;
const CONFIDENCE_JITTER_MIN: f64 = 0.01;
const CONFIDENCE_JITTER_MAX: f64 = 0.10;

/// Noise-free household demand for `hour`. A diurnal sine that bottoms out
/// around 12:00 and tops out around 00:00, roughly the inverse of solar output.
pub fn base_demand(hour: u32) -> f64 {
    let phase = (f64::from(hour) - 18.0) * PI / 12.0;
    1.5 + (0.5 * phase.sin() + 1.0)
}

pub fn forecast_point<R: Rng>(hour: u32, rng: &mut R) -> ForecastPoint {
    let noisy = base_demand(hour) + rng.gen_range(-DEMAND_NOISE_KWH..=DEMAND_NOISE_KWH);
    let predicted = noisy.max(MIN_PREDICTED_DEMAND_KWH);
    let confidence =
        BASE_CONFIDENCE + rng.gen_range(CONFIDENCE_JITTER_MIN..=CONFIDENCE_JITTER_MAX);

    ForecastPoint {
        hour,
        predicted_demand_kwh: round2(predicted),
        confidence: round2(confidence),
    }
}

pub fn demand_forecast<R: Rng>(
    now: DateTime<Local>,
    house_id: Option<String>,
    rng: &mut R,
) -> DemandForecast {
    let current_hour = now.hour();
    let forecast = next_hours(current_hour, FORECAST_HORIZON_HOURS)
        .map(|hour| forecast_point(hour, rng))
        .collect();

    DemandForecast {
        house_id,
        current_hour,
        forecast,
        timestamp: now,
    }
}
