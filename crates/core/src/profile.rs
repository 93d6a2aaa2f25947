//! Canned hourly solar production curve, kWh per hour of day.

use crate::time::hours::HOURS_PER_DAY;

pub const HOURLY_PRODUCTION_PROFILE: [f64; HOURS_PER_DAY as usize] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 00-05
    0.1, 0.5, 1.2, 2.5, 3.8, 4.5, // 06-11 sunrise
    5.0, 4.8, 4.2, 3.5, 2.1, 1.0, // 12-17 peak and sunset
    0.2, 0.0, 0.0, 0.0, 0.0, 0.0, // 18-23
];

/// Production for `hour`; hours past 23 wrap.
pub fn production_at(hour: u32) -> f64 {
    HOURLY_PRODUCTION_PROFILE[(hour % HOURS_PER_DAY) as usize]
}
