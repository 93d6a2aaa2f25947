use std::ops::RangeInclusive;

pub const HOURS_PER_DAY: u32 = 24;

// Evening peak, local wall-clock hours.
pub const PEAK_HOURS: RangeInclusive<u32> = 18..=22;

pub fn is_peak_hour(hour: u32) -> bool {
    PEAK_HOURS.contains(&hour)
}

/// The `count` hours following `from`, wrapping past midnight.
pub fn next_hours(from: u32, count: u32) -> impl Iterator<Item = u32> {
    (1..=count).map(move |i| (from + i) % HOURS_PER_DAY)
}
