pub mod hours;

pub use hours::{is_peak_hour, next_hours};
