use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub demand: f64,
    pub suggested_price_per_kwh: f64,
    pub demand_level: DemandLevel,
    pub is_peak_hour: bool,
    pub timestamp: DateTime<Local>,
}
