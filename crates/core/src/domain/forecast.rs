use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub hour: u32,
    pub predicted_demand_kwh: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandForecast {
    pub house_id: Option<String>,
    pub current_hour: u32,
    pub forecast: Vec<ForecastPoint>,
    pub timestamp: DateTime<Local>,
}
