use axum::{extract::Query, routing::get, Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridx_core::config::Settings;
use gridx_core::domain::forecast::DemandForecast;
use gridx_core::domain::price::PriceQuote;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    if let Err(e) = serve(&settings).await {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "api terminated");
        return Err(e);
    }

    Ok(())
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, service = gridx_core::SERVICE_NAME, "api listening");

    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/forecast", get(get_forecast))
        .route("/api/price", get(get_price))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
struct ServiceStatus {
    status: &'static str,
    service: &'static str,
}

async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "online",
        service: gridx_core::SERVICE_NAME,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastParams {
    house_id: Option<String>,
}

async fn get_forecast(Query(params): Query<ForecastParams>) -> Json<DemandForecast> {
    let forecast = gridx_core::forecast::demand_forecast(
        Local::now(),
        params.house_id,
        &mut rand::thread_rng(),
    );

    tracing::debug!(
        house_id = ?forecast.house_id,
        current_hour = forecast.current_hour,
        "demand forecast generated"
    );

    Json(forecast)
}

#[derive(Debug, Deserialize)]
struct PriceParams {
    demand: f64,
}

async fn get_price(Query(params): Query<PriceParams>) -> Json<PriceQuote> {
    let quote = gridx_core::pricing::price_quote(params.demand, Local::now());

    tracing::debug!(
        demand = quote.demand,
        price = quote.suggested_price_per_kwh,
        level = ?quote.demand_level,
        peak = quote.is_peak_hour,
        "price suggested"
    );

    Json(quote)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, Option<Value>) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).ok())
    }

    fn assert_rfc3339(value: &Value) {
        let raw = value.as_str().unwrap();
        assert!(
            chrono::DateTime::parse_from_rfc3339(raw).is_ok(),
            "timestamp {raw:?} is not RFC 3339"
        );
    }

    #[tokio::test]
    async fn root_reports_online() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["status"], "online");
        assert_eq!(body["service"], "GridX AI Forecasting");
    }

    #[tokio::test]
    async fn root_ignores_query_params() {
        let (status, body) = get_json("/?anything=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["status"], "online");
    }

    #[tokio::test]
    async fn forecast_returns_six_bounded_points() {
        let (status, body) = get_json("/api/forecast?houseId=H-001").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();

        assert_eq!(body["houseId"], "H-001");
        let current = body["currentHour"].as_u64().unwrap();
        assert!(current < 24);
        assert_rfc3339(&body["timestamp"]);

        let points = body["forecast"].as_array().unwrap();
        assert_eq!(points.len(), 6);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p["hour"].as_u64().unwrap(), (current + i as u64 + 1) % 24);
            assert!(p["predictedDemandKwh"].as_f64().unwrap() >= 0.2);
            let c = p["confidence"].as_f64().unwrap();
            assert!(c > 0.85 && c <= 0.95, "confidence {c}");
        }
    }

    #[tokio::test]
    async fn forecast_without_house_id_echoes_null() {
        let (status, body) = get_json("/api/forecast").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert!(body["houseId"].is_null());
        assert_eq!(body["forecast"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn price_is_bounded_and_classified() {
        for (demand, level) in [
            ("0", "Low"),
            ("1.5", "Low"),
            ("1.50001", "Medium"),
            ("4.0", "Medium"),
            ("4.00001", "High"),
            ("250000", "High"),
        ] {
            let (status, body) = get_json(&format!("/api/price?demand={demand}")).await;
            assert_eq!(status, StatusCode::OK);
            let body = body.unwrap();
            let price = body["suggestedPricePerKwh"].as_f64().unwrap();
            assert!((3.5..=8.5).contains(&price), "demand={demand} price={price}");
            assert_eq!(body["demandLevel"], level, "demand={demand}");
            assert!(body["isPeakHour"].is_boolean());
            assert_rfc3339(&body["timestamp"]);
        }
    }

    #[tokio::test]
    async fn price_requires_numeric_demand() {
        let (status, _) = get_json("/api/price").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/api/price?demand=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn price_accepts_negative_and_non_finite_demand() {
        let (status, body) = get_json("/api/price?demand=-0.05").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["demand"], -0.05);
        assert_eq!(body["demandLevel"], "Low");
        assert_rfc3339(&body["timestamp"]);
        let price = body["suggestedPricePerKwh"].as_f64().unwrap();
        assert!((3.5..=8.5).contains(&price), "price={price}");

        // Below a ratio of -1 at any hour's supply.
        let (status, body) = get_json("/api/price?demand=-50").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["suggestedPricePerKwh"], 8.5);

        let (status, body) = get_json("/api/price?demand=NaN").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["suggestedPricePerKwh"], 8.5);
        assert_eq!(body["demandLevel"], "Low");
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let req = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
