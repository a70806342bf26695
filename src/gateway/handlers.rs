use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::IntoParams;

use super::service::GatewayError;
use crate::error::ErrorResponse;
use crate::upstream::Resource;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityQuery {
    /// City name, defaults to the configured city when absent
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "gateway",
    responses((status = 200, description = "Gateway is running"))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Relay realtime weather for a city
///
/// GET /api/weather?city=福清
#[utoipa::path(
    get,
    path = "/api/weather",
    tag = "proxy",
    params(CityQuery),
    responses(
        (status = 200, description = "Upstream realtime payload, unchanged"),
        (status = 500, description = "Upstream unreachable, timed out or returned non-JSON", body = ErrorResponse)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Value>, GatewayError> {
    relay(&state, Resource::Realtime, query).await
}

/// Relay the multi-day forecast for a city
///
/// GET /api/forecast?city=福清
#[utoipa::path(
    get,
    path = "/api/forecast",
    tag = "proxy",
    params(CityQuery),
    responses(
        (status = 200, description = "Upstream forecast payload, unchanged"),
        (status = 500, description = "Upstream unreachable, timed out or returned non-JSON", body = ErrorResponse)
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Value>, GatewayError> {
    relay(&state, Resource::Forecast, query).await
}

async fn relay(
    state: &AppState,
    resource: Resource,
    query: CityQuery,
) -> Result<Json<Value>, GatewayError> {
    let city = query
        .city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| state.config.default_city.clone());

    let data = state.proxy.relay(resource, &city).await?;
    Ok(Json(data))
}
