use crate::constants::{HISTORY_LIMIT_DEFAULT, HISTORY_LIMIT_MAX, HISTORY_LIMIT_MIN};
use crate::error::AppError;
use crate::models::MarketKey;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub market: Option<String>,
    pub crop: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn app_error_response(err: AppError) -> Response {
    match err {
        AppError::InvalidInput(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        other => {
            warn!("request failed: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Clamp a requested history window to the allowed bounds
fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(HISTORY_LIMIT_DEFAULT)
        .clamp(HISTORY_LIMIT_MIN, HISTORY_LIMIT_MAX)
}

/// GET /api/crops/{market} - crop list for a market
///
/// Unknown markets answer with an empty list, never an error; callers
/// validate membership separately.
pub async fn crops_handler(
    State(app_state): State<AppState>,
    Path(market): Path<String>,
) -> impl IntoResponse {
    let crops: Vec<&str> = match MarketKey::parse(&market) {
        Some(key) => app_state.resolver.catalog().list_crops(key).to_vec(),
        None => Vec::new(),
    };
    Json(json!({ "market": market, "crops": crops }))
}

/// GET /api/history/{market}/{crop}?limit=30 - windowed archive series
pub async fn history_handler(
    State(app_state): State<AppState>,
    Path((market, crop)): Path<(String, String)>,
    Query(params): Query<HistoryQuery>,
) -> Response {
    let Some(key) = MarketKey::parse(&market) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid market");
    };
    if !app_state.resolver.catalog().is_valid_crop(key, &crop) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid crop");
    }
    let limit = clamp_limit(params.limit);
    debug!("history request: {}/{} limit={}", key, crop, limit);
    match app_state.resolver.history(key, &crop, limit) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => app_error_response(e),
    }
}

/// GET /api/prices/live - current prices, live or archive-derived.
/// Never hard-fails: the resolver degrades internally.
pub async fn live_prices_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let quotes = app_state.resolver.live_prices().await;
    Json(quotes)
}

/// GET /api/prices?market=&crop= - latest price plus recent history,
/// alias-tolerant market and case-tolerant crop
pub async fn prices_handler(
    State(app_state): State<AppState>,
    Query(params): Query<PriceQuery>,
) -> Response {
    let (Some(market), Some(crop)) = (
        params.market.filter(|m| !m.trim().is_empty()),
        params.crop.filter(|c| !c.trim().is_empty()),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "market and crop are required");
    };
    match app_state
        .resolver
        .resolve_query(&market, &crop, HISTORY_LIMIT_DEFAULT)
    {
        Ok(resolved) => Json(resolved).into_response(),
        Err(e) => app_error_response(e),
    }
}

/// GET /api/prices/anchor?market=&crop= - reference price for a
/// forecast request. A missing anchor is a 200 with a null price.
pub async fn anchor_handler(
    State(app_state): State<AppState>,
    Query(params): Query<PriceQuery>,
) -> Response {
    let (Some(market), Some(crop)) = (
        params.market.filter(|m| !m.trim().is_empty()),
        params.crop.filter(|c| !c.trim().is_empty()),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "market and crop are required");
    };
    let price = match MarketKey::parse(&market) {
        Some(key) => app_state.resolver.anchor_price(key, &crop).await,
        None => None,
    };
    Json(json!({ "market": market, "crop": crop, "price": price })).into_response()
}

/// GET /health - basic liveness probe
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
