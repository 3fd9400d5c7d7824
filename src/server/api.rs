use crate::constants::{CACHE_CONTROL_VALUE, VIX_SYMBOL};
use crate::error::{AppError, Result};
use crate::models::{CandleMap, ProxyConfig, RangeHint};
use crate::server::AppState;
use crate::services::{log_api_request, ApiPerformanceMetrics};
use crate::utils::{decode_caret, encode_caret, round_to, split_csv_list};
use axum::{
    extract::{Query, State},
    http::{header::CACHE_CONTROL, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

/// Request header carrying a caller-supplied quote credential
pub const QUOTE_TOKEN_HEADER: &str = "x-finnhub-token";

/// Query parameters for /api/data
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DataQuery {
    /// quotes | candles | vix | breadth
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Comma-separated, `__` stands for `^`
    pub symbols: Option<String>,

    /// Candle range hint, default 1y
    pub range: Option<String>,

    /// Quote credential fallback
    pub fhkey: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Quotes,
    Candles,
    Vix,
    Breadth,
}

impl DataKind {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some("quotes") => Ok(DataKind::Quotes),
            Some("candles") => Ok(DataKind::Candles),
            Some("vix") => Ok(DataKind::Vix),
            Some("breadth") => Ok(DataKind::Breadth),
            _ => Err(AppError::UnknownType),
        }
    }
}

/// Split and decode the `symbols` parameter
pub fn parse_symbols(raw: Option<&str>) -> Vec<String> {
    raw.map(split_csv_list)
        .unwrap_or_default()
        .iter()
        .map(|s| decode_caret(s))
        .collect()
}

/// Server key first, then the request header, then the query parameter
pub fn quote_token(config: &ProxyConfig, headers: &HeaderMap, params: &DataQuery) -> String {
    let from_header = headers
        .get(QUOTE_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string());

    config
        .finnhub_key
        .clone()
        .into_iter()
        .chain(from_header)
        .chain(params.fhkey.clone())
        .find(|token| !token.is_empty())
        .unwrap_or_default()
}

async fn dispatch(
    state: &AppState,
    headers: &HeaderMap,
    params: &DataQuery,
    metrics: &mut ApiPerformanceMetrics,
) -> Result<Value> {
    let kind = DataKind::parse(params.kind.as_deref())?;
    let symbols = parse_symbols(params.symbols.as_deref());
    metrics.symbol_count = symbols.len();

    match kind {
        DataKind::Quotes => {
            if symbols.is_empty() {
                return Ok(json!({}));
            }
            let token = quote_token(&state.config, headers, params);
            if token.is_empty() {
                debug!("No quote credential supplied");
            }
            let quotes = state.quotes.fetch_quotes(&symbols, &token).await;
            Ok(serde_json::to_value(quotes)?)
        }
        DataKind::Candles => {
            if symbols.is_empty() {
                return Ok(json!({}));
            }
            let range = RangeHint::parse_or_default(params.range.as_deref());
            metrics.range = range.to_string();

            let charts = state.charts.fetch_raw_many(&symbols, range).await;
            let candles: CandleMap = symbols
                .iter()
                .map(|symbol| encode_caret(symbol))
                .zip(charts)
                .collect();
            Ok(serde_json::to_value(candles)?)
        }
        DataKind::Vix => {
            let vix = state
                .charts
                .fetch_series(VIX_SYMBOL, RangeHint::FiveDays)
                .await
                .last_value()
                .map(|v| round_to(v, 2));
            Ok(json!({ "vix": vix }))
        }
        DataKind::Breadth => {
            let breadth = state.breadth.resolve().await;
            info!(missing = breadth.missing_fields().len(), "Breadth resolved");
            Ok(serde_json::to_value(breadth)?)
        }
    }
}

/// GET /api/data
#[instrument(skip_all)]
pub async fn data_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DataQuery>,
) -> Response {
    let mut metrics = ApiPerformanceMetrics::new(Utc::now());
    metrics.endpoint = params.kind.clone().unwrap_or_default();

    let response = match dispatch(&state, &headers, &params, &mut metrics).await {
        Ok(body) => {
            metrics.response_size_bytes = body.to_string().len();
            (StatusCode::OK, [(CACHE_CONTROL, CACHE_CONTROL_VALUE)], Json(body)).into_response()
        }
        Err(e) => {
            metrics.fail(e.to_string());
            e.into_response()
        }
    };

    metrics.complete();
    log_api_request(&metrics);
    response
}

/// OPTIONS /api/data
pub async fn options_handler() -> StatusCode {
    StatusCode::OK
}
