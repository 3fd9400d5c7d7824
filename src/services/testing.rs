//! Fake upstream transport for unit tests.

use crate::error::{Error, Result};
use crate::services::transport::HttpTransport;
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum FakeResponse {
    Json(Value),
    Error,
    /// Never answers within any sane timeout
    Hang,
}

#[derive(Debug, Clone)]
struct Route {
    host: Option<String>,
    symbol: String,
    response: FakeResponse,
}

/// Serves canned responses keyed by symbol (and optionally host), records every URL.
/// Unrouted requests fail like a transport error.
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart closes for `symbol` on every endpoint
    pub fn with_chart(self, symbol: &str, closes: &[Option<f64>]) -> Self {
        self.with_response(None, symbol, FakeResponse::Json(chart_json(closes)))
    }

    /// Chart built from plain values
    pub fn with_values(self, symbol: &str, values: &[f64]) -> Self {
        let closes: Vec<Option<f64>> = values.iter().map(|v| Some(*v)).collect();
        self.with_chart(symbol, &closes)
    }

    pub fn with_response(mut self, host: Option<&str>, symbol: &str, response: FakeResponse) -> Self {
        self.routes.push(Route {
            host: host.map(|h| h.to_string()),
            symbol: symbol.to_string(),
            response,
        });
        self
    }

    /// Every requested URL, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Symbols requested, in request order (duplicates kept)
    pub fn requested_symbols(&self) -> Vec<String> {
        self.requests().iter().filter_map(|u| symbol_of(u)).collect()
    }

    pub fn request_count(&self, symbol: &str) -> usize {
        self.requested_symbols().iter().filter(|s| *s == symbol).count()
    }

    fn find_route(&self, url: &str) -> Option<&Route> {
        let symbol = symbol_of(url)?;
        let host = reqwest::Url::parse(url).ok()?.host_str()?.to_string();

        self.routes.iter().find(|route| {
            route.symbol == symbol && route.host.as_deref().map_or(true, |h| host.contains(h))
        })
    }
}

impl HttpTransport for FakeTransport {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(url.to_string());
            }

            match self.find_route(url).map(|r| r.response.clone()) {
                Some(FakeResponse::Json(value)) => Ok(value),
                Some(FakeResponse::Hang) => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(Error::Network("hung".to_string()))
                }
                Some(FakeResponse::Error) | None => {
                    Err(Error::Network(format!("no fake route for {}", url)))
                }
            }
        })
    }
}

/// Quote URLs carry `symbol=`; chart URLs end with the symbol path segment.
fn symbol_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;

    if let Some((_, symbol)) = parsed.query_pairs().find(|(k, _)| k == "symbol") {
        return Some(symbol.into_owned());
    }

    parsed
        .path_segments()?
        .last()
        .map(|segment| segment.replace("%5E", "^").replace("%5e", "^"))
}

/// Candle provider payload with one-day spaced timestamps
pub fn chart_json(closes: &[Option<f64>]) -> Value {
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| 1_700_000_000 + i * 86_400).collect();
    json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

/// `len` values rising linearly from `start` by `step`
pub fn ramp(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}
