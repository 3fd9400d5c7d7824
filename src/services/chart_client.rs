//! Historical candle client (Yahoo v8 chart API).
//!
//! Every request walks the configured mirror list in order. Transport errors,
//! timeouts, bad statuses and payloads without `chart.result[0]` all move on
//! to the next mirror. Exhausting the list is not an error for callers of
//! [`ChartClient::fetch_series`]: they get an empty series.

use crate::error::{Error, Result};
use crate::models::{FetchOutcome, ProxyConfig, RangeHint, RawChart, TimeSeries};
use crate::services::transport::{join_settled, HttpTransport};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteData>>,
}

// Closes stay as raw JSON so a stray string or bool degrades to a null
// instead of failing the whole payload.
#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Option<Vec<Value>>,
}

pub struct ChartClient {
    transport: Arc<dyn HttpTransport>,
    endpoints: Vec<String>,
    timeout: Duration,
}

impl ChartClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Vec<String>, timeout: Duration) -> Self {
        Self {
            transport,
            endpoints,
            timeout,
        }
    }

    pub fn from_config(config: &ProxyConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, config.chart_endpoints.clone(), config.chart_timeout)
    }

    /// `{endpoint}/{symbol}?range=..&interval=1d&includePrePost=false`
    pub fn chart_url(endpoint: &str, symbol: &str, range: RangeHint) -> Result<String> {
        let mut url = reqwest::Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("Invalid chart endpoint '{}': {}", endpoint, e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Chart endpoint cannot be a base: '{}'", endpoint)))?
            .pop_if_empty()
            .push(symbol);

        url.query_pairs_mut()
            .append_pair("range", range.as_str())
            .append_pair("interval", range.interval())
            .append_pair("includePrePost", "false");

        Ok(url.into())
    }

    /// Extract closes/timestamps from a chart payload
    fn parse_chart(value: Value) -> Result<RawChart> {
        let response: ChartResponse = serde_json::from_value(value)
            .map_err(|e| Error::Parse(format!("Malformed chart payload: {}", e)))?;

        let data = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::NoData("chart.result is empty".to_string()))?;

        let closes = data
            .indicators
            .and_then(|i| i.quote)
            .and_then(|q| q.into_iter().next())
            .and_then(|q| q.close)
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.as_f64())
            .collect();

        Ok(RawChart::new(closes, data.timestamp.unwrap_or_default()))
    }

    async fn fetch_from(&self, endpoint: &str, symbol: &str, range: RangeHint) -> Result<RawChart> {
        let url = Self::chart_url(endpoint, symbol, range)?;

        let value = tokio::time::timeout(self.timeout, self.transport.get_json(&url))
            .await
            .map_err(|_| Error::Network(format!("Timed out after {:?}", self.timeout)))??;

        Self::parse_chart(value)
    }

    /// Raw chart from the first mirror that answers with a result.
    /// Returns the last mirror's error when all of them fail.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn fetch_raw(&self, symbol: &str, range: RangeHint) -> Result<RawChart> {
        let mut last_error = Error::Config("No chart endpoints configured".to_string());

        for (attempt, endpoint) in self.endpoints.iter().enumerate() {
            match self.fetch_from(endpoint, symbol, range).await {
                Ok(chart) => {
                    debug!(
                        symbol,
                        endpoint = %endpoint,
                        points = chart.closes.len(),
                        "Chart fetched"
                    );
                    return Ok(chart);
                }
                Err(e) => {
                    debug!(
                        symbol,
                        endpoint = %endpoint,
                        attempt = attempt + 1,
                        error = %e,
                        "Chart attempt failed, trying next endpoint"
                    );
                    last_error = e;
                }
            }
        }

        warn!(symbol, error = %last_error, "All chart endpoints failed");
        Err(last_error)
    }

    pub async fn fetch_outcome(&self, symbol: &str, range: RangeHint) -> FetchOutcome {
        match self.fetch_raw(symbol, range).await {
            Ok(chart) => FetchOutcome::Series(chart.clean()),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    /// Cleaned series; empty when every endpoint failed
    pub async fn fetch_series(&self, symbol: &str, range: RangeHint) -> TimeSeries {
        self.fetch_outcome(symbol, range).await.into_series()
    }

    /// Fetch every `(symbol, range)` concurrently. Output order matches input order.
    pub async fn fetch_many(self: &Arc<Self>, requests: &[(String, RangeHint)]) -> Vec<FetchOutcome> {
        let handles = requests
            .iter()
            .map(|(symbol, range)| {
                let client = Arc::clone(self);
                let symbol = symbol.clone();
                let range = *range;
                tokio::spawn(async move { client.fetch_outcome(&symbol, range).await })
            })
            .collect();

        join_settled(handles, |i, e| {
            warn!(symbol = %requests[i].0, error = %e, "Chart task did not complete");
            FetchOutcome::Failed(format!("task failed: {}", e))
        })
        .await
    }

    /// Raw charts for every symbol over one range; failures become empty charts.
    pub async fn fetch_raw_many(self: &Arc<Self>, symbols: &[String], range: RangeHint) -> Vec<RawChart> {
        let handles = symbols
            .iter()
            .map(|symbol| {
                let client = Arc::clone(self);
                let symbol = symbol.clone();
                tokio::spawn(async move { client.fetch_raw(&symbol, range).await.unwrap_or_default() })
            })
            .collect();

        join_settled(handles, |i, e| {
            warn!(symbol = %symbols[i], error = %e, "Chart task did not complete");
            RawChart::default()
        })
        .await
    }
}
