use crate::error::{Error, Result};
use crate::models::{ProxyConfig, Quote, QuoteMap, QuotePayload};
use crate::services::transport::{join_settled, HttpTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Real-time quote client (Finnhub `/quote`)
pub struct QuoteClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    timeout: Duration,
}

impl QuoteClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: String, timeout: Duration) -> Self {
        Self {
            transport,
            endpoint,
            timeout,
        }
    }

    pub fn from_config(config: &ProxyConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, config.quote_endpoint.clone(), config.quote_timeout)
    }

    fn quote_url(&self, symbol: &str, token: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(&self.endpoint, &[("symbol", symbol), ("token", token)])
            .map_err(|e| Error::Config(format!("Invalid quote endpoint '{}': {}", self.endpoint, e)))?;
        Ok(url.into())
    }

    pub async fn fetch_quote(&self, symbol: &str, token: &str) -> Result<Quote> {
        let url = self.quote_url(symbol, token)?;

        let value = tokio::time::timeout(self.timeout, self.transport.get_json(&url))
            .await
            .map_err(|_| Error::Network(format!("Quote timed out after {:?}", self.timeout)))??;

        let payload: QuotePayload = serde_json::from_value(value)
            .map_err(|e| Error::Parse(format!("Malformed quote payload: {}", e)))?;

        debug!(symbol, price = ?payload.c, "Quote fetched");
        Ok(Quote::from_payload(symbol, payload))
    }

    /// Fetch all quotes concurrently. Failed symbols are left out of the map,
    /// including non-2xx replies such as a 429 rate limit.
    pub async fn fetch_quotes(self: &Arc<Self>, symbols: &[String], token: &str) -> QuoteMap {
        let handles = symbols
            .iter()
            .map(|symbol| {
                let client = Arc::clone(self);
                let symbol = symbol.clone();
                let token = token.to_string();
                tokio::spawn(async move { client.fetch_quote(&symbol, &token).await })
            })
            .collect();

        let results = join_settled(handles, |_, e| Err(Error::Other(format!("task failed: {}", e)))).await;

        let mut quotes = QuoteMap::new();
        for (symbol, result) in symbols.iter().zip(results) {
            match result {
                Ok(quote) => {
                    quotes.insert(symbol.clone(), quote);
                }
                Err(e) => warn!(symbol = %symbol, error = %e, "Quote fetch failed"),
            }
        }

        info!(requested = symbols.len(), returned = quotes.len(), "Quotes fetched");
        quotes
    }
}
