use crate::constants::{
    CHART_TIMEOUT_SECS, DEFAULT_CHART_ENDPOINTS, DEFAULT_QUOTE_ENDPOINT, QUOTE_TIMEOUT_SECS,
};
use crate::utils::{env_opt, env_str, env_u16, env_u64, split_csv_list};
use std::time::Duration;

/// Runtime configuration for the proxy, read from the environment.
///
/// | Variable             | Default                          |
/// |----------------------|----------------------------------|
/// | `PORT`               | 3000                             |
/// | `FINNHUB_KEY`        | unset (header/query fallback)    |
/// | `CHART_ENDPOINTS`    | query1 then query2 Yahoo mirrors |
/// | `QUOTE_ENDPOINT`     | Finnhub `/api/v1/quote`          |
/// | `CHART_TIMEOUT_SECS` | 8                                |
/// | `QUOTE_TIMEOUT_SECS` | 6                                |
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,

    /// Server-side quote credential. Takes precedence over request-supplied keys.
    pub finnhub_key: Option<String>,

    /// Candle provider mirrors, tried in order
    pub chart_endpoints: Vec<String>,

    pub quote_endpoint: String,

    pub chart_timeout: Duration,

    pub quote_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            finnhub_key: None,
            chart_endpoints: DEFAULT_CHART_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            quote_endpoint: DEFAULT_QUOTE_ENDPOINT.to_string(),
            chart_timeout: Duration::from_secs(CHART_TIMEOUT_SECS),
            quote_timeout: Duration::from_secs(QUOTE_TIMEOUT_SECS),
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let chart_endpoints = env_opt("CHART_ENDPOINTS")
            .map(|raw| split_csv_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.chart_endpoints);

        Self {
            port: env_u16("PORT", defaults.port),
            finnhub_key: env_opt("FINNHUB_KEY"),
            chart_endpoints: chart_endpoints
                .into_iter()
                .map(|e| e.trim_end_matches('/').to_string())
                .collect(),
            quote_endpoint: env_str("QUOTE_ENDPOINT", &defaults.quote_endpoint),
            chart_timeout: Duration::from_secs(env_u64("CHART_TIMEOUT_SECS", CHART_TIMEOUT_SECS)),
            quote_timeout: Duration::from_secs(env_u64("QUOTE_TIMEOUT_SECS", QUOTE_TIMEOUT_SECS)),
        }
    }

    /// Override the listening port (CLI flag)
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.chart_endpoints.len(), 2);
        assert!(config.chart_endpoints[0].contains("query1"));
        assert_eq!(config.chart_timeout, Duration::from_secs(8));
        assert_eq!(config.quote_timeout, Duration::from_secs(6));
        assert!(config.finnhub_key.is_none());
    }

    #[test]
    fn test_with_port_override() {
        assert_eq!(ProxyConfig::default().with_port(Some(8080)).port, 8080);
        assert_eq!(ProxyConfig::default().with_port(None).port, 3000);
    }
}
