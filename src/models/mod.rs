mod range;
mod time_series;
mod quote;
mod proxy_config;
pub mod breadth;
pub mod indicators;

pub use breadth::{BreadthConfig, BreadthField, BreadthResult, DirectIndicator};
pub use proxy_config::ProxyConfig;
pub use quote::{Quote, QuotePayload};
pub use range::RangeHint;
pub use time_series::{FetchOutcome, Observation, RawChart, TimeSeries};

use std::collections::BTreeMap;

/// Candles response (escaped symbol -> raw chart)
pub type CandleMap = BTreeMap<String, RawChart>;

/// Quotes response (symbol -> quote)
pub type QuoteMap = BTreeMap<String, Quote>;
