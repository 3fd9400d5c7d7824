//! Upstream symbols and breadth thresholds
//!
//! ## Direct breadth symbols
//!
//! | Symbol     | Metric                       | Range | Precision |
//! |------------|------------------------------|-------|-----------|
//! | `^NYMO`    | McClellan Oscillator         | 3mo   | 2 dp      |
//! | `^NASI`    | McClellan Summation          | 3mo   | integer   |
//! | `^NYHL`    | Net New Highs/Lows (NYSE)    | 5d    | integer   |
//! | `^NYA50R`  | % NYSE above 50-day SMA      | 3mo   | 1 dp      |
//! | `^NYA200R` | % NYSE above 200-day SMA     | 3mo   | 1 dp      |
//!
//! ## Sector basket
//!
//! Eleven equal-weight sector ETFs used when the direct symbols and the
//! advance/decline derivation come back empty.

/// McClellan Oscillator index
pub const NYMO_SYMBOL: &str = "^NYMO";

/// McClellan Summation index
pub const NASI_SYMBOL: &str = "^NASI";

/// NYSE net new highs minus new lows
pub const NYHL_SYMBOL: &str = "^NYHL";

/// Percent of NYSE stocks above their 50-day SMA
pub const NYA50R_SYMBOL: &str = "^NYA50R";

/// Percent of NYSE stocks above their 200-day SMA
pub const NYA200R_SYMBOL: &str = "^NYA200R";

/// NYSE advancing issues (daily count)
pub const NYSE_ADVANCES_SYMBOL: &str = "^NYADV";

/// NYSE declining issues (daily count)
pub const NYSE_DECLINES_SYMBOL: &str = "^NYDEC";

/// S&P 500 advance/decline line, used for the oscillator proxy
pub const SPX_AD_SYMBOL: &str = "^SPXAD";

/// CBOE volatility index
pub const VIX_SYMBOL: &str = "^VIX";

/// Equal-weight sector ETFs
pub const SECTOR_SYMBOLS: &[&str] = &[
    "RSPG", "RSPN", "RSPU", "RSPH", "RSPR", "RSPM", "RSPS", "RSPC", "RSPD", "RSPT", "RSPF",
];

/// McClellan fast EMA period
pub const MCCLELLAN_FAST_PERIOD: usize = 19;

/// McClellan slow EMA period
pub const MCCLELLAN_SLOW_PERIOD: usize = 39;

/// Minimum observations for any McClellan computation (slow period + 1)
pub const MIN_RECORDS_FOR_MCCLELLAN: usize = MCCLELLAN_SLOW_PERIOD + 1;

/// Trailing window used to normalise the A/D oscillator proxy
pub const PROXY_RANGE_WINDOW: usize = 60;

/// Minimum number of records required to calculate MA50
pub const MIN_RECORDS_FOR_MA50: usize = 50;

/// Minimum number of records required to calculate MA200
pub const MIN_RECORDS_FOR_MA200: usize = 200;

/// Minimum history for the new-highs/new-lows sector count
pub const MIN_RECORDS_FOR_HIGH_LOW: usize = 20;

/// Trailing window for the 52-week high/low (trading days)
pub const HIGH_LOW_WINDOW: usize = 252;

/// Price within 2% of the 52-week high counts as a new high
pub const NEW_HIGH_TOLERANCE: f64 = 0.98;

/// Price within 2% of the 52-week low counts as a new low
pub const NEW_LOW_TOLERANCE: f64 = 1.02;

/// Default candle provider mirrors, tried in order
pub const DEFAULT_CHART_ENDPOINTS: &[&str] = &[
    "https://query1.finance.yahoo.com/v8/finance/chart",
    "https://query2.finance.yahoo.com/v8/finance/chart",
];

/// Default quote provider endpoint
pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://finnhub.io/api/v1/quote";

/// Per-attempt timeout for candle requests
pub const CHART_TIMEOUT_SECS: u64 = 8;

/// Per-call timeout for quote requests
pub const QUOTE_TIMEOUT_SECS: u64 = 6;

/// Cache-Control value for successful responses (shared cache)
pub const CACHE_CONTROL_VALUE: &str = "s-maxage=300, stale-while-revalidate=60";

/// Candle symbols travel with `^` escaped as `__`
pub const CARET_ESCAPE: &str = "__";
