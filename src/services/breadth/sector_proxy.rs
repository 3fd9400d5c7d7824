//! Last-resort tier: approximate breadth from the equal-weight sector basket.
//!
//! The basket is fetched once per request and every metric in this tier
//! reads from that single fetch. When the oscillator is still missing the
//! S&P advance/decline line is fetched alongside the basket for the
//! oscillator/summation proxy.

use crate::constants::{
    HIGH_LOW_WINDOW, MCCLELLAN_FAST_PERIOD, MCCLELLAN_SLOW_PERIOD, MIN_RECORDS_FOR_HIGH_LOW,
    MIN_RECORDS_FOR_MA200, MIN_RECORDS_FOR_MA50, MIN_RECORDS_FOR_MCCLELLAN, NEW_HIGH_TOLERANCE,
    NEW_LOW_TOLERANCE, PROXY_RANGE_WINDOW,
};
use crate::models::indicators::{calculate_sma, ema_spread, trailing_extremes};
use crate::models::{BreadthConfig, BreadthField, BreadthResult, TimeSeries};
use crate::services::ChartClient;
use crate::utils::round_to;
use std::sync::Arc;
use tracing::{debug, info};

/// Percent of the basket above its 50-day and 200-day SMA.
///
/// Instruments with at least 50 observations form a single denominator for
/// both figures. An instrument only counts toward the 200-day figure when it
/// also has 200 observations. Both are `None` when nothing qualifies.
pub fn percent_above_sma(basket: &[Vec<f64>]) -> (Option<f64>, Option<f64>) {
    let mut above_50 = 0usize;
    let mut above_200 = 0usize;
    let mut qualifying = 0usize;

    for closes in basket {
        let (Some(sma_50), Some(&price)) = (calculate_sma(closes, MIN_RECORDS_FOR_MA50), closes.last()) else {
            continue;
        };
        qualifying += 1;
        if price > sma_50 {
            above_50 += 1;
        }
        if calculate_sma(closes, MIN_RECORDS_FOR_MA200).is_some_and(|sma_200| price > sma_200) {
            above_200 += 1;
        }
    }

    if qualifying == 0 {
        return (None, None);
    }

    let pct = |count: usize| round_to(count as f64 / qualifying as f64 * 100.0, 1);
    (Some(pct(above_50)), Some(pct(above_200)))
}

/// Instruments near their 52-week high minus those near their 52-week low
pub fn net_new_highs_lows(basket: &[Vec<f64>]) -> f64 {
    let mut new_highs = 0i64;
    let mut new_lows = 0i64;

    for closes in basket {
        if closes.len() < MIN_RECORDS_FOR_HIGH_LOW {
            continue;
        }
        let (Some(&price), Some((high, low))) = (closes.last(), trailing_extremes(closes, HIGH_LOW_WINDOW)) else {
            continue;
        };

        if price >= high * NEW_HIGH_TOLERANCE {
            new_highs += 1;
        }
        if price <= low * NEW_LOW_TOLERANCE {
            new_lows += 1;
        }
    }

    (new_highs - new_lows) as f64
}

/// Oscillator and summation proxy from the S&P A/D line, scaled by its
/// trailing 60-observation range. `None` below 40 observations or on a flat range.
pub fn oscillator_proxy(spx_ad: &[f64]) -> Option<(f64, f64)> {
    if spx_ad.len() < MIN_RECORDS_FOR_MCCLELLAN {
        return None;
    }

    let spread = ema_spread(spx_ad, MCCLELLAN_FAST_PERIOD, MCCLELLAN_SLOW_PERIOD);
    let oscillator = *spread.last()?;
    let (high, low) = trailing_extremes(spx_ad, PROXY_RANGE_WINDOW)?;
    let range = high - low;

    if range <= 0.0 {
        debug!("S&P A/D range is flat, skipping oscillator proxy");
        return None;
    }

    let summation: f64 = spread.iter().sum();
    Some((
        round_to(oscillator / range * 100.0, 2),
        round_to(summation / range * 100.0, 0),
    ))
}

/// Compute every metric this tier can still contribute to `current`
pub fn sector_values(basket: &[TimeSeries], spx_ad: Option<&TimeSeries>, current: &BreadthResult) -> BreadthResult {
    let closes: Vec<Vec<f64>> = basket.iter().map(|s| s.values()).collect();
    let (pct_above_50dma, pct_above_200dma) = percent_above_sma(&closes);
    let mut result = BreadthResult {
        pct_above_50dma,
        pct_above_200dma,
        ..BreadthResult::default()
    };

    if current.is_missing(BreadthField::NetNewHighsLows) {
        result.net_new_highs_lows = Some(net_new_highs_lows(&closes));
    }

    if current.is_missing(BreadthField::McClellanOscillator) {
        if let Some((oscillator, summation)) = spx_ad.and_then(|s| oscillator_proxy(&s.values())) {
            result.mcclellan_oscillator = Some(oscillator);
            result.mcclellan_summation = Some(summation);
        }
    }

    result
}

pub async fn resolve_sector_proxy(
    client: &Arc<ChartClient>,
    config: &BreadthConfig,
    current: &BreadthResult,
) -> BreadthResult {
    let mut requests: Vec<_> = config
        .sector_symbols
        .iter()
        .map(|symbol| (symbol.clone(), config.sector_range))
        .collect();

    let needs_oscillator = current.is_missing(BreadthField::McClellanOscillator);
    if needs_oscillator {
        requests.push((config.spx_ad_symbol.clone(), config.spx_ad_range));
    }

    let mut series: Vec<TimeSeries> = client
        .fetch_many(&requests)
        .await
        .into_iter()
        .map(|outcome| outcome.into_series())
        .collect();

    let spx_ad = if needs_oscillator { series.pop() } else { None };

    let result = sector_values(&series, spx_ad.as_ref(), current);
    info!(
        basket = series.len(),
        with_history = series.iter().filter(|s| s.len() >= MIN_RECORDS_FOR_MA50).count(),
        pct50 = ?result.pct_above_50dma,
        pct200 = ?result.pct_above_200dma,
        nyhl = ?result.net_new_highs_lows,
        nymo = ?result.mcclellan_oscillator,
        "Sector proxy computed"
    );
    result
}
