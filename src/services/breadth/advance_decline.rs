//! Second tier: McClellan Oscillator/Summation from NYSE advance and decline counts.
//!
//! The summation accumulates from zero over the fetched window. There is no
//! historical base offset, so absolute levels differ from published NASI.

use crate::constants::{MCCLELLAN_FAST_PERIOD, MCCLELLAN_SLOW_PERIOD, MIN_RECORDS_FOR_MCCLELLAN};
use crate::models::indicators::ema_spread;
use crate::models::{BreadthConfig, BreadthResult};
use crate::services::ChartClient;
use crate::utils::round_to;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McClellanReading {
    pub oscillator: f64,
    pub summation: f64,
}

/// Net advances over the trailing overlap of both series
pub fn aligned_net_advances(advances: &[f64], declines: &[f64]) -> Vec<f64> {
    let len = advances.len().min(declines.len());
    let advances = &advances[advances.len() - len..];
    let declines = &declines[declines.len() - len..];

    advances.iter().zip(declines).map(|(a, d)| a - d).collect()
}

/// `None` unless both series carry at least 40 observations
pub fn mcclellan_from_counts(advances: &[f64], declines: &[f64]) -> Option<McClellanReading> {
    if advances.len() < MIN_RECORDS_FOR_MCCLELLAN || declines.len() < MIN_RECORDS_FOR_MCCLELLAN {
        debug!(
            advances = advances.len(),
            declines = declines.len(),
            required = MIN_RECORDS_FOR_MCCLELLAN,
            "Not enough A/D history"
        );
        return None;
    }

    let net = aligned_net_advances(advances, declines);
    let spread = ema_spread(&net, MCCLELLAN_FAST_PERIOD, MCCLELLAN_SLOW_PERIOD);
    let oscillator = *spread.last()?;
    let summation: f64 = spread.iter().sum();

    Some(McClellanReading {
        oscillator: round_to(oscillator, 2),
        summation: round_to(summation, 0),
    })
}

pub async fn resolve_advance_decline(client: &Arc<ChartClient>, config: &BreadthConfig) -> BreadthResult {
    let requests = vec![
        (config.advances_symbol.clone(), config.advance_decline_range),
        (config.declines_symbol.clone(), config.advance_decline_range),
    ];

    let mut outcomes = client.fetch_many(&requests).await.into_iter();
    let advances = outcomes.next().map(|o| o.into_series().values()).unwrap_or_default();
    let declines = outcomes.next().map(|o| o.into_series().values()).unwrap_or_default();

    match mcclellan_from_counts(&advances, &declines) {
        Some(reading) => {
            info!(
                oscillator = reading.oscillator,
                summation = reading.summation,
                points = advances.len().min(declines.len()),
                "McClellan derived from advance/decline counts"
            );
            BreadthResult {
                mcclellan_oscillator: Some(reading.oscillator),
                mcclellan_summation: Some(reading.summation),
                ..BreadthResult::default()
            }
        }
        None => BreadthResult::default(),
    }
}
