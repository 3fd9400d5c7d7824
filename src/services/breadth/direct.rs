//! First tier: read each indicator straight from its published symbol.

use crate::models::{BreadthResult, DirectIndicator, TimeSeries};
use crate::services::ChartClient;
use crate::utils::round_to;
use std::sync::Arc;
use tracing::debug;

/// Last cleaned value of each series, rounded to the indicator's precision
pub fn direct_values(indicators: &[DirectIndicator], series: &[TimeSeries]) -> BreadthResult {
    let mut result = BreadthResult::default();

    for (indicator, series) in indicators.iter().zip(series) {
        let value = series.last_value().map(|v| round_to(v, indicator.decimals));
        if value.is_none() {
            debug!(symbol = %indicator.symbol, field = indicator.field.as_str(), "No direct value");
        }
        result.set(indicator.field, value);
    }

    result
}

/// Fetch all direct symbols concurrently
pub async fn resolve_direct(client: &Arc<ChartClient>, indicators: &[DirectIndicator]) -> BreadthResult {
    let requests: Vec<_> = indicators
        .iter()
        .map(|indicator| (indicator.symbol.clone(), indicator.range))
        .collect();

    let series: Vec<TimeSeries> = client
        .fetch_many(&requests)
        .await
        .into_iter()
        .map(|outcome| outcome.into_series())
        .collect();

    direct_values(indicators, &series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreadthConfig, BreadthField};

    #[test]
    fn test_direct_values_rounding_per_metric() {
        let config = BreadthConfig::default();
        let series = vec![
            TimeSeries::from_values(&[1.0, 3.2149]),
            TimeSeries::from_values(&[149.6]),
            TimeSeries::from_values(&[-12.4]),
            TimeSeries::from_values(&[55.55]),
            TimeSeries::empty(),
        ];

        let result = direct_values(&config.direct, &series);
        assert_eq!(result.get(BreadthField::McClellanOscillator), Some(3.21));
        assert_eq!(result.get(BreadthField::McClellanSummation), Some(150.0));
        assert_eq!(result.get(BreadthField::NetNewHighsLows), Some(-12.0));
        assert_eq!(result.get(BreadthField::PctAbove50Dma), Some(55.6));
        assert_eq!(result.get(BreadthField::PctAbove200Dma), None);
    }
}
