//! Market breadth resolution.
//!
//! Tiers run in order against a shared partial [`BreadthResult`]. A tier only
//! runs when it can still fill something, and it never overwrites a field an
//! earlier tier already produced.

pub mod advance_decline;
pub mod direct;
pub mod sector_proxy;

use crate::models::{BreadthConfig, BreadthField, BreadthResult};
use crate::services::ChartClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

pub use advance_decline::{mcclellan_from_counts, resolve_advance_decline, McClellanReading};
pub use direct::resolve_direct;
pub use sector_proxy::resolve_sector_proxy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreadthTier {
    /// Published breadth symbols
    Direct,
    /// McClellan from NYSE advance/decline counts
    AdvanceDecline,
    /// Equal-weight sector basket and S&P A/D line
    SectorProxy,
}

impl BreadthTier {
    pub fn default_order() -> Vec<BreadthTier> {
        vec![BreadthTier::Direct, BreadthTier::AdvanceDecline, BreadthTier::SectorProxy]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BreadthTier::Direct => "direct",
            BreadthTier::AdvanceDecline => "advance_decline",
            BreadthTier::SectorProxy => "sector_proxy",
        }
    }

    /// Whether this tier can still contribute to `current`
    pub fn is_needed(&self, current: &BreadthResult) -> bool {
        match self {
            BreadthTier::Direct => !current.is_complete(),
            BreadthTier::AdvanceDecline => current.is_missing(BreadthField::McClellanOscillator),
            // A missing summation alone is not enough to pull the basket
            BreadthTier::SectorProxy => [
                BreadthField::McClellanOscillator,
                BreadthField::NetNewHighsLows,
                BreadthField::PctAbove50Dma,
                BreadthField::PctAbove200Dma,
            ]
            .into_iter()
            .any(|field| current.is_missing(field)),
        }
    }
}

pub struct BreadthAggregator {
    client: Arc<ChartClient>,
    config: BreadthConfig,
    tiers: Vec<BreadthTier>,
}

impl BreadthAggregator {
    pub fn new(client: Arc<ChartClient>, config: BreadthConfig) -> Self {
        Self {
            client,
            config,
            tiers: BreadthTier::default_order(),
        }
    }

    pub fn with_tiers(mut self, tiers: Vec<BreadthTier>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Run every needed tier in order. Never fails; unresolved fields stay `None`.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> BreadthResult {
        let mut result = BreadthResult::default();

        for tier in &self.tiers {
            if !tier.is_needed(&result) {
                continue;
            }

            let started = Instant::now();
            let partial = match tier {
                BreadthTier::Direct => resolve_direct(&self.client, &self.config.direct).await,
                BreadthTier::AdvanceDecline => resolve_advance_decline(&self.client, &self.config).await,
                BreadthTier::SectorProxy => resolve_sector_proxy(&self.client, &self.config, &result).await,
            };
            result.fill_missing(&partial);

            info!(
                tier = tier.as_str(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                missing = ?result.missing_fields().iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                "Breadth tier finished"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        NASI_SYMBOL, NYA200R_SYMBOL, NYA50R_SYMBOL, NYHL_SYMBOL, NYMO_SYMBOL, NYSE_ADVANCES_SYMBOL,
        NYSE_DECLINES_SYMBOL, SECTOR_SYMBOLS, SPX_AD_SYMBOL,
    };
    use crate::models::indicators::calculate_ema;
    use crate::services::testing::{ramp, FakeTransport};
    use crate::utils::round_to;
    use std::time::Duration;

    fn aggregator(fake: FakeTransport) -> (Arc<FakeTransport>, BreadthAggregator) {
        let fake = Arc::new(fake);
        let client = ChartClient::new(
            fake.clone(),
            vec![
                "https://query1.example.com/v8/finance/chart".to_string(),
                "https://query2.example.com/v8/finance/chart".to_string(),
            ],
            Duration::from_millis(200),
        );
        (fake, BreadthAggregator::new(Arc::new(client), BreadthConfig::default()))
    }

    fn with_sector_basket(mut fake: FakeTransport, closes: &[f64]) -> FakeTransport {
        for symbol in SECTOR_SYMBOLS {
            fake = fake.with_values(symbol, closes);
        }
        fake
    }

    #[test]
    fn test_tier_needs() {
        let empty = BreadthResult::default();
        assert!(BreadthTier::Direct.is_needed(&empty));
        assert!(BreadthTier::AdvanceDecline.is_needed(&empty));
        assert!(BreadthTier::SectorProxy.is_needed(&empty));

        let only_nasi_missing = BreadthResult {
            mcclellan_oscillator: Some(1.0),
            net_new_highs_lows: Some(2.0),
            pct_above_50dma: Some(3.0),
            pct_above_200dma: Some(4.0),
            ..BreadthResult::default()
        };
        assert!(BreadthTier::Direct.is_needed(&only_nasi_missing));
        assert!(!BreadthTier::AdvanceDecline.is_needed(&only_nasi_missing));
        assert!(!BreadthTier::SectorProxy.is_needed(&only_nasi_missing));
    }

    #[tokio::test]
    async fn test_direct_values_skip_fallback_tiers() {
        let fake = FakeTransport::new()
            .with_values(NYMO_SYMBOL, &[1.0, 3.2149])
            .with_values(NASI_SYMBOL, &[149.6])
            .with_values(NYHL_SYMBOL, &[12.0])
            .with_values(NYA50R_SYMBOL, &[61.24])
            .with_values(NYA200R_SYMBOL, &[48.06]);
        let (fake, aggregator) = aggregator(fake);

        let result = aggregator.resolve().await;
        assert_eq!(result.mcclellan_oscillator, Some(3.21));
        assert_eq!(result.mcclellan_summation, Some(150.0));
        assert_eq!(result.net_new_highs_lows, Some(12.0));
        assert_eq!(result.pct_above_50dma, Some(61.2));
        assert_eq!(result.pct_above_200dma, Some(48.1));

        assert_eq!(fake.request_count(NYSE_ADVANCES_SYMBOL), 0);
        assert_eq!(fake.request_count(NYSE_DECLINES_SYMBOL), 0);
        assert_eq!(fake.request_count(SPX_AD_SYMBOL), 0);
        assert!(SECTOR_SYMBOLS.iter().all(|s| fake.request_count(s) == 0));
    }

    #[tokio::test]
    async fn test_advance_decline_fills_oscillator_and_wins_over_sector() {
        let advances: Vec<f64> = (0..40).map(|i| 1500.0 + ((i * 37) % 400) as f64).collect();
        let declines: Vec<f64> = (0..40).map(|i| 1400.0 + ((i * 53) % 350) as f64).collect();

        // pct200 missing so the sector tier still runs afterwards
        let fake = FakeTransport::new()
            .with_values(NASI_SYMBOL, &[900.0])
            .with_values(NYHL_SYMBOL, &[5.0])
            .with_values(NYA50R_SYMBOL, &[55.0])
            .with_values(NYSE_ADVANCES_SYMBOL, &advances)
            .with_values(NYSE_DECLINES_SYMBOL, &declines)
            .with_values(SPX_AD_SYMBOL, &ramp(100.0, 3.0, 60));
        let fake = with_sector_basket(fake, &ramp(10.0, 0.1, 250));
        let (fake, aggregator) = aggregator(fake);

        let result = aggregator.resolve().await;

        let net: Vec<f64> = advances.iter().zip(&declines).map(|(a, d)| a - d).collect();
        let fast = calculate_ema(&net, 19);
        let slow = calculate_ema(&net, 39);
        assert_eq!(result.mcclellan_oscillator, Some(round_to(fast[39] - slow[39], 2)));
        // direct summation is kept over the derived one
        assert_eq!(result.mcclellan_summation, Some(900.0));
        assert_eq!(result.net_new_highs_lows, Some(5.0));
        assert_eq!(result.pct_above_50dma, Some(55.0));
        assert_eq!(result.pct_above_200dma, Some(100.0));

        assert_eq!(fake.request_count(SPX_AD_SYMBOL), 0);
        assert!(SECTOR_SYMBOLS.iter().all(|s| fake.request_count(s) >= 1));
    }

    #[tokio::test]
    async fn test_summation_from_counts_is_unoffset_cumulative_sum() {
        let advances: Vec<f64> = (0..40).map(|i| 1500.0 + ((i * 37) % 400) as f64).collect();
        let declines: Vec<f64> = (0..40).map(|i| 1400.0 + ((i * 53) % 350) as f64).collect();
        let fake = FakeTransport::new()
            .with_values(NYHL_SYMBOL, &[5.0])
            .with_values(NYA50R_SYMBOL, &[55.0])
            .with_values(NYA200R_SYMBOL, &[45.0])
            .with_values(NYSE_ADVANCES_SYMBOL, &advances)
            .with_values(NYSE_DECLINES_SYMBOL, &declines);
        let (fake, aggregator) = aggregator(fake);

        let result = aggregator.resolve().await;

        let net: Vec<f64> = advances.iter().zip(&declines).map(|(a, d)| a - d).collect();
        let fast = calculate_ema(&net, 19);
        let slow = calculate_ema(&net, 39);
        let expected: f64 = fast.iter().zip(&slow).map(|(f, s)| f - s).sum();
        assert_eq!(result.mcclellan_summation, Some(round_to(expected, 0)));
        assert!(SECTOR_SYMBOLS.iter().all(|s| fake.request_count(s) == 0));
    }

    #[tokio::test]
    async fn test_sector_proxy_fills_what_is_left() {
        let fake = with_sector_basket(FakeTransport::new(), &ramp(10.0, 0.1, 250))
            .with_values(SPX_AD_SYMBOL, &ramp(100.0, 3.0, 60));
        let (fake, aggregator) = aggregator(fake);

        let result = aggregator.resolve().await;
        assert_eq!(result.pct_above_50dma, Some(100.0));
        assert_eq!(result.pct_above_200dma, Some(100.0));
        assert_eq!(result.net_new_highs_lows, Some(11.0));
        assert!(result.mcclellan_oscillator.is_some());
        assert!(result.mcclellan_summation.is_some());

        // basket fetched once per endpoint attempt, not once per metric
        assert!(SECTOR_SYMBOLS.iter().all(|s| fake.request_count(s) == 1));
        assert_eq!(fake.request_count(SPX_AD_SYMBOL), 1);
    }

    #[tokio::test]
    async fn test_everything_failing_gives_all_null() {
        let (_, aggregator) = aggregator(FakeTransport::new());

        let result = aggregator.resolve().await;
        // net highs/lows over an empty basket is zero, not null
        assert_eq!(result.net_new_highs_lows, Some(0.0));
        assert_eq!(
            result.missing_fields(),
            vec![
                BreadthField::McClellanOscillator,
                BreadthField::McClellanSummation,
                BreadthField::PctAbove50Dma,
                BreadthField::PctAbove200Dma,
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_tier_order() {
        let (fake, aggregator) = aggregator(FakeTransport::new());
        let aggregator = aggregator.with_tiers(vec![BreadthTier::Direct]);

        let result = aggregator.resolve().await;
        assert_eq!(result, BreadthResult::default());
        assert_eq!(fake.request_count(NYSE_ADVANCES_SYMBOL), 0);
    }
}
