//! Breadth result record and the symbol configuration that feeds it.

use crate::constants::{
    NASI_SYMBOL, NYA200R_SYMBOL, NYA50R_SYMBOL, NYHL_SYMBOL, NYMO_SYMBOL, NYSE_ADVANCES_SYMBOL,
    NYSE_DECLINES_SYMBOL, SECTOR_SYMBOLS, SPX_AD_SYMBOL,
};
use crate::models::RangeHint;
use serde::{Deserialize, Serialize};

/// The five breadth fields returned to the dashboard.
///
/// `None` means no tier produced a value for this request; it is never a stand-in for zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BreadthResult {
    #[serde(rename = "nymo")]
    pub mcclellan_oscillator: Option<f64>,
    #[serde(rename = "nasi")]
    pub mcclellan_summation: Option<f64>,
    #[serde(rename = "nyhl")]
    pub net_new_highs_lows: Option<f64>,
    #[serde(rename = "pct50")]
    pub pct_above_50dma: Option<f64>,
    #[serde(rename = "pct200")]
    pub pct_above_200dma: Option<f64>,
}

/// Field selector for [`BreadthResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreadthField {
    McClellanOscillator,
    McClellanSummation,
    NetNewHighsLows,
    PctAbove50Dma,
    PctAbove200Dma,
}

impl BreadthField {
    pub fn all() -> [BreadthField; 5] {
        [
            BreadthField::McClellanOscillator,
            BreadthField::McClellanSummation,
            BreadthField::NetNewHighsLows,
            BreadthField::PctAbove50Dma,
            BreadthField::PctAbove200Dma,
        ]
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            BreadthField::McClellanOscillator => "nymo",
            BreadthField::McClellanSummation => "nasi",
            BreadthField::NetNewHighsLows => "nyhl",
            BreadthField::PctAbove50Dma => "pct50",
            BreadthField::PctAbove200Dma => "pct200",
        }
    }
}

impl BreadthResult {
    pub fn get(&self, field: BreadthField) -> Option<f64> {
        match field {
            BreadthField::McClellanOscillator => self.mcclellan_oscillator,
            BreadthField::McClellanSummation => self.mcclellan_summation,
            BreadthField::NetNewHighsLows => self.net_new_highs_lows,
            BreadthField::PctAbove50Dma => self.pct_above_50dma,
            BreadthField::PctAbove200Dma => self.pct_above_200dma,
        }
    }

    pub fn set(&mut self, field: BreadthField, value: Option<f64>) {
        let slot = match field {
            BreadthField::McClellanOscillator => &mut self.mcclellan_oscillator,
            BreadthField::McClellanSummation => &mut self.mcclellan_summation,
            BreadthField::NetNewHighsLows => &mut self.net_new_highs_lows,
            BreadthField::PctAbove50Dma => &mut self.pct_above_50dma,
            BreadthField::PctAbove200Dma => &mut self.pct_above_200dma,
        };
        *slot = value;
    }

    pub fn is_missing(&self, field: BreadthField) -> bool {
        self.get(field).is_none()
    }

    /// Fields still null
    pub fn missing_fields(&self) -> Vec<BreadthField> {
        BreadthField::all()
            .into_iter()
            .filter(|f| self.is_missing(*f))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Merge `other` into `self`: existing values win, gaps take `other`'s value.
    pub fn fill_missing(&mut self, other: &BreadthResult) {
        for field in BreadthField::all() {
            if self.is_missing(field) {
                self.set(field, other.get(field));
            }
        }
    }
}

/// One directly-quoted breadth symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DirectIndicator {
    pub field: BreadthField,
    pub symbol: String,
    pub range: RangeHint,
    /// Decimal places kept from the last value
    pub decimals: u32,
}

impl DirectIndicator {
    pub fn new(field: BreadthField, symbol: &str, range: RangeHint, decimals: u32) -> Self {
        Self {
            field,
            symbol: symbol.to_string(),
            range,
            decimals,
        }
    }
}

/// Symbols consulted by each breadth tier
#[derive(Debug, Clone, PartialEq)]
pub struct BreadthConfig {
    pub direct: Vec<DirectIndicator>,
    pub advances_symbol: String,
    pub declines_symbol: String,
    pub advance_decline_range: RangeHint,
    pub spx_ad_symbol: String,
    pub spx_ad_range: RangeHint,
    pub sector_symbols: Vec<String>,
    pub sector_range: RangeHint,
}

impl Default for BreadthConfig {
    fn default() -> Self {
        Self {
            direct: vec![
                DirectIndicator::new(BreadthField::McClellanOscillator, NYMO_SYMBOL, RangeHint::ThreeMonths, 2),
                DirectIndicator::new(BreadthField::McClellanSummation, NASI_SYMBOL, RangeHint::ThreeMonths, 0),
                DirectIndicator::new(BreadthField::NetNewHighsLows, NYHL_SYMBOL, RangeHint::FiveDays, 0),
                DirectIndicator::new(BreadthField::PctAbove50Dma, NYA50R_SYMBOL, RangeHint::ThreeMonths, 1),
                DirectIndicator::new(BreadthField::PctAbove200Dma, NYA200R_SYMBOL, RangeHint::ThreeMonths, 1),
            ],
            advances_symbol: NYSE_ADVANCES_SYMBOL.to_string(),
            declines_symbol: NYSE_DECLINES_SYMBOL.to_string(),
            advance_decline_range: RangeHint::SixMonths,
            spx_ad_symbol: SPX_AD_SYMBOL.to_string(),
            spx_ad_range: RangeHint::ThreeMonths,
            sector_symbols: SECTOR_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            sector_range: RangeHint::OneYear,
        }
    }
}
