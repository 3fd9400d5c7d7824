use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookback window requested from the candle provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeHint {
    /// 5 days
    #[serde(rename = "5d")]
    FiveDays,
    /// 1 month
    #[serde(rename = "1mo")]
    OneMonth,
    /// 3 months
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// 6 months
    #[serde(rename = "6mo")]
    SixMonths,
    /// 1 year
    #[serde(rename = "1y")]
    OneYear,
    /// 2 years
    #[serde(rename = "2y")]
    TwoYears,
}

impl RangeHint {
    /// Provider query value
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeHint::FiveDays => "5d",
            RangeHint::OneMonth => "1mo",
            RangeHint::ThreeMonths => "3mo",
            RangeHint::SixMonths => "6mo",
            RangeHint::OneYear => "1y",
            RangeHint::TwoYears => "2y",
        }
    }

    /// Candle interval for this range. Always daily.
    pub fn interval(&self) -> &'static str {
        "1d"
    }

    /// Parse from string (exact provider values only)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim() {
            "5d" => Ok(RangeHint::FiveDays),
            "1mo" => Ok(RangeHint::OneMonth),
            "3mo" => Ok(RangeHint::ThreeMonths),
            "6mo" => Ok(RangeHint::SixMonths),
            "1y" => Ok(RangeHint::OneYear),
            "2y" => Ok(RangeHint::TwoYears),
            _ => Err(format!(
                "Invalid range: '{}'. Valid values: 5d, 1mo, 3mo, 6mo, 1y, 2y",
                s
            )),
        }
    }

    /// Lenient parse used for request parameters: absent or unrecognized -> 1y
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(|value| Self::from_str(value).ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for RangeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for RangeHint {
    fn default() -> Self {
        RangeHint::OneYear
    }
}
