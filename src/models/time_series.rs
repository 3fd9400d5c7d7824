use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uncleaned close/timestamp arrays as returned by the candle provider.
///
/// Serialized as `{c: [...], t: [...]}` for the candles endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChart {
    #[serde(rename = "c")]
    pub closes: Vec<Option<f64>>,
    #[serde(rename = "t")]
    pub timestamps: Vec<i64>,
}

impl RawChart {
    pub fn new(closes: Vec<Option<f64>>, timestamps: Vec<i64>) -> Self {
        Self { closes, timestamps }
    }

    /// Strip null/NaN closes, keeping the rest in order
    pub fn clean(&self) -> TimeSeries {
        let observations = self
            .closes
            .iter()
            .enumerate()
            .filter_map(|(i, close)| match close {
                Some(value) if value.is_finite() => Some(Observation {
                    timestamp: self.timestamps.get(i).copied(),
                    value: *value,
                }),
                _ => None,
            })
            .collect();

        TimeSeries { observations }
    }
}

/// A single cleaned data point.
///
/// `timestamp` is `None` only when the provider sent fewer timestamps than closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: Option<i64>,
    pub value: f64,
}

impl Observation {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// Cleaned, chronologically ordered series. Never holds NaN. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build directly from values (no timestamps). Non-finite values are dropped.
    pub fn from_values(values: &[f64]) -> Self {
        RawChart::new(values.iter().map(|v| Some(*v)).collect(), Vec::new()).clean()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Close values in order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last().map(|o| o.value)
    }
}

/// Per-symbol result of an upstream fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Series(TimeSeries),
    Failed(String),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    /// Failures read as an empty series downstream
    pub fn into_series(self) -> TimeSeries {
        match self {
            FetchOutcome::Series(series) => series,
            FetchOutcome::Failed(_) => TimeSeries::empty(),
        }
    }
}
