use serde::{Deserialize, Serialize};

/// Quote provider payload. Only the fields the dashboard reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotePayload {
    /// Current price
    pub c: Option<f64>,
    /// Previous close
    pub pc: Option<f64>,
}

/// Quote returned to the dashboard, keyed by symbol in the response map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub sym: String,
    pub c: Option<f64>,
    pub pc: Option<f64>,
}

impl Quote {
    pub fn from_payload(symbol: &str, payload: QuotePayload) -> Self {
        Self {
            sym: symbol.to_string(),
            c: payload.c,
            pc: payload.pc,
        }
    }
}
