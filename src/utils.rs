use crate::constants::CARET_ESCAPE;
use std::env;

/// Read a trimmed, non-empty environment variable or fall back to `default`
pub fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Read a trimmed, non-empty environment variable
pub fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

pub fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a comma-separated list, dropping empty entries
pub fn split_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// `__VIX` -> `^VIX`
pub fn decode_caret(symbol: &str) -> String {
    symbol.replace(CARET_ESCAPE, "^")
}

/// `^VIX` -> `__VIX`
pub fn encode_caret(symbol: &str) -> String {
    symbol.replace('^', CARET_ESCAPE)
}

/// Round half away from zero to a fixed number of decimals
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
