//! Smoothing primitives for breadth calculations
//!
//! # EMA seeding
//! [`calculate_ema`] seeds with the first input value instead of a
//! `period`-length SMA warm-up. Outputs stay bit-compatible with the
//! dashboard's historical numbers; do not switch to the textbook warm-up.

/// EMA smoothing factor: `2 / (period + 1)`
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Calculate Exponential Moving Average
///
/// # Returns
/// * One value per input value; `result[0] == values[0]`. Empty input gives empty output.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let k = ema_multiplier(period);
    let mut ema = seed;
    let mut result = Vec::with_capacity(values.len());
    result.push(ema);

    for &value in &values[1..] {
        ema = value * k + ema * (1.0 - k);
        result.push(ema);
    }

    result
}

/// Arithmetic mean of the trailing `window` values
///
/// # Returns
/// * `None` when `window` is 0 or there are fewer than `window` values
pub fn calculate_sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Elementwise `fast_ema - slow_ema` over the whole input
pub fn ema_spread(values: &[f64], fast_period: usize, slow_period: usize) -> Vec<f64> {
    let fast = calculate_ema(values, fast_period);
    let slow = calculate_ema(values, slow_period);

    fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect()
}

/// Highest and lowest of the trailing `window` values
pub fn trailing_extremes(values: &[f64], window: usize) -> Option<(f64, f64)> {
    if values.is_empty() || window == 0 {
        return None;
    }

    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    let high = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = tail.iter().copied().fold(f64::INFINITY, f64::min);
    Some((high, low))
}
