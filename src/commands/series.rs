use crate::models::{ProxyConfig, RangeHint};
use crate::server::{self, AppState};
use crate::utils::decode_caret;

pub async fn run(symbol: String, range: RangeHint) {
    server::init_tracing();

    let symbol = decode_caret(&symbol);
    let state = match AppState::from_config(ProxyConfig::from_env()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let series = state.charts.fetch_series(&symbol, range).await;
    if series.is_empty() {
        println!("⚠️  No data for {} ({})", symbol, range);
        return;
    }

    println!("🔹 {} ({}, {} observations)\n", symbol, range, series.len());
    for observation in series.observations() {
        let date = observation
            .time()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("   {}  {:>12.2}", date, observation.value);
    }
}
