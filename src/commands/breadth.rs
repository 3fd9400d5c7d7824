use crate::models::{BreadthField, BreadthResult, ProxyConfig};
use crate::server::{self, AppState};

pub async fn run() {
    server::init_tracing();
    println!("📊 Market Breadth\n");

    let state = match AppState::from_config(ProxyConfig::from_env()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = state.breadth.resolve().await;
    print_result(&result);
}

fn print_result(result: &BreadthResult) {
    for field in BreadthField::all() {
        match result.get(field) {
            Some(value) => println!("   {:<8} {:>10}", field.as_str(), value),
            None => println!("   {:<8} {:>10}", field.as_str(), "null"),
        }
    }

    if !result.is_complete() {
        println!("\n⚠️  {} field(s) unavailable from every source", result.missing_fields().len());
    }
}
