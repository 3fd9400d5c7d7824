use crate::models::ProxyConfig;
use crate::server;

pub async fn run(port: Option<u16>) {
    server::init_tracing();

    let config = ProxyConfig::from_env().with_port(port);
    println!("🚀 Starting market dashboard proxy on port {}", config.port);
    if config.finnhub_key.is_none() {
        println!("⚠️  FINNHUB_KEY not set, quotes rely on request-supplied keys");
    }

    if let Err(e) = server::serve(config).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
