#[tokio::main]
async fn main() {
    market_dashboard_proxy::cli::run().await;
}
