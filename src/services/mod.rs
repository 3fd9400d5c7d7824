pub mod api_logging;
pub mod breadth;
pub mod chart_client;
pub mod quote_client;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api_logging::{log_api_request, ApiPerformanceMetrics, ApiStatus};
pub use breadth::{BreadthAggregator, BreadthTier};
pub use chart_client::ChartClient;
pub use quote_client::QuoteClient;
pub use transport::{join_settled, HttpTransport, ReqwestTransport};
