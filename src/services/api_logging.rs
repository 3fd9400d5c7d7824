use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// API request performance metrics
#[derive(Debug, Clone)]
pub struct ApiPerformanceMetrics {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub status: ApiStatus,
    /// Value of the `type` query parameter
    pub endpoint: String,
    pub symbol_count: usize,
    pub range: String,
    pub response_size_bytes: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Success,
    Fail,
}

impl ApiPerformanceMetrics {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: start_time,
            duration_ms: 0,
            status: ApiStatus::Success,
            endpoint: String::new(),
            symbol_count: 0,
            range: String::new(),
            response_size_bytes: 0,
            error_message: None,
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ApiStatus::Fail;
        self.error_message = Some(message.into());
    }

    pub fn complete(&mut self) {
        self.complete_at(Utc::now());
    }

    pub fn complete_at(&mut self, end_time: DateTime<Utc>) {
        self.end_time = end_time;
        self.duration_ms = (self.end_time - self.start_time).num_milliseconds().max(0) as u64;
    }
}

fn format_duration(duration_ms: u64) -> String {
    if duration_ms >= 1000 {
        format!("{}.{:01}s", duration_ms / 1000, (duration_ms % 1000) / 100)
    } else {
        format!("{}ms", duration_ms)
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 {
        format!("{}kb", bytes / 1024)
    } else {
        format!("{}b", bytes)
    }
}

/// Emit one compact line per request
pub fn log_api_request(metrics: &ApiPerformanceMetrics) {
    let duration = format_duration(metrics.duration_ms);
    let size = format_size(metrics.response_size_bytes);

    match metrics.status {
        ApiStatus::Success => info!(
            endpoint = %metrics.endpoint,
            symbols = metrics.symbol_count,
            range = %metrics.range,
            duration = %duration,
            size = %size,
            "OK"
        ),
        ApiStatus::Fail => warn!(
            endpoint = %metrics.endpoint,
            symbols = metrics.symbol_count,
            range = %metrics.range,
            duration = %duration,
            error = metrics.error_message.as_deref().unwrap_or(""),
            "FAIL"
        ),
    }
}
