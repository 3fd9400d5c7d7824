//! HTTP seam shared by the upstream clients.
//!
//! Clients hold an `Arc<dyn HttpTransport>` so tests can swap in a fake that
//! serves canned JSON and records every requested URL.

use crate::error::{Error, Result};
use futures::future::{join_all, BoxFuture};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub trait HttpTransport: Send + Sync {
    /// GET `url` and decode the body as JSON. Non-success statuses are errors.
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value>>;
}

/// Production transport backed by a shared `reqwest::Client`
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// `timeout` is a client-wide ceiling; callers enforce their own per-call limits.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            debug!(url, "Sending upstream request");

            let response = self
                .client
                .get(url)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::Network(format!("Upstream returned status {}", status)));
            }

            let body = response
                .text()
                .await
                .map_err(|e| Error::Network(format!("Failed to read response body: {}", e)))?;

            serde_json::from_str(&body)
                .map_err(|e| Error::Parse(format!("Failed to parse JSON response: {}", e)))
        })
    }
}

/// Wait for every spawned task to settle. Panicked or cancelled tasks are
/// mapped through `on_join_error` so one bad task never poisons its siblings.
pub async fn join_settled<T>(
    handles: Vec<JoinHandle<T>>,
    on_join_error: impl Fn(usize, JoinError) -> T,
) -> Vec<T> {
    join_all(handles)
        .await
        .into_iter()
        .enumerate()
        .map(|(i, joined)| match joined {
            Ok(value) => value,
            Err(e) => on_join_error(i, e),
        })
        .collect()
}
