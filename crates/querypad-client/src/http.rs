use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{ClientError, Result};

/// First retry delay; doubles on each further attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(250);

// ─── HttpClient ───────────────────────────────────────────────────────────────

/// `reqwest` wrapper that retries transport failures with exponential backoff.
///
/// Non-2xx responses are returned as [`ClientError::ApiError`] straight away.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpClient {
    pub fn new(timeout: Duration, max_retries: u32, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            max_retries,
        }
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            match self.client.get(url).send().await {
                Ok(r) if !r.status().is_success() => {
                    let status = r.status().as_u16();
                    let body = r.text().await.unwrap_or_default();
                    return Err(ClientError::ApiError(
                        url.to_string(),
                        format!("HTTP {status}: {}", body.trim()),
                    ));
                }
                Ok(r) => return r.text().await.map_err(ClientError::Http),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(ClientError::Http(e));
                    }
                    let backoff = BASE_BACKOFF * 2u32.pow(attempt);
                    debug!(url, attempt, ?backoff, error = %e, "retrying request");
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get(url).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
    }
}
