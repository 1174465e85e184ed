use async_trait::async_trait;
use querypad_core::ServerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::http::HttpClient;

/// Anything that can turn lookup text into suggestion fragments.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<String>>;
}

/// Body of a search endpoint response: fragments in ranking order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<String>,
}

pub struct SearchClient {
    client: HttpClient,
    base_url: String,
    search_path: String,
}

impl SearchClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = HttpClient::new(config.timeout(), config.max_retries, &config.user_agent);
        Self::with_client(client, &config.base_url, &config.search_path)
    }

    pub fn with_client(client: HttpClient, base_url: &str, search_path: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidEndpoint(base_url.to_string()));
        }
        if !search_path.starts_with('/') {
            return Err(ClientError::InvalidEndpoint(search_path.to_string()));
        }

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            search_path: search_path.to_string(),
        })
    }

    /// Full request URL for `query`, with the query percent-encoded.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}{}?q={}",
            self.base_url,
            self.search_path,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl SuggestionSource for SearchClient {
    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let url = self.search_url(query);
        let res: SearchResponse = self.client.get_json(&url).await?;
        debug!(query, count = res.data.len(), "search response");
        Ok(res.data)
    }
}
