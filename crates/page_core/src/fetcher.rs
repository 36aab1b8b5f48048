use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// GETs a JSON resource by site-relative path (`/data/phones/phones.json?query=nex`).
#[async_trait]
pub trait DataFetcher: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError>;
}

pub async fn fetch_as<T: DeserializeOwned>(
    fetcher: &dyn DataFetcher,
    path: &str,
) -> Result<T, FetchError> {
    let body = fetcher.get_json(path).await?;
    serde_json::from_value(body).map_err(|source| FetchError::Decode {
        path: path.to_string(),
        source,
    })
}

pub struct HttpFetcher {
    http: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

#[async_trait]
impl DataFetcher for HttpFetcher {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");
        let transport = |source| FetchError::Transport {
            path: path.to_string(),
            source,
        };
        let res = self.http.get(&url).send().await.map_err(transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = res.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
