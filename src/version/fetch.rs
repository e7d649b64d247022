use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::core::FetchError;

/// Minimal HTTP GET returning a JSON body.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// `reqwest`-backed fetcher.
///
/// Non-2xx responses are still decoded: the caller inspects the body.
#[derive(Debug, Clone)]
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    const USER_AGENT: &'static str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        response.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
