//! HTTP transport over reqwest
//!
//! Builds the underlying client once with the configured timeout and
//! attaches the bearer credential to every request. Write requests carry
//! `X-Requested-With`, which the Grist API requires for mutations.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::GristConfig;
use crate::error::{ClientError, Result};

pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: GristConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Auth("API key is empty".to_string()));
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Decode(format!("invalid base URL {}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Resolve an endpoint path against the base URL, one encoded segment
    /// per element
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Decode(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    /// GET an endpoint, returning the raw response body
    pub async fn get(&self, segments: &[&str]) -> Result<String> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "GET");

        let response = self.request(Method::GET, url).send().await?;
        Self::read_body(response).await
    }

    /// PATCH an endpoint with a JSON body, returning the raw response body
    pub async fn patch_json<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<String> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "PATCH");

        let response = self
            .request(Method::PATCH, url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(body)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Auth(format!(
                "credential rejected (status {}): {}",
                status.as_u16(),
                condense(&body)
            ))),
            s => Err(ClientError::Api {
                status: s.as_u16(),
                message: condense(&body),
            }),
        }
    }
}

/// Collapse a response body into a single-line error message
fn condense(body: &str) -> String {
    let text = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        "(empty response body)".to_string()
    } else {
        text
    }
}
