//! HTTP transport seam and response decoding.
//!
//! The engine only needs a `fetch(url) -> (status, JSON body)` capability,
//! expressed as the [`Fetch`] trait. [`HttpFetcher`] implements it over
//! `reqwest`; tests plug in an in-memory fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config;
use crate::error::{CardinalityError, Result};

/// Status code and JSON body of one response.
///
/// The body is parsed as JSON whatever the status, since the server reports
/// failures as JSON too.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a GET request and returns its status and JSON body.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawResponse>;
}

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawResponse> {
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        Ok(RawResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Turn a response into its JSON body, or an API error for failure statuses.
///
/// Failure bodies are logged with their URL. The error carries `errorType`
/// (default `"Unknown type"`) and the first of `error`, `message`, or a
/// generic hint.
pub fn decode_response(url: &Url, response: RawResponse) -> Result<Value> {
    if response.is_success() {
        return Ok(response.body);
    }

    tracing::error!(
        url = %url,
        status = response.status,
        body = %response.body,
        "error fetching status endpoint"
    );

    let body = &response.body;
    let error_type = str_field(body, "errorType").unwrap_or(config::UNKNOWN_ERROR_TYPE);
    let message = str_field(body, "error")
        .or_else(|| str_field(body, "message"))
        .unwrap_or(config::UNKNOWN_ERROR_MESSAGE);

    Err(CardinalityError::Api {
        error_type: error_type.to_string(),
        message: message.to_string(),
    })
}

/// Fetch `url` and decode the response body as JSON.
pub async fn get_response_json<F>(fetcher: &F, url: &Url) -> Result<Value>
where
    F: Fetch + ?Sized,
{
    let response = fetcher.fetch(url).await?;
    decode_response(url, response)
}

/// Fetch `url` and deserialize a successful body into `T`.
pub async fn get_response<F, T>(fetcher: &F, url: &Url) -> Result<T>
where
    F: Fetch + ?Sized,
    T: DeserializeOwned,
{
    let value = get_response_json(fetcher, url).await?;
    serde_json::from_value(value).map_err(CardinalityError::from)
}
