use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::{ActionResponse, FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Option<Duration>,
    /// No request timeout by default: a hung request only stalls its own caller.
    pub request_timeout: Option<Duration>,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Typed HTTP access used by the dashboard. Every call reports its own
/// failure class; callers decide whether to log, ignore or retry.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a body as text. Non-2xx statuses are failures.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET a JSON document. Non-2xx statuses are failures.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    /// POST with an empty body. Every HTTP status is a response, not a failure.
    async fn post_empty(&self, url: &str) -> Result<ActionResponse, FetchError>;

    /// GET a JSON array of records.
    async fn get_records(&self, url: &str) -> Result<Vec<Value>, FetchError> {
        match self.get_json(url).await? {
            Value::Array(records) => Ok(records),
            other => Err(FetchError::new(
                FailureKind::Decode,
                format!("expected a JSON array, got {}", json_kind(&other)),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit));
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_ok(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(Self::parse_url(url)?)
            .header(ACCEPT, "application/json, text/html;q=0.9, */*;q=0.1")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        self.read_body(response).await
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let bytes = self.get_ok(url).await?;
        String::from_utf8(bytes).map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let bytes = self.get_ok(url).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }

    async fn post_empty(&self, url: &str) -> Result<ActionResponse, FetchError> {
        let response = self
            .client
            .post(Self::parse_url(url)?)
            .header(ACCEPT, "application/json")
            .body(Vec::<u8>::new())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let bytes = self.read_body(response).await?;
        Ok(ActionResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
