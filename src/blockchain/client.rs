use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::blockchain::models::{
    extract_address_payload, extract_error, extract_transaction_payload, AddressPayload,
    RawAddressFull, RawTransaction, TransactionPayload,
};
use crate::config::Config;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream rejected request: {0}")]
    Rejected(String),

    #[error("invalid upstream payload: {0}")]
    Decode(String),

    #[error("upstream response exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// Live blockchain data source.
///
/// Calls are single attempts: failures surface to the caller, no retry here.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Balance and transaction list of an address.
    async fn fetch_address_full(&self, address: &str) -> Result<AddressPayload, UpstreamError>;

    /// Transaction detail. A provider error body is returned as a payload
    /// with `error` set, not as `Err`.
    async fn fetch_transaction(&self, hash: &str) -> Result<TransactionPayload, UpstreamError>;
}

type DirectRateLimiter = Governor<NotKeyed, InMemoryState, DefaultClock>;

const MAX_ERROR_BODY: usize = 256;

/// BlockCypher REST client.
pub struct BlockCypherClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    max_body_bytes: usize,
    limiter: Option<DirectRateLimiter>,
}

impl BlockCypherClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        let base_url = Url::parse(&config.blockcypher_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.blockcypher_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.blockcypher_url.clone()));
        }

        let limiter = match config.upstream_rate_limit.and_then(NonZeroU32::new) {
            Some(limit) => Some(Governor::direct(Quota::per_second(limit))),
            None => {
                if config.upstream_rate_limit.is_some() {
                    warn!("UPSTREAM_RATE_LIMIT of 0 ignored, outbound calls are not throttled");
                }
                None
            }
        };

        info!(
            "Initializing BlockCypher client with endpoint: {}, timeout: {:?}",
            config.blockcypher_url, config.upstream_timeout
        );

        Ok(Self {
            client,
            base_url,
            token: config.blockcypher_token.clone(),
            max_body_bytes: config.upstream_max_body_bytes,
            limiter,
        })
    }

    /// Append `segments` to the base URL, each escaped as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Value), UpstreamError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = self.read_body(response).await?;

        // Throttling by the provider is a transport failure, not a rejection.
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(status_error(status, &body));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => Err(status_error(status, &body)),
            Err(e) => Err(UpstreamError::Decode(e.to_string())),
        }
    }

    async fn read_body(&self, mut response: Response) -> Result<String, UpstreamError> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(UpstreamError::BodyTooLarge(limit));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(UpstreamError::BodyTooLarge(limit));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl UpstreamClient for BlockCypherClient {
    async fn fetch_address_full(&self, address: &str) -> Result<AddressPayload, UpstreamError> {
        let (status, body) = self.get(self.endpoint(&["addrs", address, "full"])?).await?;

        if let Some(message) = extract_error(&body) {
            return Err(UpstreamError::Rejected(message));
        }
        if !status.is_success() {
            return Err(status_error(status, &body.to_string()));
        }

        let raw: RawAddressFull = decode(body)?;
        Ok(extract_address_payload(raw))
    }

    async fn fetch_transaction(&self, hash: &str) -> Result<TransactionPayload, UpstreamError> {
        let (status, body) = self.get(self.endpoint(&["txs", hash])?).await?;

        if let Some(message) = extract_error(&body) {
            return Ok(TransactionPayload::rejected(message));
        }
        if !status.is_success() {
            return Err(status_error(status, &body.to_string()));
        }

        let raw: RawTransaction = decode(body)?;
        Ok(extract_transaction_payload(raw))
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(body).map_err(|e| UpstreamError::Decode(e.to_string()))
}

fn status_error(status: StatusCode, body: &str) -> UpstreamError {
    UpstreamError::Status {
        status: status.as_u16(),
        message: body.chars().take(MAX_ERROR_BODY).collect(),
    }
}
