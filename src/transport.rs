use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, header};

use crate::error::{Error, Result};

/// Result of a single ranged GET.
pub struct RangeResponse {
    /// Body bytes. May be fewer than the requested span if the server
    /// returned less.
    pub bytes: Vec<u8>,
    /// Total resource length parsed from the `Content-Range` header,
    /// when the server reported one.
    pub total_len: Option<u64>,
}

/// Narrow interface to the HTTP layer: one ranged GET at a time.
///
/// Implementations own connection pooling, TLS, redirects and any retry
/// policy. A single transport may be shared by any number of readers.
#[async_trait]
pub trait RangeTransport: Send + Sync {
    /// Issue a GET for `bytes=start-end` (inclusive end) against `url`.
    async fn get_range(&self, url: &str, start: u64, end: u64) -> Result<RangeResponse>;
}

/// Range transport backed by a [`reqwest::Client`].
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, sharing its connection pool.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RangeTransport for HttpTransport {
    async fn get_range(&self, url: &str, start: u64, end: u64) -> Result<RangeResponse> {
        let range = format!("bytes={start}-{end}");
        let resp = self
            .client
            .get(url)
            .header(header::RANGE, &range)
            .send()
            .await?;

        // A 200 here would mean the server ignored the Range header and is
        // streaming the whole object from offset 0, so only 206 is accepted.
        if resp.status() != StatusCode::PARTIAL_CONTENT {
            return Err(Error::Status(resp.status()));
        }

        let total_len = resp
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        let bytes = resp.bytes().await?.to_vec();
        debug!("GET {range} -> {} bytes (total {total_len:?})", bytes.len());
        Ok(RangeResponse { bytes, total_len })
    }
}

/// Parse the total from a `Content-Range: bytes start-end/total` value.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}
