//! In-memory transport for tests, counting fetches and recording the exact
//! ranges requested.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::transport::{RangeResponse, RangeTransport};

pub struct MockTransport {
    data: Vec<u8>,
    fetches: AtomicUsize,
    ranges: Mutex<Vec<(u64, u64)>>,
    fail_next: AtomicBool,
    empty_next: AtomicBool,
    omit_total: AtomicBool,
    truncate_to: AtomicUsize,
}

impl MockTransport {
    /// A resource of `len` bytes filled with a deterministic pattern.
    pub fn with_len(len: usize) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            data: Self::pattern_at(0, len),
            fetches: AtomicUsize::new(0),
            ranges: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            empty_next: AtomicBool::new(false),
            omit_total: AtomicBool::new(false),
            truncate_to: AtomicUsize::new(0),
        })
    }

    /// The pattern bytes at resource offset `pos`.
    pub fn pattern_at(pos: u64, n: usize) -> Vec<u8> {
        (pos..pos + n as u64).map(|i| (i % 251) as u8).collect()
    }

    /// Number of ranged GETs issued so far, the construction probe included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Every `(start, end)` range requested so far, in order.
    pub fn ranges(&self) -> Vec<(u64, u64)> {
        self.ranges.lock().unwrap().clone()
    }

    /// Fail the next request with an HTTP error status.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Answer the next request with an empty body.
    pub fn empty_next_body(&self) {
        self.empty_next.store(true, Ordering::SeqCst);
    }

    /// Stop reporting a Content-Range total.
    pub fn omit_total(&self) {
        self.omit_total.store(true, Ordering::SeqCst);
    }

    /// Cap every body at `n` bytes to simulate short server reads.
    pub fn truncate_bodies_to(&self, n: usize) {
        self.truncate_to.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl RangeTransport for MockTransport {
    async fn get_range(&self, _url: &str, start: u64, end: u64) -> Result<RangeResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.ranges.lock().unwrap().push((start, end));

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::Status(StatusCode::BAD_GATEWAY));
        }

        let end = end.min(self.data.len().saturating_sub(1) as u64);
        let mut bytes = if self.empty_next.swap(false, Ordering::SeqCst) {
            Vec::new()
        } else {
            self.data[start as usize..=end as usize].to_vec()
        };
        let cap = self.truncate_to.load(Ordering::SeqCst);
        if cap > 0 {
            bytes.truncate(cap);
        }

        let total_len = if self.omit_total.load(Ordering::SeqCst) {
            None
        } else {
            Some(self.data.len() as u64)
        };
        Ok(RangeResponse { bytes, total_len })
    }
}
