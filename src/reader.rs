use std::fmt;
use std::io::SeekFrom;
use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::transport::{HttpTransport, RangeTransport};

/// Default size of the window fetched on a read miss (128 KiB).
pub const DEFAULT_WINDOW_SIZE: usize = 128 * 1024;

/// The single contiguous byte range currently cached in memory.
/// Empty bytes means no window is cached yet.
struct Window {
    start: u64,
    bytes: Vec<u8>,
}

impl Window {
    fn empty() -> Self {
        Self {
            start: 0,
            bytes: Vec::new(),
        }
    }

    fn contains(&self, pos: u64) -> bool {
        pos >= self.start && pos < self.start + self.bytes.len() as u64
    }
}

/// Seekable reader over a remote resource supporting HTTP Range requests.
///
/// The reader keeps at most one contiguous window of the resource in memory.
/// A read whose cursor falls inside the window is served without I/O; a miss
/// replaces the window wholesale with one range fetch starting at the cursor.
/// Memory stays bounded to a single window regardless of the access pattern,
/// at the cost of a refetch on every jump outside it.
///
/// The resource is assumed immutable while the reader is in use: its total
/// length is probed once at construction and never revisited.
///
/// A reader serves a single caller; reads and seeks take `&mut self`. The
/// transport is the shareable part, so spin up one reader per concurrent
/// consumer on a shared [`HttpTransport`].
pub struct RangeReader {
    transport: Arc<dyn RangeTransport>,
    url: String,
    len: u64,
    pos: u64,
    window: Window,
    window_size: usize,
    cancel: CancellationToken,
}

impl RangeReader {
    /// Open `url` with a fresh [`HttpTransport`].
    pub async fn open(url: impl Into<String>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new()?);
        Self::open_with(url, transport, None).await
    }

    /// Open `url` on a shared transport, optionally tied to a cancellation
    /// token. Cancelling the token aborts any in-flight window fetch with
    /// [`Error::Cancelled`].
    ///
    /// This probes the resource once with a `bytes=0-0` request to learn its
    /// total length from the `Content-Range` header. A failed probe or a
    /// response without that header fails with [`Error::Precondition`].
    pub async fn open_with(
        url: impl Into<String>,
        transport: Arc<dyn RangeTransport>,
        cancel: Option<CancellationToken>,
    ) -> Result<Self> {
        let url = url.into();
        let probe = transport
            .get_range(&url, 0, 0)
            .await
            .map_err(|e| Error::Precondition(format!("length probe failed: {e}")))?;
        let len = probe
            .total_len
            .ok_or_else(|| Error::Precondition(format!("no Content-Range total for {url}")))?;
        debug!("opened {url}: {len} bytes");
        Ok(Self {
            transport,
            url,
            len,
            pos: 0,
            window: Window::empty(),
            window_size: DEFAULT_WINDOW_SIZE,
            cancel: cancel.unwrap_or_default(),
        })
    }

    /// Override the window target size (bytes fetched per miss).
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size.max(1);
        self
    }

    /// Total length of the resource in bytes, fixed at construction.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Set the cursor, equivalent to `seek(SeekFrom::Start(pos))`.
    pub fn set_position(&mut self, pos: u64) -> Result<u64> {
        self.seek(SeekFrom::Start(pos))
    }

    /// Move the cursor. No I/O happens and the cached window is untouched;
    /// the next read decides whether a fetch is needed.
    ///
    /// Targets outside `[0, len]` fail with [`Error::OutOfRange`] and leave
    /// the cursor where it was. Seeking to `len` is valid end-of-stream.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(delta) => i128::from(self.pos) + i128::from(delta),
            SeekFrom::End(delta) => i128::from(self.len) + i128::from(delta),
        };
        if target < 0 || target > i128::from(self.len) {
            return Err(Error::OutOfRange {
                position: target,
                length: self.len,
            });
        }
        self.pos = target as u64;
        Ok(self.pos)
    }

    /// Read up to `buf.len()` bytes at the cursor, advancing it by the count
    /// returned. Returns `Ok(0)` at end of stream or for an empty buffer,
    /// with no I/O in either case.
    ///
    /// On a window miss this issues exactly one range fetch before copying.
    /// If that fetch fails, the cursor and the previous window are left
    /// unchanged, so the same read can simply be retried.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || self.pos >= self.len {
            return Ok(0);
        }

        if !self.window.contains(self.pos) {
            self.fill_window().await?;
        }

        let offset = (self.pos - self.window.start) as usize;
        let n = buf.len().min(self.window.bytes.len() - offset);
        buf[..n].copy_from_slice(&self.window.bytes[offset..offset + n]);
        self.pos += n as u64;
        Ok(n)
    }

    /// Fetch a fresh window starting at the cursor and install it wholesale.
    /// Only called with `pos < len`, so the requested range is never empty.
    async fn fill_window(&mut self) -> Result<()> {
        let start = self.pos;
        let end = (start + self.window_size as u64).min(self.len) - 1;
        debug!("window miss at {start}, fetching bytes {start}-{end}");

        let fetch = self.transport.get_range(&self.url, start, end);
        let resp = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            resp = fetch => resp?,
        };

        let mut bytes = resp.bytes;
        // Honor a short body as a shorter window; clamp an overlong one to
        // the requested span so the window never extends past `len`. An
        // empty body for an in-range request cannot cover the cursor.
        bytes.truncate((end - start + 1) as usize);
        if bytes.is_empty() {
            return Err(Error::EmptyBody { start, end });
        }
        self.window = Window { start, bytes };
        Ok(())
    }

    /// No-op: the reader never buffers anything to write back.
    pub fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Always fails: the remote resource is read-only.
    pub fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(Error::Unsupported("write"))
    }

    /// Always fails: the remote resource cannot be resized.
    pub fn set_len(&mut self, _len: u64) -> Result<()> {
        Err(Error::Unsupported("set_len"))
    }
}

impl fmt::Debug for RangeReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeReader")
            .field("url", &self.url)
            .field("len", &self.len)
            .field("pos", &self.pos)
            .field("window_start", &self.window.start)
            .field("window_len", &self.window.bytes.len())
            .field("window_size", &self.window_size)
            .finish_non_exhaustive()
    }
}
