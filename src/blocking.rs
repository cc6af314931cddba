use std::io;
use std::io::SeekFrom;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::reader::RangeReader;
use crate::transport::RangeTransport;

/// Blocking variant of [`RangeReader`] for synchronous callers.
///
/// Owns a tokio runtime and drives the async reader to completion on the
/// calling thread, so both variants share one implementation and behave
/// identically. Implements [`std::io::Read`] and [`std::io::Seek`];
/// [`std::io::Write`] is implemented only to reject writes.
///
/// Must not be created or used from within an async runtime: nested
/// `block_on` panics under tokio. Use [`RangeReader`] directly there.
pub struct BlockingRangeReader {
    runtime: Runtime,
    inner: RangeReader,
}

impl BlockingRangeReader {
    /// Blocking counterpart of [`RangeReader::open`].
    pub fn open(url: impl Into<String>) -> Result<Self> {
        let runtime = new_runtime()?;
        let inner = runtime.block_on(RangeReader::open(url))?;
        Ok(Self { runtime, inner })
    }

    /// Blocking counterpart of [`RangeReader::open_with`].
    pub fn open_with(
        url: impl Into<String>,
        transport: Arc<dyn RangeTransport>,
        cancel: Option<CancellationToken>,
    ) -> Result<Self> {
        let runtime = new_runtime()?;
        let inner = runtime.block_on(RangeReader::open_with(url, transport, cancel))?;
        Ok(Self { runtime, inner })
    }

    /// Override the window target size (bytes fetched per miss).
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.inner = self.inner.with_window_size(size);
        self
    }

    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn set_position(&mut self, pos: u64) -> Result<u64> {
        self.inner.set_position(pos)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.runtime.block_on(self.inner.read(buf))
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.inner.seek(pos)
    }

    pub fn set_len(&mut self, len: u64) -> Result<()> {
        self.inner.set_len(len)
    }
}

fn new_runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| Error::Precondition(format!("failed to start runtime: {e}")))
}

impl io::Read for BlockingRangeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        BlockingRangeReader::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Seek for BlockingRangeReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        BlockingRangeReader::seek(self, pos).map_err(io::Error::from)
    }
}

impl io::Write for BlockingRangeReader {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().map_err(io::Error::from)
    }
}
