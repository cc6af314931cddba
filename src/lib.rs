//! # rangeseek
//!
//! A seekable random-access reader for remote files using HTTP Range requests.
//!
//! This library exposes a remote, immutable byte blob (any URL whose server
//! honors Range requests, such as a presigned object-store link) as an
//! ordinary read/seek stream without downloading the whole object. The reader
//! caches a single contiguous window (128 KiB by default) and refills it with
//! one range fetch whenever a read lands outside it, keeping memory bounded
//! to one window regardless of how the caller jumps around.
//!
//! ## Features
//!
//! - Random-access reads of remote files over HTTP/HTTPS Range requests
//! - Async and blocking call styles over one shared implementation
//! - A single bounded in-memory window, replaced wholesale on each miss
//! - Shareable transport: one [`HttpTransport`] can back many readers
//! - Cancellation of in-flight fetches via a `CancellationToken`
//!
//! ## Example
//!
//! ```no_run
//! use std::io::SeekFrom;
//! use rangeseek::RangeReader;
//!
//! #[tokio::main]
//! async fn main() -> rangeseek::Result<()> {
//!     let mut reader = RangeReader::open("https://example.com/large.bin").await?;
//!     println!("{} bytes", reader.len());
//!
//!     // Read a header, then jump near the end without fetching the middle.
//!     let mut header = [0u8; 64];
//!     reader.read(&mut header).await?;
//!     reader.seek(SeekFrom::End(-64))?;
//!     let mut trailer = [0u8; 64];
//!     reader.read(&mut trailer).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Synchronous callers use [`BlockingRangeReader`], which implements
//! [`std::io::Read`] and [`std::io::Seek`] and must not be used from inside
//! an async runtime.

pub mod blocking;
pub mod error;
pub mod reader;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use blocking::BlockingRangeReader;
pub use error::{Error, Result};
pub use reader::{DEFAULT_WINDOW_SIZE, RangeReader};
pub use transport::{HttpTransport, RangeResponse, RangeTransport};
