use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the reader.
///
/// Nothing is retried internally; every failure surfaces to the call that
/// triggered it, leaving the reader's cursor and cached window unchanged so
/// the caller may retry the same operation.
#[derive(Error, Debug)]
pub enum Error {
    /// Construction could not determine the resource's total length.
    #[error("cannot determine resource length: {0}")]
    Precondition(String),
    /// The HTTP transport failed while fetching a range.
    #[error("range fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A ranged request was answered with something other than 206.
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),
    /// A ranged request returned an empty body where bytes were expected.
    #[error("server returned an empty body for range {start}-{end}")]
    EmptyBody { start: u64, end: u64 },
    /// A seek target fell outside `[0, length]`.
    #[error("seek position {position} is outside of [0, {length}]")]
    OutOfRange { position: i128, length: u64 },
    /// The resource is read-only; writes and resizes always fail.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    /// An in-flight range fetch was cancelled by the caller.
    #[error("range fetch cancelled")]
    Cancelled,
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::Precondition(_) => io::ErrorKind::InvalidData,
            Error::Transport(_) | Error::Status(_) => io::ErrorKind::Other,
            Error::EmptyBody { .. } => io::ErrorKind::UnexpectedEof,
            Error::OutOfRange { .. } => io::ErrorKind::InvalidInput,
            Error::Unsupported(_) => io::ErrorKind::Unsupported,
            // Not Interrupted: std readers retry on Interrupted, and a
            // cancelled token never resets, so that would loop forever.
            Error::Cancelled => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
