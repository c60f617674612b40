//! Client error type.

use thiserror::Error;

/// Errors raised by the client.
///
/// Inside a fan-out batch these never escape: each one is turned into a
/// [`Payload::Error`](crate::Payload::Error) for the request that produced it.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body could not be decoded into the expected shape.
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the HTTP exchange itself (network or status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
