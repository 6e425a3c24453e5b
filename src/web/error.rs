//! Error types for request dispatch.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};
use crate::headers::InvalidKeyError;

/// Error type for a single transport exchange.
///
/// Describes what went wrong at the network level without dictating a
/// recovery strategy. The client never retries on its own; retry, if
/// desired, is the caller's responsibility.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target could not be reached or the connection broke mid-exchange.
    ///
    /// This includes DNS resolution failures, connection refused, and other
    /// network-level errors.
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response could not be parsed as a valid status line and headers.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The transport reported its own deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// The target URL could not be used.
    ///
    /// This typically indicates a configuration error rather than a
    /// transient failure.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Terminal error of a send operation.
///
/// Builder-level configuration errors ([`Error::InvalidKey`],
/// [`Error::Encode`], [`Error::InvalidUrl`]) are produced before any network
/// I/O occurs. Dispatch-level errors ([`Error::Connection`],
/// [`Error::Protocol`], [`Error::Timeout`]) are the result of the exchange
/// itself. [`Error::Decode`] means the exchange completed but the body did
/// not match the selected codec; the failing bytes remain retrievable from
/// the carried [`DecodeError`].
#[derive(Debug, Error)]
pub enum Error {
    /// A header or parameter key supplied to the builder was unusable.
    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),

    /// The outbound body could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The response body did not match the selected codec's shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The target could not be reached.
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response could not be parsed as valid HTTP.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request target could not be assembled into a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(source) => Self::Connection(source),
            TransportError::Protocol(reason) => Self::Protocol(reason),
            TransportError::Timeout => Self::Timeout,
            TransportError::InvalidUrl(reason) => Self::InvalidUrl(reason),
        }
    }
}
