//! Error types for body encoding and decoding.

use thiserror::Error;

/// Error produced when an outbound body cannot be serialized.
///
/// This fails the send before any network I/O occurs. It typically indicates
/// a programming error in the value being sent rather than a transient
/// failure.
#[derive(Debug, Error)]
#[error("failed to encode request body: {reason}")]
pub struct EncodeError {
    reason: String,
    #[source]
    source: Option<serde_json::Error>,
}

impl EncodeError {
    pub(crate) fn from_json(source: serde_json::Error) -> Self {
        Self {
            reason: source.to_string(),
            source: Some(source),
        }
    }
}

/// Error produced when a response body does not match a codec's expected
/// shape.
///
/// This is a recoverable, per-request error: a decode failure from the
/// primary codec surfaces as the send's error result, and a decode failure
/// from an on-demand response view is local to that call. It never affects
/// other exchanges.
///
/// When the failing bytes are known they are carried on the error, so the
/// raw body remains retrievable even when decoding failed.
#[derive(Debug, Error)]
#[error("failed to decode response body: {reason}")]
pub struct DecodeError {
    reason: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    raw: Option<Vec<u8>>,
}

impl DecodeError {
    /// Creates a decode error with the given reason.
    ///
    /// Intended for user-supplied decoders built with
    /// [`BodyCodec::create`](super::BodyCodec::create).
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
            raw: None,
        }
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub(crate) fn from_json(source: serde_json::Error) -> Self {
        Self {
            reason: source.to_string(),
            source: Some(Box::new(source)),
            raw: None,
        }
    }

    /// Records the bytes that failed to decode, unless already recorded.
    pub(crate) fn attach_raw(mut self, bytes: &[u8]) -> Self {
        if self.raw.is_none() {
            self.raw = Some(bytes.to_vec());
        }
        self
    }

    /// Returns the raw bytes that failed to decode, when known.
    #[must_use]
    pub fn raw_body(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }
}
