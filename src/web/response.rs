//! Typed response wrapper with on-demand body views.

use serde::de::DeserializeOwned;

use crate::codec::{BodyCodec, DecodeError, JsonArray, JsonObject};
use crate::headers::CaseInsensitiveMap;

use super::{Error, RawResponse};

/// An HTTP response bound to the codec selected at request-build time.
///
/// The primary body is decoded exactly once, when the response is assembled
/// from the transport's raw result; [`body`](Self::body) returns the cached
/// value. The `body_as_*` views independently re-decode the raw bytes with
/// well-known codecs, so a failing view never invalidates the response or
/// the primary body. A response is immutable after construction.
#[derive(Debug)]
pub struct HttpResponse<T> {
    version: http::Version,
    status: http::StatusCode,
    headers: CaseInsensitiveMap,
    cookies: Vec<String>,
    raw_body: Option<Vec<u8>>,
    body: Option<T>,
}

impl<T> HttpResponse<T> {
    /// Assembles a typed response from the transport's raw result.
    ///
    /// Collapses raw header pairs into the case-insensitive map (last write
    /// wins), extracts every `Set-Cookie` value in occurrence order, and
    /// decodes the body with the request's codec. An empty raw body is
    /// treated as absent and the codec is not applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body does not match the codec's
    /// shape; the failing bytes are attached to the carried [`DecodeError`].
    pub(crate) fn from_raw(raw: RawResponse, codec: &BodyCodec<T>) -> Result<Self, Error> {
        let mut headers = CaseInsensitiveMap::new();
        let mut cookies = Vec::new();

        for (name, value) in raw.headers {
            if name.eq_ignore_ascii_case("set-cookie") {
                cookies.push(value.clone());
            }
            // Unusable names from the wire are skipped rather than fatal
            let _ = headers.insert(&name, value);
        }

        let raw_body = if raw.body.is_empty() {
            None
        } else {
            Some(raw.body)
        };

        let body = match &raw_body {
            Some(bytes) => Some(
                codec
                    .decode(bytes)
                    .map_err(|e| e.attach_raw(bytes))?,
            ),
            None => None,
        };

        Ok(Self {
            version: raw.version,
            status: raw.status,
            headers,
            cookies,
            raw_body,
            body,
        })
    }

    /// Returns the protocol version of the response.
    #[must_use]
    pub const fn version(&self) -> http::Version {
        self.version
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> http::StatusCode {
        self.status
    }

    /// Returns the status message for the status code.
    #[must_use]
    pub fn status_message(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the response headers.
    ///
    /// Repeated wire headers collapse to their last value; use
    /// [`cookies`](Self::cookies) for the full `Set-Cookie` sequence.
    #[must_use]
    pub const fn headers(&self) -> &CaseInsensitiveMap {
        &self.headers
    }

    /// Returns the value of the named header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns every `Set-Cookie` header value in occurrence order.
    #[must_use]
    pub fn cookies(&self) -> &[String] {
        &self.cookies
    }

    /// Returns the body decoded with the codec selected on the request.
    ///
    /// Decoding happened once at construction; this is the cached value.
    /// `None` when the response had no body.
    #[must_use]
    pub const fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    /// Returns the raw body bytes regardless of the selected codec.
    ///
    /// `None` when the response had no body.
    #[must_use]
    pub fn body_as_buffer(&self) -> Option<&[u8]> {
        self.raw_body.as_deref()
    }

    /// Re-decodes the raw body with the given codec.
    ///
    /// Absent bodies yield `Ok(None)`; decode failures are local to this
    /// call and carry the raw bytes.
    fn view<U>(&self, codec: &BodyCodec<U>) -> Result<Option<U>, DecodeError> {
        match &self.raw_body {
            Some(bytes) => codec
                .decode(bytes)
                .map(Some)
                .map_err(|e| e.attach_raw(bytes)),
            None => Ok(None),
        }
    }

    /// Returns the body decoded as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is present but not valid UTF-8.
    pub fn body_as_string(&self) -> Result<Option<String>, DecodeError> {
        self.view(&BodyCodec::string())
    }

    /// Returns the body decoded as a string in the given charset.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is present but not valid in the
    /// charset, or the charset is unsupported.
    pub fn body_as_string_with(&self, charset: &str) -> Result<Option<String>, DecodeError> {
        self.view(&BodyCodec::string_with(charset))
    }

    /// Returns the body decoded as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is present but not a JSON object.
    pub fn body_as_json_object(&self) -> Result<Option<JsonObject>, DecodeError> {
        self.view(&BodyCodec::json_object())
    }

    /// Returns the body decoded as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is present but not a JSON array.
    pub fn body_as_json_array(&self) -> Result<Option<JsonArray>, DecodeError> {
        self.view(&BodyCodec::json_array())
    }

    /// Returns the body decoded as JSON into an arbitrary type.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is present but does not match the
    /// target shape.
    pub fn body_as_json<R: DeserializeOwned>(&self) -> Result<Option<R>, DecodeError> {
        self.view(&BodyCodec::<R>::json())
    }
}
