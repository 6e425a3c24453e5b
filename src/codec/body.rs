//! Typed response body codecs.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::DecodeError;

/// A decoded JSON object body.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A decoded JSON array body.
pub type JsonArray = Vec<serde_json::Value>;

/// A pure function from raw response bytes to a decoded value of the
/// declared result type.
///
/// Codecs are stateless and cheap to clone (the decode function is shared
/// behind an [`Arc`]), so one codec can be reused across any number of
/// requests. The codec selected on a request builder determines the type
/// parameter of the resulting response; well-known codecs also back the
/// on-demand views on the response wrapper.
///
/// # Example
///
/// ```
/// use webclient::codec::BodyCodec;
///
/// let codec = BodyCodec::string();
/// assert_eq!(codec.decode(b"hello").unwrap(), "hello");
///
/// let discard = BodyCodec::none();
/// assert_eq!(discard.decode(b"anything").unwrap(), ());
/// ```
pub struct BodyCodec<T> {
    decode: Arc<dyn Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync>,
}

impl<T> Clone for BodyCodec<T> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T> fmt::Debug for BodyCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyCodec")
            .field("result_type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> BodyCodec<T> {
    /// Creates a codec from an arbitrary decode function.
    pub fn create<F>(decode: F) -> Self
    where
        F: Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
        }
    }

    /// Decodes the given bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the bytes do not match the codec's
    /// expected shape.
    pub fn decode(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        (self.decode)(bytes)
    }
}

impl BodyCodec<Vec<u8>> {
    /// The raw bytes codec: returns the body unchanged.
    #[must_use]
    pub fn buffer() -> Self {
        Self::create(|bytes| Ok(bytes.to_vec()))
    }
}

impl BodyCodec<String> {
    /// The strict UTF-8 string codec.
    #[must_use]
    pub fn string() -> Self {
        Self::create(|bytes| decode_charset(bytes, "utf-8"))
    }

    /// A string codec for a specific charset.
    ///
    /// Supported charsets: `utf-8`, `us-ascii`, `iso-8859-1` (and the
    /// `latin-1` alias). Unknown charsets fail with [`DecodeError`] at
    /// decode time.
    #[must_use]
    pub fn string_with(charset: impl Into<String>) -> Self {
        let charset = charset.into();
        Self::create(move |bytes| decode_charset(bytes, &charset))
    }
}

impl BodyCodec<JsonObject> {
    /// The JSON object codec.
    #[must_use]
    pub fn json_object() -> Self {
        Self::create(|bytes| serde_json::from_slice(bytes).map_err(DecodeError::from_json))
    }
}

impl BodyCodec<JsonArray> {
    /// The JSON array codec.
    #[must_use]
    pub fn json_array() -> Self {
        Self::create(|bytes| serde_json::from_slice(bytes).map_err(DecodeError::from_json))
    }
}

impl BodyCodec<()> {
    /// The discard codec: yields `()` for any input, including empty input.
    #[must_use]
    pub fn none() -> Self {
        Self::create(|_| Ok(()))
    }
}

impl<T: DeserializeOwned> BodyCodec<T> {
    /// A codec decoding JSON into an arbitrary deserializable type.
    #[must_use]
    pub fn json() -> Self {
        Self::create(|bytes| serde_json::from_slice(bytes).map_err(DecodeError::from_json))
    }
}

/// Decodes bytes as a string in the named charset.
fn decode_charset(bytes: &[u8], charset: &str) -> Result<String, DecodeError> {
    match charset.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8(bytes.to_vec())
            .map_err(|e| DecodeError::new("body is not valid UTF-8").with_source(e)),
        "us-ascii" | "ascii" => {
            if bytes.is_ascii() {
                // Safe: ASCII is a subset of UTF-8
                Ok(String::from_utf8_lossy(bytes).into_owned())
            } else {
                Err(DecodeError::new("body contains non-ASCII bytes"))
            }
        }
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        other => Err(DecodeError::new(format!("unsupported charset {other:?}"))),
    }
}
