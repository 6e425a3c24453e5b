//! JSON encoder/decoder configuration.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{DecodeError, EncodeError};

/// An explicitly constructed JSON encode/decode configuration.
///
/// The client factory holds one of these and uses it for every outbound
/// JSON body. Keeping the configuration on a value passed at construction
/// time (instead of process-wide shared mapper state) means two clients can
/// encode differently without affecting each other.
///
/// # Example
///
/// ```
/// use webclient::codec::Json;
///
/// #[derive(serde::Serialize)]
/// struct Item {
///     id: u32,
/// }
///
/// let json = Json::new();
/// let bytes = json.encode(&Item { id: 7 }).unwrap();
/// assert_eq!(bytes, br#"{"id":7}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json {
    pretty: bool,
}

impl Json {
    /// Creates a configuration producing compact output.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Creates a configuration producing pretty-printed output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Returns true if output is pretty-printed.
    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Encodes a value to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the value cannot be serialized.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        result.map_err(EncodeError::from_json)
    }

    /// Encodes a value to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the value cannot be serialized.
    pub fn encode_to_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, EncodeError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.map_err(EncodeError::from_json)
    }

    /// Decodes JSON bytes to a value of the target type.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the bytes are not valid JSON or do not
    /// match the target shape.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::from_json)
    }
}

impl Default for Json {
    fn default() -> Self {
        Self::new()
    }
}
