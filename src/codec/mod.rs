//! Body encoding and decoding.
//!
//! This module provides:
//! - Typed response body decoders ([`BodyCodec`])
//! - An explicit JSON encoder/decoder configuration ([`Json`])
//! - Codec error types ([`DecodeError`], [`EncodeError`])
//!
//! A [`BodyCodec<T>`] is a stateless pure function from raw response bytes to
//! a value of the declared result type. Codecs are selected on the request
//! builder and applied once when the response is assembled; well-known codecs
//! also back the on-demand response views.

mod body;
mod error;
mod json;


pub use body::{BodyCodec, JsonArray, JsonObject};
pub use error::{DecodeError, EncodeError};
pub use json::Json;
