//! Ordered, case-insensitive key/value containers.
//!
//! HTTP header names compare case-insensitively, and the client applies the
//! same rule to query and path parameters. [`CaseInsensitiveMap`] is the
//! shared container for all three: keys are normalized on the way in,
//! iteration preserves insertion order, and re-inserting a key under a
//! different casing overwrites the existing entry in place.

mod map;


pub use map::{CaseInsensitiveMap, InvalidKeyError};
