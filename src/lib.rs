//! A fluent HTTP client library.
//!
//! A [`web::WebClient`] produces request builders pre-seeded with its
//! default target; builders are configured through fluent chaining and
//! consumed by a terminal send operation that performs the exchange through
//! a pluggable transport and decodes the response with the
//! [`codec::BodyCodec`] selected at build time.

pub mod codec;
pub mod headers;
pub mod web;
