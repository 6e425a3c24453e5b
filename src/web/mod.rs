//! Fluent HTTP client layer.
//!
//! This module provides types and traits for:
//! - Creating requests from a client factory ([`WebClient`])
//! - Building requests fluently ([`HttpRequest`])
//! - Handling typed responses ([`HttpResponse`])
//! - Abstracting the network transport ([`Transport`], [`Exchange`],
//!   [`RawResponse`])
//! - Production transport implementation ([`ReqwestTransport`])
//! - Per-request target defaults ([`RequestOptions`])

mod client;
mod dispatch;
mod error;
mod factory;
mod options;
mod request;
mod response;
mod transport;

#[cfg(test)]
mod factory_tests;
#[cfg(test)]
mod request_tests;

pub use client::ReqwestTransport;
pub use error::{Error, TransportError};
pub use factory::WebClient;
pub use options::RequestOptions;
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use transport::{Exchange, RawResponse, Transport};
