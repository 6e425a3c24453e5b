//! Per-request target defaults.

use serde::Deserialize;

/// Target defaults seeded into every request builder.
///
/// Each field can be overridden per request through the builder's fluent
/// setters. Deserializes from configuration with per-field defaults, so a
/// partial document like `{"host": "api.example.com", "ssl": true}` fills
/// the rest in.
///
/// # Defaults
///
/// - `host`: `"localhost"`
/// - `port`: `80`
/// - `ssl`: `false`
/// - `uri`: `""`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Host name the request is sent to.
    pub host: String,

    /// Port the request is sent to.
    pub port: u16,

    /// Whether the exchange is TLS-wrapped (`https`).
    pub ssl: bool,

    /// Relative request URI (path template, optionally with a query string).
    pub uri: String,
}

impl RequestOptions {
    /// Default host name.
    pub const DEFAULT_HOST: &'static str = "localhost";

    /// Default port.
    pub const DEFAULT_PORT: u16 = 80;

    /// SSL disabled by default.
    pub const DEFAULT_SSL: bool = false;

    /// Default relative request URI.
    pub const DEFAULT_URI: &'static str = "";

    /// Creates options with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            ssl: Self::DEFAULT_SSL,
            uri: Self::DEFAULT_URI.to_string(),
        }
    }

    /// Sets the host name.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets whether SSL/TLS is enabled.
    #[must_use]
    pub const fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Sets the relative request URI.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new()
    }
}
