//! Dispatch of frozen exchanges through the transport.

use crate::codec::BodyCodec;

use super::{Error, Exchange, HttpResponse, RawResponse, Transport};

/// Performs exchanges: applies the configured deadline, delegates the
/// network call to the transport, and assembles the typed response.
///
/// One dispatcher serves any number of concurrent exchanges; it holds no
/// per-exchange state.
#[derive(Debug)]
pub(crate) struct Dispatcher<C> {
    transport: C,
}

impl<C> Dispatcher<C> {
    pub(crate) const fn new(transport: C) -> Self {
        Self { transport }
    }
}

impl<C: Transport> Dispatcher<C> {
    /// Performs one exchange and decodes the response with `codec`.
    pub(crate) async fn dispatch<T>(
        &self,
        exchange: Exchange,
        codec: &BodyCodec<T>,
    ) -> Result<HttpResponse<T>, Error> {
        tracing::debug!(method = %exchange.method, url = %exchange.url, "dispatching request");

        let raw = match self.perform(&exchange).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(url = %exchange.url, error = %e, "exchange failed");
                return Err(e);
            }
        };

        tracing::debug!(status = %raw.status, "exchange completed");
        HttpResponse::from_raw(raw, codec)
    }

    /// Runs the transport call under the exchange's deadline, if one is set.
    ///
    /// A deadline of `None` means the send never times out on our side; the
    /// transport may still report its own timeout.
    async fn perform(&self, exchange: &Exchange) -> Result<RawResponse, Error> {
        match exchange.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.transport.exchange(exchange))
                .await
                .map_err(|_| Error::Timeout)?
                .map_err(Error::from),
            None => self.transport.exchange(exchange).await.map_err(Error::from),
        }
    }
}
