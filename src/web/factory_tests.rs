//! Tests for the client factory.

use std::sync::{Arc, Mutex};

use crate::codec::Json;

use super::{Error, Exchange, RawResponse, RequestOptions, Transport, TransportError, WebClient};

/// Mock transport recording every frozen exchange.
struct RecordingTransport {
    exchanges: Arc<Mutex<Vec<Exchange>>>,
}

impl RecordingTransport {
    fn new() -> Self {
        Self {
            exchanges: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn exchanges(&self) -> Arc<Mutex<Vec<Exchange>>> {
        Arc::clone(&self.exchanges)
    }
}

impl Transport for RecordingTransport {
    async fn exchange(&self, request: &Exchange) -> Result<RawResponse, TransportError> {
        self.exchanges.lock().unwrap().push(request.clone());
        Ok(RawResponse {
            version: http::Version::HTTP_11,
            status: http::StatusCode::OK,
            headers: vec![],
            body: b"body".to_vec(),
        })
    }
}

fn recording_client() -> (WebClient<RecordingTransport>, Arc<Mutex<Vec<Exchange>>>) {
    let transport = RecordingTransport::new();
    let exchanges = transport.exchanges();
    (WebClient::with_transport(transport), exchanges)
}

mod seeding {
    use super::*;

    #[tokio::test]
    async fn requests_are_seeded_with_factory_defaults() {
        let (client, exchanges) = recording_client();

        client.get("/ping").send().await.unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        assert_eq!(exchange.url.as_str(), "http://localhost/ping");
        assert_eq!(exchange.url.port_or_known_default(), Some(80));
    }

    #[tokio::test]
    async fn with_defaults_overrides_the_seed() {
        let transport = RecordingTransport::new();
        let exchanges = transport.exchanges();
        let client = WebClient::with_transport(transport).with_defaults(
            RequestOptions::new()
                .with_host("api.example.com")
                .with_port(8443)
                .with_ssl(true),
        );

        client.get("/ping").send().await.unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        assert_eq!(exchange.url.scheme(), "https");
        assert_eq!(exchange.url.host_str(), Some("api.example.com"));
        assert_eq!(exchange.url.port(), Some(8443));
    }

    #[tokio::test]
    async fn request_with_uses_explicit_options() {
        let (client, exchanges) = recording_client();

        let options = RequestOptions::new()
            .with_host("other.host")
            .with_port(3000)
            .with_uri("/configured");
        client
            .request_with(http::Method::PUT, &options)
            .send()
            .await
            .unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        assert_eq!(exchange.method, http::Method::PUT);
        assert_eq!(exchange.url.as_str(), "http://other.host:3000/configured");
    }

    #[test]
    fn default_options_are_visible() {
        let (client, _) = recording_client();
        assert_eq!(client.default_options(), &RequestOptions::new());
    }

    #[tokio::test]
    async fn reconfigured_clone_leaves_the_original_untouched() {
        let transport = RecordingTransport::new();
        let exchanges = transport.exchanges();
        let client = WebClient::with_transport(transport);
        let reconfigured = client
            .clone()
            .with_defaults(RequestOptions::new().with_host("clone.example.com"));

        client.get("/x").send().await.unwrap();
        reconfigured.get("/x").send().await.unwrap();

        let recorded = exchanges.lock().unwrap();
        assert_eq!(recorded[0].url.host_str(), Some("localhost"));
        assert_eq!(recorded[1].url.host_str(), Some("clone.example.com"));
    }

    #[tokio::test]
    async fn clones_share_defaults_and_transport() {
        let transport = RecordingTransport::new();
        let exchanges = transport.exchanges();
        let client = WebClient::with_transport(transport)
            .with_defaults(RequestOptions::new().with_host("shared.host"));
        let clone = client.clone();

        clone.get("/from-clone").send().await.unwrap();
        client.get("/from-original").send().await.unwrap();

        let recorded = exchanges.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|e| e.url.host_str() == Some("shared.host")));
    }
}

mod verbs {
    use super::*;

    #[tokio::test]
    async fn verb_helpers_set_the_method() {
        let (client, exchanges) = recording_client();

        client.get("/r").send().await.unwrap();
        client.post("/r").send().await.unwrap();
        client.put("/r").send().await.unwrap();
        client.delete("/r").send().await.unwrap();
        client.patch("/r").send().await.unwrap();
        client.head("/r").send().await.unwrap();

        let methods: Vec<http::Method> = exchanges
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.method.clone())
            .collect();
        assert_eq!(
            methods,
            vec![
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::PATCH,
                http::Method::HEAD,
            ]
        );
    }

    #[tokio::test]
    async fn default_codec_yields_raw_bytes() {
        let (client, _) = recording_client();

        let response = client.get("/r").send().await.unwrap();

        assert_eq!(response.body(), Some(&b"body".to_vec()));
    }
}

mod absolute_uris {
    use super::*;

    #[tokio::test]
    async fn https_absolute_uri_is_split_into_target_parts() {
        let (client, exchanges) = recording_client();

        client
            .get_abs("https://api.example.com/v1/items?limit=10")
            .send()
            .await
            .unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        assert_eq!(exchange.url.scheme(), "https");
        assert_eq!(exchange.url.host_str(), Some("api.example.com"));
        assert_eq!(exchange.url.port_or_known_default(), Some(443));
        assert_eq!(exchange.url.path(), "/v1/items");
        assert_eq!(exchange.url.query(), Some("limit=10"));
    }

    #[tokio::test]
    async fn explicit_port_in_absolute_uri_is_kept() {
        let (client, exchanges) = recording_client();

        client
            .post_abs("http://localhost:9000/hook")
            .send()
            .await
            .unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        assert_eq!(exchange.method, http::Method::POST);
        assert_eq!(exchange.url.as_str(), "http://localhost:9000/hook");
    }

    #[tokio::test]
    async fn absolute_uri_can_still_be_reconfigured() {
        let (client, exchanges) = recording_client();

        client
            .get_abs("http://one.example.com/a")
            .add_query_param("q", "1")
            .send()
            .await
            .unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        assert_eq!(exchange.url.query(), Some("q=1"));
    }

    #[tokio::test]
    async fn unparseable_absolute_uri_fails_the_send() {
        let (client, exchanges) = recording_client();

        let result = client.get_abs("not a url at all").send().await;

        assert!(matches!(result, Err(Error::InvalidUrl(_))));
        assert!(exchanges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_http_scheme_fails_the_send() {
        let (client, _) = recording_client();

        let result = client.get_abs("ftp://files.example.com/x").send().await;

        match result {
            Err(Error::InvalidUrl(reason)) => assert!(reason.contains("unsupported scheme")),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }
}

mod json_configuration {
    use super::*;

    #[tokio::test]
    async fn pretty_json_configuration_shapes_outbound_bodies() {
        let transport = RecordingTransport::new();
        let exchanges = transport.exchanges();
        let client = WebClient::with_transport(transport).with_json(Json::pretty());

        client
            .post("/items")
            .send_json(&serde_json::json!({"a": 1}))
            .await
            .unwrap();

        let exchange = exchanges.lock().unwrap().pop().unwrap();
        let body = String::from_utf8(exchange.body.unwrap()).unwrap();
        assert!(body.contains('\n'));
    }
}
