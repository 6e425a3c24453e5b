//! Tests for the fluent request builder and terminal sends.

use std::sync::{Arc, Mutex};

use super::{Error, Exchange, RawResponse, Transport, TransportError, WebClient};

/// Mock transport that records the frozen exchange and returns a canned
/// response.
struct MockTransport {
    response: RawResponse,
    captured: Arc<Mutex<Option<Exchange>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockTransport {
    fn new(response: RawResponse) -> Self {
        Self {
            response,
            captured: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    fn captured(&self) -> Arc<Mutex<Option<Exchange>>> {
        Arc::clone(&self.captured)
    }

    fn calls(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.calls)
    }
}

impl Transport for MockTransport {
    async fn exchange(&self, request: &Exchange) -> Result<RawResponse, TransportError> {
        *self.captured.lock().unwrap() = Some(request.clone());
        *self.calls.lock().unwrap() += 1;
        Ok(self.response.clone())
    }
}

fn ok_response(body: &[u8]) -> RawResponse {
    RawResponse {
        version: http::Version::HTTP_11,
        status: http::StatusCode::OK,
        headers: vec![("content-type".to_string(), "text/plain".to_string())],
        body: body.to_vec(),
    }
}

fn mock_client(body: &[u8]) -> (WebClient<MockTransport>, Arc<Mutex<Option<Exchange>>>) {
    let transport = MockTransport::new(ok_response(body));
    let captured = transport.captured();
    (WebClient::with_transport(transport), captured)
}

fn take_exchange(captured: &Arc<Mutex<Option<Exchange>>>) -> Exchange {
    captured.lock().unwrap().take().expect("no exchange captured")
}

mod target_assembly {
    use super::*;

    #[tokio::test]
    async fn full_target_with_path_and_query_params() {
        let (client, captured) = mock_client(b"");

        client
            .get("/v1/items/{id}")
            .host("api.example.com")
            .port(443)
            .ssl(true)
            .add_path_param("id", "42")
            .add_query_param("limit", "10")
            .send()
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.method, http::Method::GET);
        assert_eq!(exchange.url.scheme(), "https");
        assert_eq!(exchange.url.host_str(), Some("api.example.com"));
        assert_eq!(exchange.url.port_or_known_default(), Some(443));
        assert_eq!(exchange.url.path(), "/v1/items/42");
        assert_eq!(exchange.url.query(), Some("limit=10"));
    }

    #[tokio::test]
    async fn non_default_port_is_kept_in_target() {
        let (client, captured) = mock_client(b"");

        client
            .get("/health")
            .host("localhost")
            .port(8080)
            .send()
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.url.as_str(), "http://localhost:8080/health");
    }

    #[tokio::test]
    async fn path_param_names_match_case_insensitively() {
        let (client, captured) = mock_client(b"");

        client
            .get("/users/{ID}/posts/{Post}")
            .add_path_param("id", "7")
            .add_path_param("POST", "99")
            .send()
            .await
            .unwrap();

        assert_eq!(take_exchange(&captured).url.path(), "/users/7/posts/99");
    }

    #[tokio::test]
    async fn unmatched_placeholder_is_left_verbatim() {
        let (client, captured) = mock_client(b"");

        client.get("/items/{id}").send().await.unwrap();

        assert_eq!(take_exchange(&captured).url.path(), "/items/%7Bid%7D");
    }

    #[tokio::test]
    async fn path_param_values_are_url_encoded() {
        let (client, captured) = mock_client(b"");

        client
            .get("/files/{name}")
            .add_path_param("name", "report 2024")
            .send()
            .await
            .unwrap();

        assert_eq!(take_exchange(&captured).url.path(), "/files/report%202024");
    }

    #[tokio::test]
    async fn path_param_value_with_question_mark_stays_in_the_path() {
        let (client, captured) = mock_client(b"");

        client
            .get("/items/{id}")
            .add_path_param("id", "4?x=1")
            .send()
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.url.path(), "/items/4%3Fx=1");
        assert_eq!(exchange.url.query(), None);
    }

    #[tokio::test]
    async fn path_param_value_with_slash_stays_in_one_segment() {
        let (client, captured) = mock_client(b"");

        client
            .get("/files/{name}")
            .add_path_param("name", "a/b.txt")
            .send()
            .await
            .unwrap();

        assert_eq!(take_exchange(&captured).url.path(), "/files/a%2Fb.txt");
    }

    #[tokio::test]
    async fn inline_query_is_merged_with_query_params() {
        let (client, captured) = mock_client(b"");

        client
            .get("/search?q=widgets")
            .add_query_param("page", "2")
            .send()
            .await
            .unwrap();

        assert_eq!(
            take_exchange(&captured).url.query(),
            Some("q=widgets&page=2")
        );
    }

    #[tokio::test]
    async fn query_param_values_are_url_encoded() {
        let (client, captured) = mock_client(b"");

        client
            .get("/search")
            .add_query_param("q", "two words & more")
            .send()
            .await
            .unwrap();

        assert_eq!(
            take_exchange(&captured).url.query(),
            Some("q=two+words+%26+more")
        );
    }

    #[tokio::test]
    async fn uri_without_leading_slash_is_rooted() {
        let (client, captured) = mock_client(b"");

        client.get("status").send().await.unwrap();

        assert_eq!(take_exchange(&captured).url.path(), "/status");
    }

    #[tokio::test]
    async fn setters_override_seeded_defaults() {
        let (client, captured) = mock_client(b"");

        client
            .get("/old")
            .method(http::Method::DELETE)
            .uri("/new")
            .host("other.example.com")
            .port(9000)
            .send()
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.method, http::Method::DELETE);
        assert_eq!(exchange.url.as_str(), "http://other.example.com:9000/new");
    }
}

mod header_configuration {
    use super::*;

    #[tokio::test]
    async fn put_header_is_forwarded() {
        let (client, captured) = mock_client(b"");

        client
            .get("/")
            .put_header("Authorization", "Bearer token")
            .send()
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.headers.get("authorization"), Some("Bearer token"));
    }

    #[tokio::test]
    async fn put_headers_adds_many() {
        let (client, captured) = mock_client(b"");

        client
            .get("/")
            .put_headers([("X-One", "1"), ("X-Two", "2")])
            .send()
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.headers.get("x-one"), Some("1"));
        assert_eq!(exchange.headers.get("x-two"), Some("2"));
    }

    #[tokio::test]
    async fn blank_header_key_fails_the_send_before_any_network_io() {
        let transport = MockTransport::new(ok_response(b""));
        let calls = transport.calls();
        let client = WebClient::with_transport(transport);

        let result = client.get("/").put_header("  ", "value").send().await;

        assert!(matches!(result, Err(Error::InvalidKey(_))));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn first_builder_error_wins() {
        let (client, _) = mock_client(b"");

        let result = client
            .get("/")
            .put_header("", "first")
            .add_query_param(" ", "second")
            .send()
            .await;

        match result {
            Err(Error::InvalidKey(e)) => assert_eq!(e.key(), ""),
            other => panic!("expected InvalidKey, got {other:?}"),
        }
    }
}

mod body_sends {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct NewItem {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn send_buffer_passes_bytes_without_content_type() {
        let (client, captured) = mock_client(b"");

        client
            .post("/upload")
            .send_buffer(b"\x01\x02\x03".to_vec())
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(exchange.body.as_deref(), Some(&b"\x01\x02\x03"[..]));
        assert_eq!(exchange.headers.get("content-type"), None);
    }

    #[tokio::test]
    async fn send_json_encodes_body_and_sets_content_type() {
        let (client, captured) = mock_client(b"");

        client
            .post("/items")
            .send_json(&NewItem {
                name: "widget".to_string(),
                count: 3,
            })
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(
            exchange.headers.get("content-type"),
            Some("application/json")
        );
        assert_eq!(
            exchange.body.as_deref(),
            Some(br#"{"name":"widget","count":3}"#.as_slice())
        );
    }

    #[tokio::test]
    async fn send_json_accepts_free_form_values() {
        let (client, captured) = mock_client(b"");

        client
            .post("/items")
            .send_json(&serde_json::json!({"ok": true}))
            .await
            .unwrap();

        assert_eq!(
            take_exchange(&captured).body.as_deref(),
            Some(br#"{"ok":true}"#.as_slice())
        );
    }

    #[tokio::test]
    async fn unserializable_body_fails_before_any_network_io() {
        let transport = MockTransport::new(ok_response(b""));
        let calls = transport.calls();
        let client = WebClient::with_transport(transport);

        // Maps with non-string keys cannot be represented in JSON
        let mut body = std::collections::BTreeMap::new();
        body.insert(vec![1u8], "x");

        let result = client.post("/items").send_json(&body).await;

        assert!(matches!(result, Err(Error::Encode(_))));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn send_form_encodes_pairs_and_sets_content_type() {
        let (client, captured) = mock_client(b"");

        client
            .post("/login")
            .send_form([("user", "jo"), ("pass", "p w&d")])
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(
            exchange.headers.get("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(exchange.body.as_deref(), Some(b"user=jo&pass=p+w%26d".as_slice()));
    }

    #[tokio::test]
    async fn send_form_honors_preset_multipart_content_type() {
        let (client, captured) = mock_client(b"");

        client
            .post("/upload")
            .put_header("Content-Type", "multipart/form-data; boundary=xyz")
            .send_form([("field", "value")])
            .await
            .unwrap();

        let exchange = take_exchange(&captured);
        assert_eq!(
            exchange.headers.get("content-type"),
            Some("multipart/form-data; boundary=xyz")
        );
    }

    #[tokio::test]
    async fn send_form_replaces_non_multipart_content_type() {
        let (client, captured) = mock_client(b"");

        client
            .post("/login")
            .put_header("Content-Type", "text/plain")
            .send_form([("a", "1")])
            .await
            .unwrap();

        assert_eq!(
            take_exchange(&captured).headers.get("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }
}

mod codec_swap {
    use super::*;
    use crate::codec::BodyCodec;

    #[tokio::test]
    async fn decode_as_changes_the_result_type() {
        let (client, _) = mock_client(b"hello");

        let response = client
            .get("/greeting")
            .decode_as(BodyCodec::string())
            .send()
            .await
            .unwrap();

        assert_eq!(response.body().map(String::as_str), Some("hello"));
    }

    #[tokio::test]
    async fn original_builder_survives_the_fork() {
        let (client, captured) = mock_client(b"data");

        let original = client.get("/shared").put_header("X-Common", "yes");
        let forked = original.decode_as(BodyCodec::string());

        forked.send().await.unwrap();
        let fork_exchange = take_exchange(&captured);

        original.send().await.unwrap();
        let original_exchange = take_exchange(&captured);

        assert_eq!(fork_exchange.headers.get("x-common"), Some("yes"));
        assert_eq!(original_exchange.headers.get("x-common"), Some("yes"));
        assert_eq!(original_exchange.url.path(), "/shared");
    }

    #[tokio::test]
    async fn fork_configuration_is_a_deep_copy() {
        let (client, captured) = mock_client(b"");

        let original = client.get("/shared");
        let forked = original
            .decode_as(BodyCodec::none())
            .put_header("X-Fork-Only", "1");

        forked.send().await.unwrap();
        let fork_exchange = take_exchange(&captured);

        original.send().await.unwrap();
        let original_exchange = take_exchange(&captured);

        assert_eq!(fork_exchange.headers.get("x-fork-only"), Some("1"));
        assert_eq!(original_exchange.headers.get("x-fork-only"), None);
    }

    #[tokio::test]
    async fn fork_carries_deferred_builder_errors() {
        let (client, _) = mock_client(b"");

        let broken = client.get("/").put_header("", "v");
        let result = broken.decode_as(BodyCodec::string()).send().await;

        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }
}
