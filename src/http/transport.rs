// Transport used by the peer client: one JSON request, one JSON response.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::trace;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use super::error::HttpError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 0;

/// The I/O capability the peer client is built on.
///
/// Each call performs a single exchange with the peer and returns the parsed
/// JSON body, or the reason the exchange failed. Implementations decide how
/// connections, TLS and timeouts are handled.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn get_json(&self, url: Url) -> Result<Value, HttpError>;

    async fn post_json(&self, url: Url, body: String) -> Result<Value, HttpError>;

    async fn delete_json(&self, url: Url) -> Result<Value, HttpError>;
}

/// [`PeerTransport`] over reqwest, serving both `http` and `https` URLs.
///
/// Retries, when configured, apply to GET and DELETE only. POST submits
/// chaincode and registrar requests and is always sent exactly once.
pub struct HttpTransport {
    client: reqwest_middleware::ClientWithMiddleware,
    submit_client: reqwest_middleware::ClientWithMiddleware,
    last_latency: RwLock<Option<(Duration, Instant)>>,
}

impl HttpTransport {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(DEFAULT_MAX_RETRIES, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_config(max_retries: u32, timeout: Duration) -> Result<Self, HttpError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;

        let submit_client = reqwest_middleware::ClientBuilder::new(inner_client.clone()).build();

        let mut builder = reqwest_middleware::ClientBuilder::new(inner_client);
        if max_retries > 0 {
            let retry_policy =
                reqwest_retry::policies::ExponentialBackoff::builder().build_with_max_retries(max_retries);
            builder = builder.with(reqwest_retry::RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            client: builder.build(),
            submit_client,
            last_latency: RwLock::new(None),
        })
    }

    pub async fn get_latency(&self) -> Option<Duration> {
        self.last_latency.read().await.map(|(d, _)| d)
    }

    async fn send(&self, method: Method, url: Url, body: Option<String>) -> Result<Value, HttpError> {
        let start = Instant::now();

        let client = if method == Method::POST {
            &self.submit_client
        } else {
            &self.client
        };
        let mut req = client.request(method, url);
        if let Some(body) = body {
            req = req.body(body).header("Content-Type", "application/json");
        }

        let resp = req.send().await?;
        self.update_latency(start.elapsed()).await;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(HttpError::ServerError { status, body });
        }

        let bytes = resp.bytes().await?;
        trace!(status:% = status, len = bytes.len(); "Peer response received");
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn update_latency(&self, duration: Duration) {
        *self.last_latency.write().await = Some((duration, Instant::now()));
    }
}

#[async_trait]
impl PeerTransport for HttpTransport {
    async fn get_json(&self, url: Url) -> Result<Value, HttpError> {
        self.send(Method::GET, url, None).await
    }

    async fn post_json(&self, url: Url, body: String) -> Result<Value, HttpError> {
        self.send(Method::POST, url, Some(body)).await
    }

    async fn delete_json(&self, url: Url) -> Result<Value, HttpError> {
        self.send(Method::DELETE, url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_parses_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chain/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"height": 3})))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let value = transport.get_json(url(&mock_server, "/chain/")).await.unwrap();

        assert_eq!(value, json!({"height": 3}));
        assert!(transport.get_latency().await.is_some());
    }

    #[tokio::test]
    async fn test_post_json_sends_body_with_content_type() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/registrar"))
            .and(header("Content-Type", "application/json"))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"OK": "done"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let value = transport
            .post_json(url(&mock_server, "/registrar"), r#"{"a":1}"#.to_string())
            .await
            .unwrap();

        assert_eq!(value["OK"], "done");
    }

    #[tokio::test]
    async fn test_delete_json_with_empty_body_is_null() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/registrar/jim"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let value = transport.delete_json(url(&mock_server, "/registrar/jim")).await.unwrap();

        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_non_success_status_is_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport.get_json(url(&mock_server, "/chain/blocks/99")).await.unwrap_err();

        match err {
            HttpError::ServerError { status, body } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(body, "not found");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_server_errors_are_not_retried_by_default() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        assert!(transport.get_json(url(&mock_server, "/chain/")).await.is_err());
    }

    #[tokio::test]
    async fn test_get_is_retried_when_configured() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::with_config(2, Duration::from_secs(5)).unwrap();
        assert!(transport.get_json(url(&mock_server, "/chain/")).await.is_err());
    }

    #[tokio::test]
    async fn test_post_is_sent_once_even_with_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/devops/invoke"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::with_config(2, Duration::from_secs(5)).unwrap();
        let err = transport
            .post_json(url(&mock_server, "/devops/invoke"), "{}".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::ServerError { .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_json_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport.get_json(url(&mock_server, "/chain/")).await.unwrap_err();

        assert!(matches!(err, HttpError::JsonError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_request_failure() {
        let transport = HttpTransport::with_config(0, Duration::from_secs(2)).unwrap();
        let err = transport
            .get_json(Url::parse("http://127.0.0.1:1/chain/").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::MiddlewareError(_) | HttpError::RequestFailed(_)));
    }
}
