use crate::UploadError;
use bytes::Bytes;
use picbed_config::TransportSettings;
use std::time::Duration;

pub use reqwest::Method;

/// A single outgoing request: method, URL, headers and raw body.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests on behalf of backends. Retries, TLS and proxies are the
/// implementation's business.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse, UploadError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ReqwestTransport {
    pub fn new(settings: &TransportSettings) -> Self {
        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));

        Self {
            client: reqwest::Client::new(),
            timeout,
            user_agent: settings.user_agent.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse, UploadError> {
        tracing::debug!("{} {} ({} bytes)", request.method, request.url, request.body.len());

        let mut builder = self.client.request(request.method.clone(), &request.url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if request.header_value("user-agent").is_none() {
            builder = builder.header(reqwest::header::USER_AGENT, &self.user_agent);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!("{} -> {}", request.url, status);

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TransportSettings {
        TransportSettings {
            timeout_secs: 5,
            user_agent: "picbed-test".to_string(),
        }
    }

    #[tokio::test]
    async fn sends_method_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/v1/abc.png")
            .match_header("content-type", "image/png")
            .match_header("user-agent", "picbed-test")
            .match_body("raw-bytes")
            .with_status(200)
            .with_body(r#"{"url":"https://img.local/abc.png"}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&settings());
        let request = TransportRequest::put(format!("{}/v1/abc.png", server.url()))
            .header("Content-Type", "image/png")
            .body(Bytes::from_static(b"raw-bytes"));

        let response = transport.request(request).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert!(response.text().contains("abc.png"));
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/x")
            .with_status(403)
            .with_body("denied")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&settings());
        let response = transport
            .request(TransportRequest::put(format!("{}/x", server.url())))
            .await
            .unwrap();

        assert_eq!(response.status, 403);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::new(&settings());
        let err = transport
            .request(TransportRequest::put("http://127.0.0.1:1/unreachable"))
            .await
            .unwrap_err();

        assert!(err.is_connectivity());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = TransportRequest::put("http://x").header("Content-Type", "image/png");
        assert_eq!(request.header_value("content-type"), Some("image/png"));
        assert_eq!(request.header_value("authorization"), None);
    }
}
