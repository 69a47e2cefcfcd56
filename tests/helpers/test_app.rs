#![allow(dead_code)]
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use ticket_portal::bootstrap::build_app_state_with;
use ticket_portal::config::{Config, CrmConfig};
use ticket_portal::infrastructure::crm::HubSpotClient;
use ticket_portal::infrastructure::http::router::build_router;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

/// Configuration pointing the CRM client at a mock server
pub fn test_config(crm_url: &str, token: Option<&str>) -> Config {
    Config {
        crm: CrmConfig::new(crm_url, token.map(str::to_string)),
        ..Config::default()
    }
}

pub fn router_for(config: &Config) -> Router {
    let crm = HubSpotClient::new(&config.crm).expect("Failed to build CRM client");
    let state = build_app_state_with(Arc::new(crm), config);
    build_router(state, config)
}

/// Gateway router wired to a wiremock CRM
pub struct TestApp {
    pub crm: MockServer,
    pub router: Router,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn without_token() -> Self {
        Self::start_with(|config| config.crm.access_token = None).await
    }

    pub async fn start_with(customize: impl FnOnce(&mut Config)) -> Self {
        let crm = MockServer::start().await;
        let mut config = test_config(&crm.uri(), Some(TEST_TOKEN));
        customize(&mut config);
        let router = router_for(&config);
        Self { crm, router }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Requests the CRM mock received, in order
    pub async fn crm_requests(&self) -> Vec<wiremock::Request> {
        self.crm.received_requests().await.unwrap_or_default()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` part of the first Set-Cookie header for `name`
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", name)))
            .map(|v| v.split(';').next().unwrap_or_default().to_string())
    }

    pub fn set_cookie_header(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", name)))
            .map(str::to_string)
    }
}

/// Multipart body builder for the create-ticket route
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "ticket-portal-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, path: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .expect("Failed to build multipart request")
    }
}
