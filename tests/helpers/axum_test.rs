// ABOUTME: In-process request builder for exercising the Pressroom router in tests
// ABOUTME: Sends requests through tower oneshot and buffers the response body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde::Serialize;
use tower::ServiceExt;

/// Request builder executed against a router with `oneshot`
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl AxumTestRequest {
    pub fn get(uri: &str) -> Self {
        Self {
            method: Method::GET,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(uri: &str) -> Self {
        Self {
            method: Method::POST,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[allow(dead_code)]
    pub fn delete(uri: &str) -> Self {
        Self {
            method: Method::DELETE,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[allow(dead_code)]
    pub fn patch(uri: &str) -> Self {
        Self {
            method: Method::PATCH,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Authenticate with a session token
    #[allow(dead_code)]
    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    /// JSON body with the matching content type
    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        self.body = Some(serde_json::to_string(data).expect("Failed to serialize JSON"));
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self
    }

    pub async fn send(self, app: Router) -> AxumTestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);

        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }

        let body = self.body.unwrap_or_default();
        let request = builder
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = app
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        AxumTestResponse::from_response(response).await
    }
}

/// Buffered response
pub struct AxumTestResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl AxumTestResponse {
    async fn from_response(response: axum::http::Response<Body>) -> Self {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();
        Self { status, body }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Deserialize the body
    pub fn json<T: serde::de::DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to deserialize JSON response")
    }

    pub fn text(self) -> String {
        String::from_utf8(self.body).expect("Failed to decode response as UTF-8")
    }

    /// Panics with the body included when the status differs
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Assert the `{"error": {"code": ...}}` envelope carries `code`
    pub fn assert_error_code(self, code: &str) -> Self {
        let body: serde_json::Value =
            serde_json::from_slice(&self.body).expect("error body is not JSON");
        assert_eq!(body["error"]["code"], code, "error body: {body}");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::{get, patch};
    use axum::Json;

    fn echo_router() -> Router {
        Router::new()
            .route(
                "/echo",
                patch(|Json(body): Json<serde_json::Value>| async move { Json(body) })
                    .delete(|| async { StatusCode::NO_CONTENT }),
            )
            .route(
                "/whoami",
                get(|headers: HeaderMap| async move {
                    headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("anonymous")
                        .to_owned()
                }),
            )
    }

    #[tokio::test]
    async fn test_bearer_header_is_sent() {
        let response = AxumTestRequest::get("/whoami")
            .bearer("session-token")
            .send(echo_router())
            .await
            .assert_status(StatusCode::OK);
        assert_eq!(response.text(), "Bearer session-token");
    }

    #[tokio::test]
    async fn test_patch_json_round_trip() {
        let body: serde_json::Value = AxumTestRequest::patch("/echo")
            .json(&serde_json::json!({"headline": "Otters"}))
            .send(echo_router())
            .await
            .assert_status(StatusCode::OK)
            .json();
        assert_eq!(body["headline"], "Otters");
    }

    #[tokio::test]
    async fn test_delete_and_missing_route() {
        let response = AxumTestRequest::delete("/echo").send(echo_router()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = AxumTestRequest::get("/nowhere").send(echo_router()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
