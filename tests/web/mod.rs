//! Router harness shared by the HTTP tests.

mod auth;
mod catalog;
mod papers;
mod questions;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use qbank_core::config::QbankConfig;
use qbank_core::web::create_app;
use qbank_core::web::state::AppState;

use crate::common::TEST_PASSWORD;

pub struct TestApp {
    router: Router,
    pub media_dir: TempDir,
    pub output_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        let media_dir = TempDir::new().expect("media tempdir");
        let output_dir = TempDir::new().expect("output tempdir");

        let mut config = QbankConfig::default();
        config.media.root_dir = media_dir.path().to_path_buf();
        config.paper.output_dir = output_dir.path().to_path_buf();

        let state = AppState::new(config, pool).expect("app state");
        Self {
            router: create_app(state),
            media_dir,
            output_dir,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.request(request).await
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Log in with the shared test password and return the bearer token
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": email, "password": TEST_PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed for {email}");
        response.json()["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }
}
