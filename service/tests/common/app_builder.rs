//! Test app builder that mirrors main.rs wiring with injectable settings.
//!
//! ```ignore
//! let sink = Arc::new(RecordingSink::new());
//! let app = TestAppBuilder::new()
//!     .with_policy(CookiePolicy::Single)
//!     .with_sink(sink.clone())
//!     .build();
//! ```

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request},
    response::Response,
    Router,
};
use response_decorator::{CookiePolicy, DiagnosticSink, ResponseDecorator};
use response_headers_api::{
    app::{build_app, build_schema},
    config::Config,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Builder for test applications that mirrors main.rs wiring.
pub struct TestAppBuilder {
    config: Config,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            sink: None,
        }
    }

    pub fn with_policy(mut self, policy: CookiePolicy) -> Self {
        self.config.decorator.cookie_policy = policy;
        self
    }

    pub fn with_trace_applied(mut self) -> Self {
        self.config.decorator.trace_applied = true;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_playground(mut self) -> Self {
        self.config.graphql.playground_enabled = true;
        self
    }

    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.config.cors.allowed_origins = origins.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn build(self) -> Router {
        let mut decorator: ResponseDecorator = self.config.decorator.build();
        if let Some(sink) = self.sink {
            decorator = decorator.with_sink(sink);
        }
        let schema = build_schema(decorator, self.config.session.clone());
        build_app(&self.config, schema)
    }
}

/// POST `query` to /graphql and return the raw HTTP response.
pub async fn post_graphql(app: Router, query: &str) -> Response {
    let body = json!({ "query": query }).to_string();
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// All values of header `name`, in wire order.
pub fn header_values(response: &Response, name: &str) -> Vec<String> {
    response
        .headers()
        .get_all(name)
        .iter()
        .map(|v| v.to_str().expect("ascii header").to_string())
        .collect()
}

/// Consume the response and parse its body as JSON.
pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
