//! GraphQL response helpers for integration tests.

use async_graphql::Response;
use response_decorator::ResponseDecorator;
use response_headers_api::{app::build_schema, config::SessionConfig};
use serde_json::Value;

/// Execute an operation against a schema built with `decorator`.
pub async fn execute_with(decorator: ResponseDecorator, query: &str) -> Response {
    let schema = build_schema(decorator, SessionConfig::default());
    schema.execute(query).await
}

/// Execute an operation with the default decorator.
pub async fn execute(query: &str) -> Response {
    execute_with(ResponseDecorator::new(), query).await
}

/// All values of header `name` on the GraphQL response, in order.
pub fn header_values(response: &Response, name: &str) -> Vec<String> {
    response
        .http_headers
        .get_all(name)
        .iter()
        .map(|v| v.to_str().expect("ascii header").to_string())
        .collect()
}

/// The response's `data` as JSON.
pub fn data(response: &Response) -> Value {
    response.data.clone().into_json().expect("data converts to JSON")
}

/// Assert that a GraphQL response has no errors.
pub fn assert_no_errors(response: &Response) {
    assert!(
        response.errors.is_empty(),
        "Expected no GraphQL errors, but got: {:?}",
        response.errors
    );
}
