//! Schema and router wiring shared by `main.rs` and the integration tests.

use async_graphql::{EmptySubscription, Schema};
use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use response_decorator::{ResponseDecorator, ResponseDecoratorExtension};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, CorsConfig, SessionConfig};
use crate::graphql::{graphql_handler, graphql_playground, ApiSchema, MutationRoot, QueryRoot};

// Health check handler
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Build the GraphQL schema with the response decorator registered.
#[must_use]
pub fn build_schema(decorator: ResponseDecorator, session: SessionConfig) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .extension(ResponseDecoratorExtension::new(decorator))
        .data(session)
        .finish()
}

/// Build the HTTP router around `schema`.
pub fn build_app(config: &Config, schema: ApiSchema) -> Router {
    let graphql_route = if config.graphql.playground_enabled {
        tracing::info!("GraphQL playground enabled at GET /graphql");
        get(graphql_playground).post(graphql_handler)
    } else {
        post(graphql_handler)
    };

    Router::new()
        .route("/graphql", graphql_route)
        .route("/health", get(health_check))
        .layer(Extension(schema))
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = &config.allowed_origins;
    let allow_origin: AllowOrigin = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin - not recommended for production");
        AllowOrigin::any()
    } else if origins.is_empty() {
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        tracing::info!(origins = ?origins, "CORS allowed origins configured");
        AllowOrigin::list(origins.iter().filter_map(|origin| origin.parse::<HeaderValue>().ok()))
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(allow_origin)
}
