//! `async-graphql` integration.
//!
//! Register [`ResponseDecoratorExtension`] on the schema builder. Each request
//! then gets a fresh [`ContextBag`] in its data, and once execution finishes
//! the decorator copies the bag's directives onto `Response::http_headers`,
//! which `async-graphql-axum` forwards to the HTTP response.

use std::sync::Arc;

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextPrepareRequest, NextRequest,
};
use async_graphql::{Request, Response, ServerError, ServerResult};
use axum::http::HeaderMap;
use serde_json::Value;

use crate::bag::ContextBag;
use crate::context::{RequestContext, ResponseHook};
use crate::decorator::ResponseDecorator;

/// Extension factory wrapping a [`ResponseDecorator`].
///
/// ```ignore
/// let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
///     .extension(ResponseDecoratorExtension::new(ResponseDecorator::new()))
///     .finish();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoratorExtension {
    decorator: Arc<ResponseDecorator>,
}

impl ResponseDecoratorExtension {
    #[must_use]
    pub fn new(decorator: ResponseDecorator) -> Self {
        Self {
            decorator: Arc::new(decorator),
        }
    }
}

impl From<ResponseDecorator> for ResponseDecoratorExtension {
    fn from(decorator: ResponseDecorator) -> Self {
        Self::new(decorator)
    }
}

impl ExtensionFactory for ResponseDecoratorExtension {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(DecorateOnSend {
            decorator: Arc::clone(&self.decorator),
            bag: ContextBag::new(),
        })
    }
}

/// Per-request extension instance.
struct DecorateOnSend {
    decorator: Arc<ResponseDecorator>,
    bag: ContextBag,
}

#[async_trait::async_trait]
impl Extension for DecorateOnSend {
    async fn prepare_request(
        &self,
        ctx: &ExtensionContext<'_>,
        request: Request,
        next: NextPrepareRequest<'_>,
    ) -> ServerResult<Request> {
        next.run(ctx, request.data(self.bag.clone())).await
    }

    async fn request(&self, ctx: &ExtensionContext<'_>, next: NextRequest<'_>) -> Response {
        let mut response = next.run(ctx).await;

        let outcome = self
            .decorator
            .on_before_response_send(GraphQLResponseContext::new(&self.bag, &mut response))
            .map(drop);

        match outcome {
            Ok(()) => response,
            Err(err) => {
                tracing::error!("response decoration failed: {err}");
                let mut failed = Response::from_errors(vec![ServerError::new(err.to_string(), None)]);
                failed.http_headers = std::mem::take(&mut response.http_headers);
                failed
            }
        }
    }
}

/// [`RequestContext`] over an `async-graphql` response and its context bag.
pub struct GraphQLResponseContext<'a> {
    bag: &'a ContextBag,
    response: &'a mut Response,
}

impl<'a> GraphQLResponseContext<'a> {
    pub fn new(bag: &'a ContextBag, response: &'a mut Response) -> Self {
        Self { bag, response }
    }
}

impl RequestContext for GraphQLResponseContext<'_> {
    fn context_value(&self, key: &str) -> Option<Value> {
        self.bag.get(key)
    }

    fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response.http_headers
    }
}
