//! The hook contract between the decorator and its host framework.

use axum::http::HeaderMap;
use serde_json::Value;

use crate::error::DecorateError;

/// Per-request view the host framework hands to a [`ResponseHook`].
pub trait RequestContext {
    /// Read one field of the context bag. Every call is an independent read.
    fn context_value(&self, key: &str) -> Option<Value>;

    /// Header collection of the response about to be sent.
    fn response_headers_mut(&mut self) -> &mut HeaderMap;
}

impl<C: RequestContext + ?Sized> RequestContext for &mut C {
    fn context_value(&self, key: &str) -> Option<Value> {
        (**self).context_value(key)
    }

    fn response_headers_mut(&mut self) -> &mut HeaderMap {
        (**self).response_headers_mut()
    }
}

/// Lifecycle hook run once per request, right before the response is sent.
///
/// Returns the context so the framework can continue its own pipeline, or an
/// error the framework reports as a request-level failure.
pub trait ResponseHook<C: RequestContext> {
    /// # Errors
    /// Implementation defined; see [`DecorateError`].
    fn on_before_response_send(&self, ctx: C) -> Result<C, DecorateError>;
}
