//! Response decoration for `async-graphql` servers.
//!
//! Resolvers write header and cookie directives into a request-scoped
//! [`ContextBag`]; right before the response is sent, the
//! [`ResponseDecorator`] copies them onto the HTTP response:
//!
//! - `setHeaders: [{ key, value }]`: each entry is appended as a response header.
//! - `setCookies: [{ name, value, options }]`: each entry is serialized into a
//!   `Set-Cookie` header, subject to the configured [`CookiePolicy`].
//!
//! Fields that are present but not lists, and entries that do not decode,
//! are reported through the [`DiagnosticSink`] and otherwise ignored.

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod bag;
mod context;
mod decorator;
mod directive;
mod error;
mod extension;
mod set_cookie;
mod sink;

pub use bag::ContextBag;
pub use context::{RequestContext, ResponseHook};
pub use decorator::{CookiePolicy, ResponseDecorator};
pub use directive::{
    CookieDirective, CookieOptions, HeaderDirective, SameSitePolicy, SET_COOKIES, SET_HEADERS,
};
pub use error::{DecorateError, DirectiveError};
pub use extension::{GraphQLResponseContext, ResponseDecoratorExtension};
pub use set_cookie::serialize_cookie;
#[cfg(any(test, feature = "test-utils"))]
pub use sink::RecordingSink;
pub use sink::{Diagnostic, DiagnosticSink, TracingSink};
