//! The response decorator: turns context directives into response headers.

use std::fmt;
use std::sync::Arc;

use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{RequestContext, ResponseHook};
use crate::directive::{CookieDirective, HeaderDirective, SET_COOKIES, SET_HEADERS};
use crate::error::{DecorateError, DirectiveError};
use crate::set_cookie::serialize_cookie;
use crate::sink::{Diagnostic, DiagnosticSink, TracingSink};

/// How more than one cookie directive in a single request is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookiePolicy {
    /// Every cookie gets its own `Set-Cookie` header, in list order.
    #[default]
    AppendAll,
    /// At most one cookie per request. It replaces any `Set-Cookie` header
    /// already on the response; a second directive fails the request before
    /// anything is written.
    Single,
}

/// Copies `setHeaders` and `setCookies` directives onto the outgoing response.
#[derive(Clone)]
pub struct ResponseDecorator {
    policy: CookiePolicy,
    trace_applied: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl fmt::Debug for ResponseDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseDecorator")
            .field("policy", &self.policy)
            .field("trace_applied", &self.trace_applied)
            .finish_non_exhaustive()
    }
}

impl Default for ResponseDecorator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDecorator {
    /// Append-all policy, diagnostics to `tracing`, no per-directive tracing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: CookiePolicy::default(),
            trace_applied: false,
            sink: Arc::new(TracingSink),
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: CookiePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Emit a diagnostic for every header and cookie written.
    #[must_use]
    pub const fn trace_applied(mut self, enabled: bool) -> Self {
        self.trace_applied = enabled;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> CookiePolicy {
        self.policy
    }

    /// Apply the directives found in `ctx` to its response headers.
    ///
    /// # Errors
    /// Returns [`DecorateError::MultipleCookies`] under
    /// [`CookiePolicy::Single`] when more than one cookie directive is
    /// present. The response is left untouched in that case.
    pub fn decorate<C: RequestContext>(&self, mut ctx: C) -> Result<C, DecorateError> {
        let header_entries = self.read_list(&ctx, SET_HEADERS);
        let cookie_entries = self.read_list(&ctx, SET_COOKIES);

        if self.policy == CookiePolicy::Single && cookie_entries.len() > 1 {
            return Err(DecorateError::MultipleCookies {
                count: cookie_entries.len(),
            });
        }

        let headers = self.prepare(SET_HEADERS, header_entries, |entry| {
            HeaderDirective::from_value(entry)?.to_header()
        });
        let cookies = self.prepare(SET_COOKIES, cookie_entries, |entry| {
            let rendered = serialize_cookie(&CookieDirective::from_value(entry)?)?;
            HeaderValue::from_str(&rendered)
                .map_err(|_| DirectiveError::InvalidHeaderValue(SET_COOKIE.to_string()))
        });

        let response_headers = ctx.response_headers_mut();

        for (name, value) in headers {
            if self.trace_applied {
                self.sink.emit(Diagnostic::HeaderApplied {
                    key: name.to_string(),
                    value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                });
            }
            response_headers.append(name, value);
        }

        for value in cookies {
            if self.trace_applied {
                self.sink.emit(Diagnostic::CookieApplied {
                    header: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                });
            }
            match self.policy {
                CookiePolicy::AppendAll => {
                    response_headers.append(SET_COOKIE, value);
                }
                CookiePolicy::Single => {
                    response_headers.insert(SET_COOKIE, value);
                }
            }
        }

        Ok(ctx)
    }

    /// Read `field` once and default it to an empty list.
    fn read_list<C: RequestContext>(&self, ctx: &C, field: &'static str) -> Vec<Value> {
        match ctx.context_value(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                self.sink.emit(Diagnostic::NotAList {
                    field,
                    found: kind_of(&other),
                });
                Vec::new()
            }
        }
    }

    fn prepare<T>(
        &self,
        field: &'static str,
        entries: Vec<Value>,
        convert: impl Fn(Value) -> Result<T, DirectiveError>,
    ) -> Vec<T> {
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match convert(entry) {
                Ok(item) => Some(item),
                Err(err) => {
                    self.sink.emit(Diagnostic::InvalidDirective {
                        field,
                        index,
                        reason: err.to_string(),
                    });
                    None
                }
            })
            .collect()
    }
}

impl<C: RequestContext> ResponseHook<C> for ResponseDecorator {
    fn on_before_response_send(&self, ctx: C) -> Result<C, DecorateError> {
        self.decorate(ctx)
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
