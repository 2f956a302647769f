//! Error types for the response decorator.

/// Failure of the response hook itself.
///
/// Returned by [`crate::ResponseHook::on_before_response_send`]; the framework
/// integration turns it into a request-level GraphQL error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecorateError {
    #[error(
        "setCookies holds {count} cookie directives but the single-cookie policy allows at most one"
    )]
    MultipleCookies { count: usize },
}

/// Why a single directive entry was skipped.
///
/// These never fail the request; they are reported through the diagnostic
/// sink and the offending entry is dropped.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("entry does not match the directive shape: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),

    #[error("invalid header value for '{0}'")]
    InvalidHeaderValue(String),

    #[error("invalid cookie name '{0}'")]
    InvalidCookieName(String),

    #[error("invalid cookie {attribute} '{value}'")]
    InvalidCookieAttribute {
        attribute: &'static str,
        value: String,
    },
}
