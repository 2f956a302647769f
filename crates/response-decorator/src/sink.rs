//! Diagnostics emitted while decorating a response.
//!
//! The decorator never logs directly; it reports to a [`DiagnosticSink`]
//! injected at construction. [`TracingSink`] is the production sink.

use std::fmt;

#[cfg(any(test, feature = "test-utils"))]
use std::sync::{Mutex, PoisonError};

/// Something worth reporting about one decoration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The field was present but not a list; it was treated as empty.
    NotAList {
        field: &'static str,
        found: &'static str,
    },
    /// One entry of a directive list was skipped.
    InvalidDirective {
        field: &'static str,
        index: usize,
        reason: String,
    },
    /// A header was appended to the response.
    HeaderApplied {
        key: String,
        value: String,
    },
    /// A `Set-Cookie` header was written.
    CookieApplied {
        header: String,
    },
}

impl Diagnostic {
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::NotAList { .. } | Self::InvalidDirective { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAList { field, found } => {
                write!(f, "{field} is not a list (found {found}), ignoring it")
            }
            Self::InvalidDirective {
                field,
                index,
                reason,
            } => write!(f, "{field}[{index}] skipped: {reason}"),
            Self::HeaderApplied { key, value } => write!(f, "set header {key}: {value}"),
            Self::CookieApplied { header } => write!(f, "set cookie {header}"),
        }
    }
}

/// Destination for [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`: problems at `warn`, applied directives
/// at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::NotAList { field, found } => {
                tracing::warn!(field, found, "{diagnostic}");
            }
            Diagnostic::InvalidDirective { field, index, .. } => {
                tracing::warn!(field, index, "{diagnostic}");
            }
            Diagnostic::HeaderApplied { .. } | Diagnostic::CookieApplied { .. } => {
                tracing::debug!("{diagnostic}");
            }
        }
    }
}

/// Collects diagnostics in memory for assertions.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the warning-level diagnostics.
    #[must_use]
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.events()
            .into_iter()
            .filter(Diagnostic::is_warning)
            .collect()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
