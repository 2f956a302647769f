//! Request-scoped context bag.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::directive::{CookieDirective, HeaderDirective, SET_COOKIES, SET_HEADERS};

/// Shared key/value store that resolvers write directives into.
///
/// Cloning yields another handle to the same store. The framework integration
/// creates one bag per request, so nothing leaks between requests.
#[derive(Debug, Clone, Default)]
pub struct ContextBag {
    inner: Arc<Mutex<Map<String, Value>>>,
}

impl ContextBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        // A panicking resolver must not take the remaining directives with it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a raw value, replacing whatever was under `key`.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.lock().insert(key.into(), value);
    }

    /// Owned copy of the value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Append a header directive to `setHeaders`.
    pub fn push_header(&self, directive: HeaderDirective) {
        self.push(SET_HEADERS, &directive);
    }

    /// Append a cookie directive to `setCookies`.
    pub fn push_cookie(&self, directive: CookieDirective) {
        self.push(SET_COOKIES, &directive);
    }

    fn push<T: Serialize>(&self, key: &str, directive: &T) {
        let Ok(value) = serde_json::to_value(directive) else {
            tracing::warn!(field = key, "failed to encode directive, dropping it");
            return;
        };

        let mut map = self.lock();
        match map.get_mut(key) {
            Some(Value::Array(list)) => list.push(value),
            _ => {
                map.insert(key.to_string(), Value::Array(vec![value]));
            }
        }
    }
}
