//! Header and cookie directives as they appear in the context bag.
//!
//! Directives are stored as JSON values so that any resolver can write them,
//! and are decoded here at response-send time. Field names follow the
//! camelCase convention of the GraphQL layer (`httpOnly`, `maxAge`, ...).

use axum::http::{HeaderName, HeaderValue};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DirectiveError;

/// Context key holding the list of [`HeaderDirective`]s.
pub const SET_HEADERS: &str = "setHeaders";

/// Context key holding the list of [`CookieDirective`]s.
pub const SET_COOKIES: &str = "setCookies";

/// Instruction to append one response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDirective {
    pub key: String,
    pub value: String,
}

impl HeaderDirective {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Decode one entry of the `setHeaders` list.
    ///
    /// # Errors
    /// Returns [`DirectiveError::Malformed`] if the value is not a
    /// `{ key, value }` object of strings.
    pub fn from_value(value: Value) -> Result<Self, DirectiveError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Convert into a typed header pair.
    ///
    /// # Errors
    /// Returns an error if the key is not a legal header name or the value
    /// contains bytes not allowed in a header value.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), DirectiveError> {
        let name = HeaderName::from_bytes(self.key.as_bytes())
            .map_err(|_| DirectiveError::InvalidHeaderName(self.key.clone()))?;
        let value = HeaderValue::from_str(&self.value)
            .map_err(|_| DirectiveError::InvalidHeaderValue(self.key.clone()))?;
        Ok((name, value))
    }
}

/// Instruction to emit one `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    #[serde(default, deserialize_with = "options_or_null")]
    pub options: CookieOptions,
}

impl CookieDirective {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options: CookieOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode one entry of the `setCookies` list.
    ///
    /// # Errors
    /// Returns [`DirectiveError::Malformed`] if the value is not a
    /// `{ name, value, options? }` object.
    pub fn from_value(value: Value) -> Result<Self, DirectiveError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Cookie attributes handed to the serializer.
///
/// Unknown keys in the context bag are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CookieOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Lifetime in seconds. Fractional values are floored.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "floored_seconds"
    )]
    pub max_age: Option<i64>,

    /// Absolute expiry as a Unix timestamp in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub http_only: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secure: bool,

    /// Accepts a policy name or a flag: `true` means `strict`, `false` omits it.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "same_site_or_flag"
    )]
    pub same_site: Option<SameSitePolicy>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub partitioned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    #[serde(alias = "Strict", alias = "STRICT")]
    Strict,
    #[serde(alias = "Lax", alias = "LAX")]
    Lax,
    #[serde(alias = "None", alias = "NONE")]
    None,
}

fn options_or_null<'de, D>(deserializer: D) -> Result<CookieOptions, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CookieOptions>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation)]
fn floored_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    // `as` saturates, so out-of-range values clamp instead of wrapping.
    Ok(Option::<f64>::deserialize(deserializer)?.map(|secs| secs.floor() as i64))
}

fn same_site_or_flag<'de, D>(deserializer: D) -> Result<Option<SameSitePolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Policy(SameSitePolicy),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(true)) => Some(SameSitePolicy::Strict),
        Some(Raw::Flag(false)) | None => None,
        Some(Raw::Policy(policy)) => Some(policy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_directive_decodes_key_and_value() {
        let directive = HeaderDirective::from_value(json!({"key": "X-A", "value": "1"}))
            .expect("should decode");
        assert_eq!(directive, HeaderDirective::new("X-A", "1"));
    }

    #[test]
    fn header_directive_rejects_missing_value() {
        let result = HeaderDirective::from_value(json!({"key": "X-A"}));
        assert!(matches!(result, Err(DirectiveError::Malformed(_))));
    }

    #[test]
    fn header_directive_rejects_non_string_value() {
        let result = HeaderDirective::from_value(json!({"key": "X-A", "value": 1}));
        assert!(matches!(result, Err(DirectiveError::Malformed(_))));
    }

    #[test]
    fn to_header_lowercases_name() {
        let (name, value) = HeaderDirective::new("X-Request-Source", "graphql")
            .to_header()
            .expect("valid header");
        assert_eq!(name.as_str(), "x-request-source");
        assert_eq!(value, "graphql");
    }

    #[test]
    fn to_header_rejects_bad_name_and_value() {
        assert!(matches!(
            HeaderDirective::new("bad header", "v").to_header(),
            Err(DirectiveError::InvalidHeaderName(_))
        ));
        assert!(matches!(
            HeaderDirective::new("x-ok", "line\nbreak").to_header(),
            Err(DirectiveError::InvalidHeaderValue(_))
        ));
    }

    #[test]
    fn cookie_directive_options_default_when_absent() {
        let directive = CookieDirective::from_value(json!({"name": "sid", "value": "abc"}))
            .expect("should decode");
        assert_eq!(directive.options, CookieOptions::default());
    }

    #[test]
    fn cookie_options_use_camel_case_and_ignore_unknown_keys() {
        let directive = CookieDirective::from_value(json!({
            "name": "sid",
            "value": "abc",
            "options": {
                "path": "/",
                "httpOnly": true,
                "maxAge": 60,
                "sameSite": "Lax",
                "priority": "high"
            }
        }))
        .expect("should decode");

        assert_eq!(directive.options.path.as_deref(), Some("/"));
        assert!(directive.options.http_only);
        assert_eq!(directive.options.max_age, Some(60));
        assert_eq!(directive.options.same_site, Some(SameSitePolicy::Lax));
    }

    #[test]
    fn cookie_directive_serializes_without_empty_options() {
        let value = serde_json::to_value(CookieDirective::new("sid", "abc")).expect("serialize");
        assert_eq!(value, json!({"name": "sid", "value": "abc", "options": {}}));
    }

    #[test]
    fn cookie_directive_accepts_null_options() {
        let directive =
            CookieDirective::from_value(json!({"name": "sid", "value": "abc", "options": null}))
                .expect("should decode");
        assert_eq!(directive.options, CookieOptions::default());
    }

    #[test]
    fn same_site_accepts_boolean_flag() {
        let strict = CookieDirective::from_value(json!({
            "name": "sid", "value": "abc", "options": {"sameSite": true}
        }))
        .expect("should decode");
        assert_eq!(strict.options.same_site, Some(SameSitePolicy::Strict));

        let off = CookieDirective::from_value(json!({
            "name": "sid", "value": "abc", "options": {"sameSite": false}
        }))
        .expect("should decode");
        assert_eq!(off.options.same_site, None);
    }

    #[test]
    fn fractional_max_age_is_floored() {
        let directive = CookieDirective::from_value(json!({
            "name": "sid", "value": "abc", "options": {"maxAge": 60.5}
        }))
        .expect("should decode");
        assert_eq!(directive.options.max_age, Some(60));
    }
}
