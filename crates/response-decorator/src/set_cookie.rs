//! `Set-Cookie` serialization for [`CookieDirective`]s.
//!
//! Rendering is delegated to the `cookie` crate; this module only checks the
//! inputs it would otherwise pass through unvalidated and maps the option bag
//! onto its builder.

use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, SameSite};

use crate::directive::{CookieDirective, SameSitePolicy};
use crate::error::DirectiveError;

/// Serialize a cookie directive into a `Set-Cookie` header value.
///
/// The name and value are percent-encoded; attributes are rendered in the
/// order the `cookie` crate uses. `{ name: "sid", value: "abc", path: "/" }`
/// becomes `sid=abc; Path=/`.
///
/// # Errors
/// Returns an error if the name is not an RFC 6265 token, if `domain` or
/// `path` contain `;` or control characters, or if `expires` is outside the
/// representable date range.
pub fn serialize_cookie(directive: &CookieDirective) -> Result<String, DirectiveError> {
    if !is_token(&directive.name) {
        return Err(DirectiveError::InvalidCookieName(directive.name.clone()));
    }

    let options = &directive.options;
    let mut cookie = Cookie::new(directive.name.clone(), directive.value.clone());

    if let Some(domain) = &options.domain {
        check_attribute("domain", domain)?;
        cookie.set_domain(domain.clone());
    }
    if let Some(path) = &options.path {
        check_attribute("path", path)?;
        cookie.set_path(path.clone());
    }
    if let Some(max_age) = options.max_age {
        cookie.set_max_age(Duration::seconds(max_age));
    }
    if let Some(expires) = options.expires {
        let at = OffsetDateTime::from_unix_timestamp(expires).map_err(|_| {
            DirectiveError::InvalidCookieAttribute {
                attribute: "expires",
                value: expires.to_string(),
            }
        })?;
        cookie.set_expires(at);
    }
    if options.http_only {
        cookie.set_http_only(true);
    }
    if options.secure {
        cookie.set_secure(true);
    }
    if let Some(same_site) = options.same_site {
        cookie.set_same_site(match same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        });
    }
    if options.partitioned {
        cookie.set_partitioned(true);
    }

    Ok(cookie.encoded().to_string())
}

/// RFC 6265 cookie-name: an RFC 2616 token.
fn is_token(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";

    !name.is_empty()
        && name
            .bytes()
            .all(|b| (0x21..0x7f).contains(&b) && !SEPARATORS.contains(&b))
}

fn check_attribute(attribute: &'static str, value: &str) -> Result<(), DirectiveError> {
    if value.bytes().any(|b| b == b';' || b.is_ascii_control()) {
        return Err(DirectiveError::InvalidCookieAttribute {
            attribute,
            value: value.to_string(),
        });
    }
    Ok(())
}
