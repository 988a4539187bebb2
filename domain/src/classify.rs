//! Input shape classifiers. Each predicate is pure and works on the trimmed
//! value; normalization is a separate call made only after a positive match.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[A-Za-z0-9._]+$").expect("username pattern"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static PHONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern"));

/// Schemes accepted without an authority part (`mailto:x`, `tel:x`, ...).
const OPAQUE_SCHEMES: [&str; 6] = ["mailto", "tel", "sms", "data", "javascript", "file"];

/// Strict URL check. A bare `host:port` or `user:pass` parses as a URL with
/// a made-up scheme, so only authority-bearing URLs and a few known opaque
/// schemes count.
pub fn is_well_formed_url(s: &str) -> bool {
    match Url::parse(s.trim()) {
        Ok(url) => url.has_host() || OPAQUE_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

pub fn is_username_like(s: &str) -> bool {
    USERNAME.is_match(s.trim())
}

pub fn is_email_like(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

/// Spaces, hyphens and parentheses are ignored; up to 16 digits with an
/// optional leading `+`, first digit nonzero.
pub fn is_phone_like(s: &str) -> bool {
    PHONE_DIGITS.is_match(&normalize_phone(s))
}

pub fn is_domain_like(s: &str) -> bool {
    let s = s.trim();
    s.contains('.') && !s.chars().any(char::is_whitespace) && !s.starts_with("http")
}

/// Drop one leading `@` from a handle.
pub fn normalize_username(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('@').unwrap_or(s)
}

pub fn normalize_phone(s: &str) -> String {
    s.chars()
        .filter(|c| !(c.is_whitespace() || matches!(*c, '-' | '(' | ')')))
        .collect()
}
