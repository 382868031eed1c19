use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email addresses anywhere in a string.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// Compact JWS: three base64url segments separated by dots.
static JWT: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\beyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]*\.[A-Za-z0-9_-]*").unwrap()
});

/// Long opaque runs (secrets, signatures) of 24+ base64/hex chars.
static OPAQUE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9+/_-]{24,}={0,2}").unwrap()
});

/// Mask data that must not reach the logs.
///
/// Emails keep the first character of the local part and the full domain.
/// Access tokens and other long opaque runs become `[REDACTED_TOKEN]`.
/// Tokens are handled before emails so a token payload is never half-masked.
pub fn redact(input: &str) -> String {
    let without_jwts = JWT.replace_all(input, "[REDACTED_TOKEN]");
    let without_opaque = OPAQUE.replace_all(&without_jwts, "[REDACTED_TOKEN]");

    EMAIL
        .replace_all(&without_opaque, |caps: &regex::Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => full.to_string(),
            }
        })
        .into_owned()
}

/// Formats the wrapped string through [`redact`].
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
