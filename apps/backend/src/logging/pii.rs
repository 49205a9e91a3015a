//! Redaction of emails and credentials before they reach the logs.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Literal patterns; a failure to compile is a programming error.
#[allow(clippy::unwrap_used)]
static JWT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b").unwrap());

#[allow(clippy::unwrap_used)]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());

#[allow(clippy::unwrap_used)]
static OPAQUE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9+/_-]{16,}={0,2}").unwrap());

/// Mask sensitive content in `input`.
///
/// - JWTs become `[REDACTED_JWT]`
/// - emails keep the first character of the local part and the domain
/// - other opaque runs of 16+ token characters become `[REDACTED_TOKEN]`
pub fn redact(input: &str) -> String {
    let out = JWT.replace_all(input, "[REDACTED_JWT]");

    let out = EMAIL.replace_all(&out, |caps: &Captures| {
        let matched = &caps[0];
        match matched.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => matched.to_string(),
        }
    });

    OPAQUE_TOKEN
        .replace_all(&out, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
