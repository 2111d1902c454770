//! Cache key derivation.
//!
//! Keys have the form `user:{subject}:function:{operation}`. Any `:` or `%`
//! inside the subject is percent-escaped, so the subject always ends at the
//! first `:` after the `user:` prefix and distinct `(subject, operation)`
//! pairs never share a key.

use std::fmt;

const SUBJECT_PREFIX: &str = "user:";
const OPERATION_SEPARATOR: &str = ":function:";

/// A namespaced cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for `operation` on `subject`.
    #[must_use]
    pub fn new(subject: &str, operation: &str) -> Self {
        Self(format!("{}{}", subject_prefix(subject), operation))
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Prefix shared by every key of `subject`.
#[must_use]
pub fn subject_prefix(subject: &str) -> String {
    format!("{}{}{}", SUBJECT_PREFIX, escape_subject(subject), OPERATION_SEPARATOR)
}

fn escape_subject(subject: &str) -> String {
    let mut escaped = String::with_capacity(subject.len());
    for c in subject.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ':' => escaped.push_str("%3A"),
            other => escaped.push(other),
        }
    }
    escaped
}
