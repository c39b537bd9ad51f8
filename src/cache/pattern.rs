//! Invalidation targets.
//!
//! Mutations name what they made stale: one exact key, a key prefix, a whole
//! logical resource, or a regular expression over keys.

use regex::Regex;
use tracing::warn;

use crate::cache::KEY_DELIMITER;
use crate::error::{Error, Result};

// == Invalidation ==
/// Selects which entries an invalidation removes.
#[derive(Debug, Clone)]
pub enum Invalidation {
    /// Exactly this key
    Key(String),
    /// Every key starting with this text
    Prefix(String),
    /// The resource key itself plus every `resource:qualifier...` key
    Resource(String),
    /// Every key the expression finds a match in (unanchored, like `Regex::is_match`)
    Pattern(Regex),
    /// Matches no key
    Nothing,
}

impl Invalidation {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self::Resource(name.into())
    }

    /// Compiles `pattern`, rejecting malformed expressions.
    pub fn try_pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Compiles `pattern`; a malformed expression matches nothing.
    ///
    /// Invalidation runs on a mutation's success path and must not fail it.
    pub fn pattern(pattern: &str) -> Self {
        Self::try_pattern(pattern).unwrap_or_else(|err| {
            warn!("Ignoring invalidation: {}", err);
            Self::Nothing
        })
    }

    // == Matches ==
    /// Returns true if `key` is selected by this target.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Key(k) => k == key,
            Self::Prefix(prefix) => key.starts_with(prefix.as_str()),
            Self::Resource(name) => key
                .strip_prefix(name.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(KEY_DELIMITER)),
            Self::Pattern(re) => re.is_match(key),
            Self::Nothing => false,
        }
    }
}

impl From<&str> for Invalidation {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Invalidation {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<Regex> for Invalidation {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}
