//! Cache key construction.

use std::fmt::Display;

/// Separator between a resource name and its qualifiers.
pub const KEY_DELIMITER: char = ':';

/// Joins a resource name and its qualifiers into a cache key.
///
/// ```
/// use dashboard_cache::cache::create_cache_key;
///
/// assert_eq!(create_cache_key(["habits", "checkins", "7d"]), "habits:checkins:7d");
/// ```
pub fn create_cache_key<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut key = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            key.push(KEY_DELIMITER);
        }
        key.push_str(&part.to_string());
    }
    key
}

/// Builds a cache key from heterogeneous `Display` parts.
///
/// ```
/// use dashboard_cache::cache_key;
///
/// assert_eq!(cache_key!["runs", "recent", 7], "runs:recent:7");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($($part:expr),+ $(,)?) => {
        $crate::cache::create_cache_key([$(::std::string::ToString::to_string(&$part)),+])
    };
}
