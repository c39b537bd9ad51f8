//! Request DTOs for the dashboard API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Invalidation;
use crate::error::{Error, Result};

/// Request body for creating or updating a record
/// (POST /api/:resource, PUT /api/:resource/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRequest {
    /// Resource-specific fields
    pub data: Value,
}

impl RecordRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if !self.data.is_object() {
            return Some("Record data must be a JSON object".to_string());
        }
        None
    }
}

/// Request body for POST /cache/invalidate
///
/// Exactly one of the fields must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Remove exactly this key
    #[serde(default)]
    pub key: Option<String>,
    /// Remove every key starting with this text
    #[serde(default)]
    pub prefix: Option<String>,
    /// Remove every key this regular expression matches
    #[serde(default)]
    pub pattern: Option<String>,
}

impl InvalidateRequest {
    /// Converts the request into an invalidation target.
    ///
    /// Unlike mutation-driven invalidation, a malformed pattern here is
    /// reported back to the caller.
    pub fn into_target(self) -> Result<Invalidation> {
        match (self.key, self.prefix, self.pattern) {
            (Some(key), None, None) => Ok(Invalidation::key(key)),
            (None, Some(prefix), None) => Ok(Invalidation::prefix(prefix)),
            (None, None, Some(pattern)) => Invalidation::try_pattern(&pattern),
            _ => Err(Error::InvalidRequest(
                "Exactly one of key, prefix or pattern is required".to_string(),
            )),
        }
    }
}
