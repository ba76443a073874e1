//! Stored Document Module
//!
//! A JSON payload with creation time and optional expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{de::DeserializeOwned, Serialize};

use crate::store::StoreError;

// == Stored Document ==
/// A single document held by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub data: serde_json::Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoredDocument {
    /// Creates a document stamped with the current time.
    pub fn new(data: serde_json::Value, ttl: Option<Duration>) -> Self {
        Self::written_at(data, current_timestamp_ms(), ttl)
    }

    /// Creates a document as if written at `now_ms`.
    pub fn written_at(data: serde_json::Value, now_ms: u64, ttl: Option<Duration>) -> Self {
        Self {
            data,
            created_at: now_ms,
            expires_at: ttl.map(|ttl| now_ms + ttl.as_millis() as u64),
        }
    }

    /// Serializes `value` into a new document.
    pub fn from_value<T: Serialize>(
        value: &T,
        now_ms: u64,
        ttl: Option<Duration>,
    ) -> Result<Self, StoreError> {
        let data = serde_json::to_value(value)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        Ok(Self::written_at(data, now_ms, ttl))
    }

    /// Deserializes the payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.data.clone())
            .map_err(|err| StoreError::Serialization(err.to_string()))
    }

    // == Is Expired ==
    /// An entry is expired once `now_ms` reaches its expiration time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

// == Helper Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
