//! Cache Entry Module
//!
//! The persisted form of a cached envelope.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached response with its creation and expiry times (Unix milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<E> {
    pub response: E,
    pub created_at: u64,
    pub expires_at: u64,
}

impl<E> CacheEntry<E> {
    pub fn new(response: E, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            response,
            created_at: now_ms,
            expires_at: now_ms + ttl_ms,
        }
    }

    /// Expired once `now_ms` reaches the expiry time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_expiry_boundary() {
        let entry = CacheEntry::new("chart", 1_000, 500);
        assert_eq!(entry.expires_at, 1_500);
        assert!(!entry.is_expired_at(1_499));
        assert!(entry.is_expired_at(1_500));
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(CacheEntry::new(1, 2, 3)).unwrap();
        assert_eq!(value["response"], 1);
        assert_eq!(value["createdAt"], 2);
        assert_eq!(value["expiresAt"], 5);
    }
}
