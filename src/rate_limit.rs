//! Daily Rate Limiter
//!
//! One counter document per user and UTC calendar day, updated with a
//! single atomic store transaction per check.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::models::UserId;
use crate::store::{DocumentStore, StoreError, StoredDocument, TxnDecision, TxnFn, TxnOutcome};

/// Store collection holding the daily counters
pub const COUNTER_COLLECTION: &str = "rate_limits";

/// Lifetime of a counter before the TTL sweep may remove it
pub const COUNTER_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

pub const DEFAULT_DAILY_LIMIT: u32 = 100;

// == Rate Counter ==
/// Requests counted for one user on one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCounter {
    pub count: u32,
    /// Unix milliseconds of the last increment
    pub updated_at: u64,
    /// Unix milliseconds
    pub expires_at: u64,
}

impl RateCounter {
    fn first(now_ms: u64) -> Self {
        Self {
            count: 1,
            updated_at: now_ms,
            expires_at: now_ms + COUNTER_TTL.as_millis() as u64,
        }
    }

    fn incremented(self, now_ms: u64) -> Self {
        Self {
            count: self.count + 1,
            updated_at: now_ms,
            ..self
        }
    }

    fn into_document(self, created_at: u64) -> StoredDocument {
        StoredDocument {
            data: json!({
                "count": self.count,
                "updatedAt": self.updated_at,
                "expiresAt": self.expires_at,
            }),
            created_at,
            expires_at: Some(self.expires_at),
        }
    }
}

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request counted; `count` is the day's total including this one
    Allowed { count: u32 },
    /// Quota already used up; nothing was counted
    Exceeded { limit: u32 },
}

impl RateDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

// == Rate Limiter ==
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn DocumentStore>,
    limit: u32,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn DocumentStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Counter document id: `<user>_<YYYYMMDD>` in UTC.
    pub fn counter_id(user: &UserId, now: DateTime<Utc>) -> String {
        format!("{}_{}", user, now.format("%Y%m%d"))
    }

    pub async fn check(&self, user: &UserId) -> Result<RateDecision, StoreError> {
        self.check_at(user, Utc::now()).await
    }

    /// Counts one request for `user` on the UTC day of `now`.
    ///
    /// Absent counters start at 1. A counter already at the limit is left
    /// untouched and the request is reported as exceeded.
    pub async fn check_at(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<RateDecision, StoreError> {
        let id = Self::counter_id(user, now);
        let now_ms = now.timestamp_millis().max(0) as u64;
        let limit = self.limit;

        let counter_id = id.clone();
        let txn: TxnFn = Box::new(move |current: Option<&StoredDocument>| {
            let existing = current.and_then(|doc| match doc.decode::<RateCounter>() {
                Ok(counter) => Some((counter, doc.created_at)),
                Err(err) => {
                    warn!(
                        counter = %counter_id,
                        error = %err,
                        "Unreadable rate counter, restarting at 1"
                    );
                    None
                }
            });
            match existing {
                Some((counter, _)) if counter.count >= limit => TxnDecision::Abort,
                Some((counter, created_at)) => {
                    TxnDecision::Write(counter.incremented(now_ms).into_document(created_at))
                }
                None => TxnDecision::Write(RateCounter::first(now_ms).into_document(now_ms)),
            }
        });

        match self.store.transact(COUNTER_COLLECTION, &id, txn).await? {
            TxnOutcome::Committed(doc) => {
                let counter: RateCounter = doc.decode()?;
                debug!(counter = %id, count = counter.count, "Request counted");
                Ok(RateDecision::Allowed {
                    count: counter.count,
                })
            }
            TxnOutcome::Aborted => {
                debug!(counter = %id, limit, "Daily limit reached");
                Ok(RateDecision::Exceeded { limit })
            }
        }
    }
}
