//! Document Store Module
//!
//! The keyed persistence seam behind the result cache and the rate
//! limiter: documents grouped in collections, with TTL metadata and an
//! atomic read-modify-write primitive.

mod document;
mod memory;

pub use document::{current_timestamp_ms, StoredDocument};
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Maximum allowed document id length in bytes
pub const MAX_ID_LENGTH: usize = 256;

// == Store Error ==
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Backing store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Document serialization failed: {0}")]
    Serialization(String),
}

// == Transactions ==
/// What a transaction body decides after seeing the current document.
#[derive(Debug, Clone, PartialEq)]
pub enum TxnDecision {
    /// Replace (or create) the document
    Write(StoredDocument),
    /// Leave the document untouched
    Abort,
}

/// Result of a committed or aborted transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TxnOutcome {
    Committed(StoredDocument),
    Aborted,
}

/// Transaction body. Runs exactly once, with no other writer on the same
/// document in between its read and its write.
pub type TxnFn = Box<dyn FnOnce(Option<&StoredDocument>) -> TxnDecision + Send>;

// == Document Store Trait ==
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Writes a document, overwriting any existing one.
    async fn set(&self, collection: &str, id: &str, doc: StoredDocument)
        -> Result<(), StoreError>;

    /// Removes a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Atomic read-check-write of a single document.
    async fn transact(
        &self,
        collection: &str,
        id: &str,
        txn: TxnFn,
    ) -> Result<TxnOutcome, StoreError>;

    /// Removes every document expired at `now_ms`. Returns the count removed.
    async fn purge_expired(&self, now_ms: u64) -> Result<usize, StoreError>;

    /// Number of documents held, expired ones included.
    async fn len(&self) -> usize;
}
