//! In-memory Document Store
//!
//! HashMap storage split into shards, each behind its own tokio `RwLock`.
//! A document always lives in the shard picked by the hash of its
//! `(collection, id)`. Transactions hold only that shard's write lock, so a
//! read-check-write on one document is indivisible while documents in other
//! shards stay available.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{
    DocumentStore, StoreError, StoredDocument, TxnDecision, TxnFn, TxnOutcome, MAX_ID_LENGTH,
};

/// Number of independently locked shards
pub const SHARD_COUNT: usize = 32;

type DocumentKey = (String, String);
type Shard = RwLock<HashMap<DocumentKey, StoredDocument>>;

fn document_key(collection: &str, id: &str) -> Result<DocumentKey, StoreError> {
    if id.is_empty() {
        return Err(StoreError::InvalidId("id must not be empty".to_string()));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(StoreError::InvalidId(format!(
            "id exceeds maximum length of {} bytes",
            MAX_ID_LENGTH
        )));
    }
    Ok((collection.to_string(), id.to_string()))
}

fn shard_index(key: &DocumentKey) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % SHARD_COUNT as u64) as usize
}

// == Memory Store ==
#[derive(Debug)]
pub struct MemoryStore {
    shards: Vec<Shard>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, key: &DocumentKey) -> &Shard {
        &self.shards[shard_index(key)]
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let key = document_key(collection, id)?;
        Ok(self.shard(&key).read().await.get(&key).cloned())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        doc: StoredDocument,
    ) -> Result<(), StoreError> {
        let key = document_key(collection, id)?;
        self.shard(&key).write().await.insert(key, doc);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let key = document_key(collection, id)?;
        Ok(self.shard(&key).write().await.remove(&key).is_some())
    }

    async fn transact(
        &self,
        collection: &str,
        id: &str,
        txn: TxnFn,
    ) -> Result<TxnOutcome, StoreError> {
        let key = document_key(collection, id)?;
        let mut documents = self.shard(&key).write().await;

        match txn(documents.get(&key)) {
            TxnDecision::Write(doc) => {
                documents.insert(key, doc.clone());
                Ok(TxnOutcome::Committed(doc))
            }
            TxnDecision::Abort => Ok(TxnOutcome::Aborted),
        }
    }

    // == Purge Expired ==
    /// Sweeps one shard at a time; never holds more than one lock.
    async fn purge_expired(&self, now_ms: u64) -> Result<usize, StoreError> {
        let mut removed = 0;
        for shard in &self.shards {
            let mut documents = shard.write().await;
            let before = documents.len();
            documents.retain(|_, doc| !doc.is_expired_at(now_ms));
            removed += before - documents.len();
        }
        if removed > 0 {
            debug!(removed, "Purged expired documents");
        }
        Ok(removed)
    }

    async fn len(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.read().await.len();
        }
        total
    }
}
