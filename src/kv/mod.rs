//! Remote key-value store used for every piece of cross-request state.
//!
//! Handlers never keep counters or records in process memory; they go
//! through [`KvStore`], whose operations are single-key and atomic on the
//! server side. There are no multi-key transactions.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};

#[derive(Debug, Error)]
pub enum KvError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store command failed: {0}")]
    Command(String),

    #[error("store misconfigured: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Atomically increments `key` and returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Attaches a TTL to an existing key.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Writes `value` under `key` with a TTL.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Prepends `value` to the list at `key`.
    async fn lpush(&self, key: &str, value: &str) -> Result<()>;

    /// Keeps only the first `len` entries of the list at `key`.
    async fn ltrim(&self, key: &str, len: usize) -> Result<()>;

    /// Round-trips to the store.
    async fn ping(&self) -> Result<()>;
}

/// Builds the store selected by configuration.
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
    match config.backend {
        StoreBackend::Redis => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| KvError::Config("redis backend requires a url".into()))?;
            Ok(Arc::new(RedisStore::connect(url, config.pool_max)?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; counters and leads are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
