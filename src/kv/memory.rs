use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{KvError, KvStore, Result};

#[derive(Debug, Clone)]
enum Slot {
    Counter(i64),
    Text(String),
    List(VecDeque<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    slot: Slot,
    expires_at: Option<Instant>,
}

impl Entry {
    fn live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Single-process store with Redis-like semantics, for local development
/// and tests. Expired keys are dropped lazily on access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn live_entry<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| !e.live(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    /// Text value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        match Self::live_entry(&mut entries, key).map(|e| &e.slot) {
            Some(Slot::Text(value)) => Some(value.clone()),
            Some(Slot::Counter(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// List stored under `key`, head first.
    pub fn list(&self, key: &str) -> Vec<String> {
        let mut entries = self.lock();
        match Self::live_entry(&mut entries, key).map(|e| &e.slot) {
            Some(Slot::List(items)) => items.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Remaining time to live of `key`.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut entries = self.lock();
        Self::live_entry(&mut entries, key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Keys currently held, sorted.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let entries = self.lock();
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.live(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

fn wrong_type(key: &str) -> KvError {
    KvError::Command(format!("WRONGTYPE operation against key '{key}'"))
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.lock();
        match Self::live_entry(&mut entries, key) {
            Some(Entry { slot: Slot::Counter(n), .. }) => {
                *n += 1;
                Ok(*n)
            }
            Some(_) => Err(wrong_type(key)),
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        slot: Slot::Counter(1),
                        expires_at: None,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.lock();
        if let Some(entry) = Self::live_entry(&mut entries, key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.lock().insert(
            key.to_string(),
            Entry {
                slot: Slot::Text(value.to_string()),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        match Self::live_entry(&mut entries, key) {
            Some(Entry { slot: Slot::List(items), .. }) => {
                items.push_front(value.to_string());
                Ok(())
            }
            Some(_) => Err(wrong_type(key)),
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        slot: Slot::List(VecDeque::from([value.to_string()])),
                        expires_at: None,
                    },
                );
                Ok(())
            }
        }
    }

    async fn ltrim(&self, key: &str, len: usize) -> Result<()> {
        let mut entries = self.lock();
        match Self::live_entry(&mut entries, key) {
            Some(Entry { slot: Slot::List(items), .. }) => {
                items.truncate(len);
                Ok(())
            }
            Some(_) => Err(wrong_type(key)),
            None => Ok(()),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn incr_counts_from_one() {
        let store = MemoryStore::new();
        assert_eq!(store.incr("k").await.unwrap(), 1);
        assert_eq!(store.incr("k").await.unwrap(), 2);
        assert_eq!(store.get("k").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn expired_counter_starts_over() {
        let store = MemoryStore::new();
        store.incr("k").await.unwrap();
        store.expire("k", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.incr("k").await.unwrap(), 1);
        assert!(store.ttl("k").is_none());
    }

    #[tokio::test]
    async fn lists_prepend_and_trim() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store.lpush("list", id).await.unwrap();
        }
        assert_eq!(store.list("list"), vec!["c", "b", "a"]);
        store.ltrim("list", 2).await.unwrap();
        assert_eq!(store.list("list"), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn type_mismatch_is_an_error() {
        let store = MemoryStore::new();
        store.set_ex("t", "v", Duration::from_secs(60)).await.unwrap();
        assert!(store.incr("t").await.is_err());
        assert!(store.ttl("t").unwrap() <= Duration::from_secs(60));
    }
}
