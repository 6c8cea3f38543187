//! Best-effort persistence of captured leads and anonymous analytics events.
//!
//! Records are written as JSON under `<domain>_lead:<id>` with a retention
//! TTL, and their ids are prepended to `<domain>_leads:list` for reporting.
//! Nothing here fails the caller: a lost audit record is logged and tracked,
//! never surfaced to the submitter.

mod record;

pub use record::{AnalyticsEvent, LeadDomain, LeadId, LeadRecord, LeadStatus};

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LeadsConfig;
use crate::kv::{KvError, KvStore};
use crate::tracking::{ErrorTracker, TrackedEvent};

const EVENT_KEY_PREFIX: &str = "analytics_event";
const EVENT_INDEX_KEY: &str = "analytics_events:list";

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] KvError),
}

#[derive(Clone)]
pub struct LeadStore {
    store: Arc<dyn KvStore>,
    tracker: Arc<dyn ErrorTracker>,
    config: LeadsConfig,
}

impl LeadStore {
    pub fn new(store: Arc<dyn KvStore>, tracker: Arc<dyn ErrorTracker>, config: LeadsConfig) -> Self {
        Self { store, tracker, config }
    }

    pub fn ttl_for(&self, domain: LeadDomain) -> Duration {
        match domain {
            LeadDomain::Catalog => self.config.catalog_ttl(),
            LeadDomain::Rfq | LeadDomain::CatalogRfq | LeadDomain::Contact => self.config.rfq_ttl(),
        }
    }

    /// Stores `record` and indexes its id. Returns whether both writes
    /// succeeded; failures are logged and tracked at warning severity.
    pub async fn persist(&self, record: &LeadRecord) -> bool {
        let domain = record.domain();
        match self.write_lead(record, domain).await {
            Ok(()) => {
                debug!(lead_id = %record.id, domain = domain.as_str(), "Lead persisted");
                true
            }
            Err(e) => {
                warn!(lead_id = %record.id, domain = domain.as_str(), error = %e, "Failed to persist lead");
                self.tracker.capture(
                    TrackedEvent::warning(format!("lead persistence failed: {e}"))
                        .tag("domain", domain.as_str())
                        .tag("lead_id", record.id.as_str()),
                );
                false
            }
        }
    }

    /// Stores an anonymous analytics event with the event retention TTL.
    pub async fn record_event(&self, event: &AnalyticsEvent) -> bool {
        match self.write_event(event).await {
            Ok(()) => true,
            Err(e) => {
                warn!(event = %event.name, error = %e, "Failed to record analytics event");
                self.tracker.capture(
                    TrackedEvent::warning(format!("analytics event persistence failed: {e}"))
                        .tag("event", event.name.clone()),
                );
                false
            }
        }
    }

    async fn write_lead(&self, record: &LeadRecord, domain: LeadDomain) -> Result<(), LeadError> {
        let json = serde_json::to_string(record)?;
        self.store
            .set_ex(&domain.record_key(&record.id), &json, self.ttl_for(domain))
            .await?;
        self.index(&domain.index_key(), record.id.as_str()).await
    }

    async fn write_event(&self, event: &AnalyticsEvent) -> Result<(), LeadError> {
        let json = serde_json::to_string(event)?;
        let key = format!("{EVENT_KEY_PREFIX}:{}", event.id);
        self.store.set_ex(&key, &json, self.config.event_ttl()).await?;
        self.index(EVENT_INDEX_KEY, &event.id).await
    }

    async fn index(&self, list_key: &str, id: &str) -> Result<(), LeadError> {
        self.store.lpush(list_key, id).await?;
        if self.config.index_cap > 0 {
            self.store.ltrim(list_key, self.config.index_cap).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{self, FormKind};
    use crate::kv::MemoryStore;
    use crate::testutils::{FailingStore, RecordingTracker};
    use crate::tracking::Severity;
    use serde_json::json;

    fn catalog_lead() -> LeadRecord {
        let payload = forms::validate(
            FormKind::CatalogDownload,
            &json!({
                "name": "Ana Lima",
                "email": "ana@example.com",
                "company": "Cacau SA",
                "country": "Brazil"
            }),
        )
        .unwrap();
        LeadRecord::new(payload, "/api/catalog-download")
    }

    #[tokio::test]
    async fn persists_record_and_index() {
        let store = Arc::new(MemoryStore::new());
        let leads = LeadStore::new(store.clone(), Arc::new(RecordingTracker::default()), LeadsConfig::default());
        let record = catalog_lead();

        assert!(leads.persist(&record).await);

        let key = format!("catalog_lead:{}", record.id);
        let stored: serde_json::Value = serde_json::from_str(&store.get(&key).unwrap()).unwrap();
        assert_eq!(stored["payload"]["email"], "ana@example.com");
        assert_eq!(stored["status"], "pending");
        assert_eq!(store.list("catalog_leads:list"), vec![record.id.to_string()]);

        let ttl = store.ttl(&key).unwrap();
        assert!(ttl > Duration::from_secs(89 * 24 * 3600));
    }

    #[tokio::test]
    async fn index_is_capped() {
        let store = Arc::new(MemoryStore::new());
        let config = LeadsConfig {
            index_cap: 2,
            ..LeadsConfig::default()
        };
        let leads = LeadStore::new(store.clone(), Arc::new(RecordingTracker::default()), config);

        let mut ids = Vec::new();
        for _ in 0..3 {
            let record = catalog_lead();
            ids.push(record.id.to_string());
            assert!(leads.persist(&record).await);
        }

        assert_eq!(store.list("catalog_leads:list"), vec![ids[2].clone(), ids[1].clone()]);
    }

    #[tokio::test]
    async fn store_failure_is_swallowed_and_tracked() {
        let tracker = Arc::new(RecordingTracker::default());
        let leads = LeadStore::new(Arc::new(FailingStore), tracker.clone(), LeadsConfig::default());

        assert!(!leads.persist(&catalog_lead()).await);

        let events = tracker.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn events_use_their_own_keys() {
        let store = Arc::new(MemoryStore::new());
        let leads = LeadStore::new(store.clone(), Arc::new(RecordingTracker::default()), LeadsConfig::default());
        let event = AnalyticsEvent::new("catalog_view", Some("/fr/products".to_string()), None);

        assert!(leads.record_event(&event).await);
        assert!(store.get(&format!("analytics_event:{}", event.id)).is_some());
        assert_eq!(store.list("analytics_events:list"), vec![event.id.clone()]);
    }
}
