use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::forms::{FormKind, Submission};
use crate::locale::Locale;

/// Storage namespace of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadDomain {
    Rfq,
    CatalogRfq,
    Contact,
    Catalog,
}

impl LeadDomain {
    pub fn for_kind(kind: FormKind) -> Self {
        match kind {
            FormKind::Rfq => LeadDomain::Rfq,
            FormKind::CatalogRfq => LeadDomain::CatalogRfq,
            FormKind::Contact => LeadDomain::Contact,
            FormKind::CatalogDownload => LeadDomain::Catalog,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadDomain::Rfq => "rfq",
            LeadDomain::CatalogRfq => "catalog_rfq",
            LeadDomain::Contact => "contact",
            LeadDomain::Catalog => "catalog",
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            LeadDomain::Rfq => "RFQ",
            LeadDomain::CatalogRfq => "CRFQ",
            LeadDomain::Contact => "CONTACT",
            LeadDomain::Catalog => "CATALOG",
        }
    }

    pub fn record_key(&self, id: &LeadId) -> String {
        format!("{}_lead:{id}", self.as_str())
    }

    pub fn index_key(&self) -> String {
        format!("{}_leads:list", self.as_str())
    }
}

/// `<PREFIX>-<unix millis>-<8 hex chars>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    pub fn generate(domain: LeadDomain) -> Self {
        Self(format!(
            "{}-{}-{}",
            domain.id_prefix(),
            Utc::now().timestamp_millis(),
            short_suffix()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn short_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    suffix
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    Pending,
}

/// A sanitized submission as written to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: LeadId,
    pub payload: Submission,
    pub submitted_at: DateTime<Utc>,
    /// Endpoint the lead was captured on
    pub source: String,
    pub status: LeadStatus,
}

impl LeadRecord {
    pub fn new(payload: Submission, source: impl Into<String>) -> Self {
        let domain = LeadDomain::for_kind(payload.kind());
        Self {
            id: LeadId::generate(domain),
            payload,
            submitted_at: Utc::now(),
            source: source.into(),
            status: LeadStatus::Pending,
        }
    }

    pub fn domain(&self) -> LeadDomain {
        LeadDomain::for_kind(self.payload.kind())
    }
}

/// Anonymous page-level event. Carries no client identifiers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    pub recorded_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>, path: Option<String>, locale: Option<Locale>) -> Self {
        let recorded_at = Utc::now();
        Self {
            id: format!("EVT-{}-{}", recorded_at.timestamp_millis(), short_suffix()),
            name: name.into(),
            path,
            locale,
            recorded_at,
        }
    }
}
