use serde::Serialize;
use serde_json::{Map, Value};

use super::FieldErrors;
use super::rules::{self, Checker, TextRule};
use crate::locale::Locale;
use crate::sanitize::sanitize;

/// Resource id handed out when the form doesn't name one.
pub const DEFAULT_CATALOG_ID: &str = "catalog";

const CATALOG_ID: TextRule = TextRule::new(1, 64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDownloadSubmission {
    pub name: String,
    pub email: String,
    pub company: String,
    pub country: String,
    pub catalog_id: String,
    pub locale: Locale,
}

pub(super) fn validate(raw: &Map<String, Value>, locale: Locale) -> Result<CatalogDownloadSubmission, FieldErrors> {
    let mut checker = Checker::new(locale);
    let raw = Some(raw);

    let submission = CatalogDownloadSubmission {
        name: checker.text(raw, "name", "name", &rules::NAME),
        email: checker.email(raw, "email", "email"),
        company: checker.text(raw, "company", "company", &rules::COMPANY),
        country: checker.text(raw, "country", "country", &rules::COUNTRY),
        catalog_id: checker
            .text_optional(raw, "catalogId", "catalogId", &CATALOG_ID)
            .unwrap_or_else(|| DEFAULT_CATALOG_ID.to_string()),
        locale,
    };

    checker.finish()?;
    Ok(submission)
}

impl CatalogDownloadSubmission {
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize(&self.name),
            email: self.email.to_lowercase(),
            company: sanitize(&self.company),
            country: sanitize(&self.country),
            catalog_id: sanitize(&self.catalog_id),
            locale: self.locale,
        }
    }
}
