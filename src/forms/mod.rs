//! Lead form schemas.
//!
//! Each public form posts an untyped JSON object. [`validate`] turns it into a
//! typed [`Submission`] or a non-empty list of [`FieldError`]s; it never
//! panics on malformed input.
//!
//! ```rust,ignore
//! use agrilead::forms::{self, FormKind};
//!
//! let submission = forms::validate(FormKind::Rfq, &raw)?;
//! let clean = submission.sanitized();
//! ```

mod catalog;
mod contact;
mod messages;
mod rfq;
pub(crate) mod rules;

pub use catalog::CatalogDownloadSubmission;
pub use contact::{ContactSubmission, SubjectType};
pub use messages::{MessageSet, messages};
pub use rfq::{ContactInfo, DeliveryInfo, Frequency, Incoterm, ProductLine, RfqSubmission};

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::locale::Locale;

/// A single violated rule, addressed by dotted path (`products[2].unit`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Non-empty list of violations produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field.contains(field))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Which form a payload was posted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Rfq,
    CatalogRfq,
    Contact,
    CatalogDownload,
}

/// A validated form payload. Values are never mutated after validation;
/// [`Submission::sanitized`] builds a cleaned copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    Rfq(RfqSubmission),
    CatalogRfq(RfqSubmission),
    Contact(ContactSubmission),
    CatalogDownload(CatalogDownloadSubmission),
}

impl Submission {
    pub fn kind(&self) -> FormKind {
        match self {
            Submission::Rfq(_) => FormKind::Rfq,
            Submission::CatalogRfq(_) => FormKind::CatalogRfq,
            Submission::Contact(_) => FormKind::Contact,
            Submission::CatalogDownload(_) => FormKind::CatalogDownload,
        }
    }

    pub fn locale(&self) -> Locale {
        match self {
            Submission::Rfq(s) | Submission::CatalogRfq(s) => s.locale,
            Submission::Contact(s) => s.locale,
            Submission::CatalogDownload(s) => s.locale,
        }
    }

    /// Address of the person who filled in the form.
    pub fn email(&self) -> &str {
        match self {
            Submission::Rfq(s) | Submission::CatalogRfq(s) => &s.contact.email,
            Submission::Contact(s) => &s.email,
            Submission::CatalogDownload(s) => &s.email,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Submission::Rfq(s) | Submission::CatalogRfq(s) => &s.contact.name,
            Submission::Contact(s) => &s.name,
            Submission::CatalogDownload(s) => &s.name,
        }
    }

    pub fn company(&self) -> Option<&str> {
        match self {
            Submission::Rfq(s) | Submission::CatalogRfq(s) => Some(&s.contact.company),
            Submission::Contact(s) => s.company.as_deref(),
            Submission::CatalogDownload(s) => Some(&s.company),
        }
    }

    /// Returns a copy with every free-text field sanitized.
    pub fn sanitized(&self) -> Self {
        match self {
            Submission::Rfq(s) => Submission::Rfq(s.sanitized()),
            Submission::CatalogRfq(s) => Submission::CatalogRfq(s.sanitized()),
            Submission::Contact(s) => Submission::Contact(s.sanitized()),
            Submission::CatalogDownload(s) => Submission::CatalogDownload(s.sanitized()),
        }
    }
}

/// Validates a raw payload for the given form.
pub fn validate(kind: FormKind, raw: &Value) -> Result<Submission, FieldErrors> {
    let locale = rules::payload_locale(raw);
    let Some(object) = raw.as_object() else {
        return Err(FieldErrors::single("body", messages(locale).expected_object));
    };

    match kind {
        FormKind::Rfq => rfq::validate(object, locale).map(Submission::Rfq),
        FormKind::CatalogRfq => rfq::validate(object, locale).map(Submission::CatalogRfq),
        FormKind::Contact => contact::validate(object, locale).map(Submission::Contact),
        FormKind::CatalogDownload => catalog::validate(object, locale).map(Submission::CatalogDownload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_objects_are_rejected_without_panicking() {
        let inputs = [
            json!(null),
            json!(42),
            json!("rfq"),
            json!([1, 2, 3]),
            json!(true),
        ];
        for kind in [FormKind::Rfq, FormKind::CatalogRfq, FormKind::Contact, FormKind::CatalogDownload] {
            for input in &inputs {
                let errors = validate(kind, input).unwrap_err();
                assert!(!errors.0.is_empty());
            }
        }
    }

    #[test]
    fn garbage_objects_always_yield_errors() {
        let inputs = [
            json!({}),
            json!({"contact": "nope", "products": {"a": 1}}),
            json!({"contact": {"name": 5}, "products": [null, 3, "x"]}),
            json!({"name": [], "email": {}, "message": 1.5}),
            json!({"locale": "de", "products": [{"quantity": "NaN"}]}),
        ];
        for kind in [FormKind::Rfq, FormKind::Contact, FormKind::CatalogDownload] {
            for input in &inputs {
                let result = validate(kind, input);
                assert!(matches!(result, Err(ref e) if !e.0.is_empty()), "{kind:?} {input}");
            }
        }
    }

    #[test]
    fn field_errors_display_joins_paths() {
        let errors = FieldErrors(vec![
            FieldError::new("contact.email", "Invalid email address"),
            FieldError::new("products", "Select at least one product"),
        ]);
        assert_eq!(
            errors.to_string(),
            "contact.email: Invalid email address; products: Select at least one product"
        );
        assert!(errors.mentions("email"));
    }
}
