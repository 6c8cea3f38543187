use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::FieldErrors;
use super::rfq::Incoterm;
use super::rules::{self, Checker, TextRule};
use crate::locale::Locale;
use crate::sanitize::{sanitize, sanitize_opt};

const SUBJECT: TextRule = TextRule::new(3, 200);
const MESSAGE: TextRule = TextRule::new(10, 5000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject_type: SubjectType,
    pub subject: String,
    pub message: String,
    pub country: Option<String>,
    pub job_title: Option<String>,
    pub annual_volume: Option<String>,
    pub preferred_incoterm: Option<Incoterm>,
    pub locale: Locale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectType {
    Quote,
    ProductInfo,
    Partnership,
    Logistics,
    Quality,
    #[default]
    Other,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Quote => "quote",
            SubjectType::ProductInfo => "product-info",
            SubjectType::Partnership => "partnership",
            SubjectType::Logistics => "logistics",
            SubjectType::Quality => "quality",
            SubjectType::Other => "other",
        }
    }
}

impl FromStr for SubjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quote" => Ok(SubjectType::Quote),
            "product-info" | "product_info" => Ok(SubjectType::ProductInfo),
            "partnership" => Ok(SubjectType::Partnership),
            "logistics" => Ok(SubjectType::Logistics),
            "quality" => Ok(SubjectType::Quality),
            "other" => Ok(SubjectType::Other),
            _ => Err(()),
        }
    }
}

pub(super) fn validate(raw: &Map<String, Value>, locale: Locale) -> Result<ContactSubmission, FieldErrors> {
    let mut checker = Checker::new(locale);
    let raw = Some(raw);

    let submission = ContactSubmission {
        name: checker.text(raw, "name", "name", &rules::NAME),
        email: checker.email(raw, "email", "email"),
        phone: checker.text_optional(raw, "phone", "phone", &rules::PHONE_NUMBER),
        company: checker.text_optional(raw, "company", "company", &rules::COMPANY),
        subject_type: checker.choice(raw, "subjectType", "subjectType"),
        subject: checker.text(raw, "subject", "subject", &SUBJECT),
        message: checker.text(raw, "message", "message", &MESSAGE),
        country: checker.text_optional(raw, "country", "country", &rules::COUNTRY),
        job_title: checker.text_optional(raw, "jobTitle", "jobTitle", &rules::SHORT_TEXT),
        annual_volume: checker.text_optional(raw, "annualVolume", "annualVolume", &rules::SHORT_TEXT),
        preferred_incoterm: checker.choice_optional(raw, "preferredIncoterm", "preferredIncoterm"),
        locale,
    };

    checker.finish()?;
    Ok(submission)
}

impl ContactSubmission {
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize(&self.name),
            email: self.email.to_lowercase(),
            phone: sanitize_opt(&self.phone),
            company: sanitize_opt(&self.company),
            subject_type: self.subject_type,
            subject: sanitize(&self.subject),
            message: sanitize(&self.message),
            country: sanitize_opt(&self.country),
            job_title: sanitize_opt(&self.job_title),
            annual_volume: sanitize_opt(&self.annual_volume),
            preferred_incoterm: self.preferred_incoterm,
            locale: self.locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Map<String, Value> {
        let value = json!({
            "name": "Jean-Luc Dubois",
            "email": "jl.dubois@negoce.fr",
            "phone": "",
            "subjectType": "partnership",
            "subject": "Distribution partnership",
            "message": "We would like to distribute your cashew kernels in Belgium.",
            "preferredIncoterm": "CIF"
        });
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_minimal_contact() {
        let contact = validate(&payload(), Locale::En).unwrap();
        assert_eq!(contact.subject_type, SubjectType::Partnership);
        assert_eq!(contact.phone, None);
        assert_eq!(contact.company, None);
        assert_eq!(contact.preferred_incoterm, Some(Incoterm::Cif));
    }

    #[test]
    fn short_message_is_rejected() {
        let mut raw = payload();
        raw.insert("message".into(), json!("Hi"));
        let errors = validate(&raw, Locale::En).unwrap_err();
        assert_eq!(errors.0[0].field, "message");
        assert_eq!(errors.0[0].message, "Must be at least 10 characters");
    }

    #[test]
    fn optional_phone_is_still_checked_when_present() {
        let mut raw = payload();
        raw.insert("phone".into(), json!("call me maybe"));
        let errors = validate(&raw, Locale::En).unwrap_err();
        assert!(errors.mentions("phone"));
    }

    #[test]
    fn unknown_subject_type_is_rejected() {
        let mut raw = payload();
        raw.insert("subjectType".into(), json!("spam"));
        let errors = validate(&raw, Locale::Es).unwrap_err();
        assert_eq!(errors.0[0].message, "Opción no válida");
    }
}
