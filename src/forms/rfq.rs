use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::FieldErrors;
use super::rules::{self, Checker, join};
use crate::locale::Locale;
use crate::sanitize::{sanitize, sanitize_opt};

pub const MAX_PRODUCT_LINES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RfqSubmission {
    pub contact: ContactInfo,
    pub products: Vec<ProductLine>,
    pub delivery: DeliveryInfo,
    pub notes: Option<String>,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub incoterm: Incoterm,
    pub destination: String,
    pub desired_date: Option<String>,
    pub frequency: Option<Frequency>,
}

/// Incoterms 2020.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterm {
    Exw,
    Fca,
    Fas,
    #[default]
    Fob,
    Cfr,
    Cif,
    Cpt,
    Cip,
    Dap,
    Dpu,
    Ddp,
}

impl Incoterm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Incoterm::Exw => "EXW",
            Incoterm::Fca => "FCA",
            Incoterm::Fas => "FAS",
            Incoterm::Fob => "FOB",
            Incoterm::Cfr => "CFR",
            Incoterm::Cif => "CIF",
            Incoterm::Cpt => "CPT",
            Incoterm::Cip => "CIP",
            Incoterm::Dap => "DAP",
            Incoterm::Dpu => "DPU",
            Incoterm::Ddp => "DDP",
        }
    }
}

impl FromStr for Incoterm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EXW" => Ok(Incoterm::Exw),
            "FCA" => Ok(Incoterm::Fca),
            "FAS" => Ok(Incoterm::Fas),
            "FOB" => Ok(Incoterm::Fob),
            "CFR" => Ok(Incoterm::Cfr),
            "CIF" => Ok(Incoterm::Cif),
            "CPT" => Ok(Incoterm::Cpt),
            "CIP" => Ok(Incoterm::Cip),
            "DAP" => Ok(Incoterm::Dap),
            "DPU" => Ok(Incoterm::Dpu),
            "DDP" => Ok(Incoterm::Ddp),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::OneTime => "one-time",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }
}

impl FromStr for Frequency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-time" | "once" => Ok(Frequency::OneTime),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "annual" | "yearly" => Ok(Frequency::Annual),
            _ => Err(()),
        }
    }
}

pub(super) fn validate(raw: &Map<String, Value>, locale: Locale) -> Result<RfqSubmission, FieldErrors> {
    let mut checker = Checker::new(locale);

    let contact = checker.object(raw, "contact", "contact");
    let contact = ContactInfo {
        name: checker.text(contact, "name", "contact.name", &rules::NAME),
        email: checker.email(contact, "email", "contact.email"),
        company: checker.text(contact, "company", "contact.company", &rules::COMPANY),
        phone: checker.text(contact, "phone", "contact.phone", &rules::PHONE_NUMBER),
        country: checker.text_optional(contact, "country", "contact.country", &rules::COUNTRY),
    };

    let mut products = Vec::new();
    let lines = checker.array(raw, "products", "products", 1, MAX_PRODUCT_LINES);
    for (index, line) in lines.iter().enumerate() {
        let path = format!("products[{index}]");
        let Value::Object(line) = line else {
            let message = checker.messages().expected_object;
            checker.fail(path, message);
            continue;
        };
        products.push(ProductLine {
            product_id: checker.text(Some(line), "productId", &join(&path, "productId"), &rules::PRODUCT_ID),
            product_name: checker.text_optional(Some(line), "productName", &join(&path, "productName"), &rules::SHORT_TEXT),
            quantity: checker.quantity(line, "quantity", &join(&path, "quantity")),
            unit: checker.text(Some(line), "unit", &join(&path, "unit"), &rules::UNIT),
            grade: checker.text_optional(Some(line), "grade", &join(&path, "grade"), &rules::SHORT_TEXT),
        });
    }

    let delivery = checker.object(raw, "delivery", "delivery");
    let delivery = DeliveryInfo {
        incoterm: checker.choice(delivery, "incoterm", "delivery.incoterm"),
        destination: checker.text(delivery, "destination", "delivery.destination", &rules::DESTINATION),
        desired_date: checker.text_optional(delivery, "desiredDate", "delivery.desiredDate", &rules::SHORT_TEXT),
        frequency: checker.choice_optional(delivery, "frequency", "delivery.frequency"),
    };

    let notes = checker.text_optional(Some(raw), "notes", "notes", &rules::NOTES);

    checker.finish()?;

    Ok(RfqSubmission {
        contact,
        products,
        delivery,
        notes,
        locale,
    })
}

impl RfqSubmission {
    pub fn sanitized(&self) -> Self {
        Self {
            contact: ContactInfo {
                name: sanitize(&self.contact.name),
                email: self.contact.email.to_lowercase(),
                company: sanitize(&self.contact.company),
                phone: sanitize(&self.contact.phone),
                country: sanitize_opt(&self.contact.country),
            },
            products: self
                .products
                .iter()
                .map(|p| ProductLine {
                    product_id: sanitize(&p.product_id),
                    product_name: sanitize_opt(&p.product_name),
                    quantity: p.quantity,
                    unit: sanitize(&p.unit),
                    grade: sanitize_opt(&p.grade),
                })
                .collect(),
            delivery: DeliveryInfo {
                incoterm: self.delivery.incoterm,
                destination: sanitize(&self.delivery.destination),
                desired_date: sanitize_opt(&self.delivery.desired_date),
                frequency: self.delivery.frequency,
            },
            notes: sanitize_opt(&self.notes),
            locale: self.locale,
        }
    }

    /// Sum of quantities per unit, in first-seen order.
    pub fn totals_by_unit(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for line in &self.products {
            match totals.iter_mut().find(|(unit, _)| *unit == line.unit) {
                Some((_, total)) => *total += line.quantity,
                None => totals.push((line.unit.clone(), line.quantity)),
            }
        }
        totals
    }
}
