//! Declarative field rules and the checker that applies them to untyped JSON.
//!
//! The checker never short-circuits: every field is inspected and every
//! violation is recorded under its dotted path, so a client gets the full
//! list in one round trip.

use regex::Regex;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::LazyLock;

use super::messages::{MessageSet, messages};
use super::{FieldError, FieldErrors};
use crate::locale::Locale;
use crate::sanitize::sanitize;

static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}][\p{L}\p{M}\s'’-]*$").expect("valid regex"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9(][0-9\s().-]*$").expect("valid regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+'-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}$")
        .expect("valid regex")
});

pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_QUANTITY: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    PersonName,
    Phone,
}

/// Length bounds (in characters) plus an optional character-class pattern.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub min: usize,
    pub max: usize,
    pub pattern: Option<Pattern>,
}

impl TextRule {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max, pattern: None }
    }

    pub const fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

pub const NAME: TextRule = TextRule::new(2, 100).with_pattern(Pattern::PersonName);
pub const COMPANY: TextRule = TextRule::new(1, 100);
pub const PHONE_NUMBER: TextRule = TextRule::new(8, 20).with_pattern(Pattern::Phone);
pub const COUNTRY: TextRule = TextRule::new(2, 100);
pub const SHORT_TEXT: TextRule = TextRule::new(1, 100);
pub const PRODUCT_ID: TextRule = TextRule::new(1, 100);
pub const UNIT: TextRule = TextRule::new(1, 20);
pub const DESTINATION: TextRule = TextRule::new(2, 200);
pub const NOTES: TextRule = TextRule::new(0, 2000);

/// Joins a parent path and a key: `contact` + `email` -> `contact.email`.
pub fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

pub struct Checker {
    messages: &'static MessageSet,
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new(locale: Locale) -> Self {
        Self {
            messages: messages(locale),
            errors: Vec::new(),
        }
    }

    pub fn messages(&self) -> &'static MessageSet {
        self.messages
    }

    pub fn fail(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    /// Returns collected errors, or `Ok(())` when there were none.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(self.errors))
        }
    }

    /// Requires `key` to hold an object. A missing object is reported under
    /// its own path rather than as a cascade of missing children.
    pub fn object<'v>(
        &mut self,
        parent: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        match parent.get(key) {
            Some(Value::Object(map)) => Some(map),
            None | Some(Value::Null) => {
                self.fail(path, self.messages.required);
                None
            }
            Some(_) => {
                self.fail(path, self.messages.expected_object);
                None
            }
        }
    }

    /// Requires `key` to hold an array of `min..=max` entries. The entries are
    /// returned even when the cardinality is wrong so each can still be checked.
    pub fn array<'v>(
        &mut self,
        parent: &'v Map<String, Value>,
        key: &str,
        path: &str,
        min: usize,
        max: usize,
    ) -> &'v [Value] {
        let items = match parent.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            None | Some(Value::Null) => {
                self.fail(path, self.messages.too_few_products);
                return &[];
            }
            Some(_) => {
                self.fail(path, self.messages.expected_array);
                return &[];
            }
        };

        if items.len() < min {
            self.fail(path, self.messages.too_few_products);
        } else if items.len() > max {
            self.fail(path, MessageSet::with_bound(self.messages.too_many_products, max));
        }

        items
    }

    /// Reads a text field. Absent, `null` and blank strings all mean "not
    /// provided" and yield `Ok(None)`.
    fn raw_text(&mut self, obj: Option<&Map<String, Value>>, key: &str, path: &str) -> Result<Option<String>, ()> {
        match obj.and_then(|o| o.get(key)) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Some(_) => {
                self.fail(path, self.messages.expected_text);
                Err(())
            }
        }
    }

    /// Checks `rule` against the sanitized form of `value`, which is what
    /// ends up stored and mailed.
    fn apply(&mut self, value: &str, path: &str, rule: &TextRule) -> bool {
        let value = sanitize(value);
        if value.is_empty() {
            self.fail(path, self.messages.required);
            return false;
        }
        let len = value.chars().count();
        if len < rule.min {
            self.fail(path, MessageSet::with_bound(self.messages.too_short, rule.min));
            return false;
        }
        if len > rule.max {
            self.fail(path, MessageSet::with_bound(self.messages.too_long, rule.max));
            return false;
        }
        match rule.pattern {
            Some(Pattern::PersonName) if !PERSON_NAME.is_match(&value) => {
                self.fail(path, self.messages.invalid_name);
                false
            }
            Some(Pattern::Phone) if !PHONE.is_match(&value) => {
                self.fail(path, self.messages.invalid_phone);
                false
            }
            _ => true,
        }
    }

    /// Required text field. Returns an empty string when invalid; callers
    /// discard the value in that case because [`Checker::finish`] fails.
    pub fn text(&mut self, obj: Option<&Map<String, Value>>, key: &str, path: &str, rule: &TextRule) -> String {
        let Some(obj) = obj else {
            return String::new();
        };
        match self.raw_text(Some(obj), key, path) {
            Ok(Some(value)) => {
                if self.apply(&value, path, rule) {
                    value
                } else {
                    String::new()
                }
            }
            Ok(None) => {
                self.fail(path, self.messages.required);
                String::new()
            }
            Err(()) => String::new(),
        }
    }

    /// Optional text field; rules apply only when a value is provided.
    pub fn text_optional(
        &mut self,
        obj: Option<&Map<String, Value>>,
        key: &str,
        path: &str,
        rule: &TextRule,
    ) -> Option<String> {
        match self.raw_text(obj, key, path) {
            Ok(Some(value)) if sanitize(&value).is_empty() => None,
            Ok(Some(value)) if self.apply(&value, path, rule) => Some(value),
            _ => None,
        }
    }

    fn check_email(&mut self, value: String, path: &str) -> Option<String> {
        let email = value.to_lowercase();
        if email.chars().count() > MAX_EMAIL_LEN {
            self.fail(path, MessageSet::with_bound(self.messages.too_long, MAX_EMAIL_LEN));
            return None;
        }
        if !EMAIL.is_match(&email) {
            self.fail(path, self.messages.invalid_email);
            return None;
        }
        Some(email)
    }

    /// Required email address, lower-cased.
    pub fn email(&mut self, obj: Option<&Map<String, Value>>, key: &str, path: &str) -> String {
        let Some(obj) = obj else {
            return String::new();
        };
        match self.raw_text(Some(obj), key, path) {
            Ok(Some(value)) => self.check_email(value, path).unwrap_or_default(),
            Ok(None) => {
                self.fail(path, self.messages.required);
                String::new()
            }
            Err(()) => String::new(),
        }
    }

    /// Required enum member parsed with `FromStr`.
    pub fn choice<T: FromStr + Default>(&mut self, obj: Option<&Map<String, Value>>, key: &str, path: &str) -> T {
        let Some(obj) = obj else {
            return T::default();
        };
        match self.raw_text(Some(obj), key, path) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
                self.fail(path, self.messages.invalid_choice);
                T::default()
            }),
            Ok(None) => {
                self.fail(path, self.messages.required);
                T::default()
            }
            Err(()) => T::default(),
        }
    }

    /// Optional enum member.
    pub fn choice_optional<T: FromStr>(&mut self, obj: Option<&Map<String, Value>>, key: &str, path: &str) -> Option<T> {
        match self.raw_text(obj, key, path) {
            Ok(Some(value)) => match value.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    self.fail(path, self.messages.invalid_choice);
                    None
                }
            },
            _ => None,
        }
    }

    /// Positive quantity no larger than [`MAX_QUANTITY`]. Numeric strings are
    /// accepted since HTML number inputs often arrive as text.
    pub fn quantity(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> f64 {
        let parsed = match obj.get(key) {
            None | Some(Value::Null) => {
                self.fail(path, self.messages.required);
                return 0.0;
            }
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
            Some(Value::String(_)) => {
                self.fail(path, self.messages.required);
                return 0.0;
            }
            Some(_) => None,
        };

        let Some(quantity) = parsed.filter(|q| q.is_finite()) else {
            self.fail(path, self.messages.not_a_number);
            return 0.0;
        };

        if quantity <= 0.0 {
            self.fail(path, self.messages.must_be_positive);
            return 0.0;
        }
        if quantity > MAX_QUANTITY {
            self.fail(path, MessageSet::with_bound(self.messages.quantity_too_large, 1_000_000));
            return 0.0;
        }
        quantity
    }
}

/// Reads the optional `locale` field used to pick the message table.
pub fn payload_locale(raw: &Value) -> Locale {
    raw.get("locale")
        .and_then(Value::as_str)
        .map(Locale::from_tag)
        .unwrap_or_default()
}
