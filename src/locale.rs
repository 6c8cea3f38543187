//! Site locales.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locales the public site is published in.
///
/// Anything we don't recognise collapses to [`Locale::En`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fr,
    #[default]
    En,
    Es,
    De,
    Ru,
}

impl Locale {
    pub const ALL: [Locale; 5] = [Locale::Fr, Locale::En, Locale::Es, Locale::De, Locale::Ru];

    /// Parses a language tag such as `fr`, `fr-FR` or `de_CH`.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "fr" => Locale::Fr,
            "es" => Locale::Es,
            "de" => Locale::De,
            "ru" => Locale::Ru,
            _ => Locale::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
            Locale::Es => "es",
            Locale::De => "de",
            Locale::Ru => "ru",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
