//! Language codes used to key translations.
//!
//! Codes are BCP-47-style tags restricted to a primary subtag and an
//! optional region (`en`, `fr`, `pt-BR`). They are normalised on parse so
//! `EN` and `en` address the same translation row.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fallback language when neither the request nor the artist names one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Maximum stored length of a language code (matches the column width).
pub const MAX_LANGUAGE_CODE_LENGTH: usize = 10;

static LANGUAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").expect("valid regex"));

/// A validated, normalised language code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and normalise a language code.
    ///
    /// The primary subtag is lower-cased and the region upper-cased, so
    /// `"PT-br"` becomes `"pt-BR"`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let normalised = match trimmed.split_once(['-', '_']) {
            Some((primary, region)) => format!(
                "{}-{}",
                primary.to_ascii_lowercase(),
                region.to_ascii_uppercase()
            ),
            None => trimmed.to_ascii_lowercase(),
        };

        if normalised.len() > MAX_LANGUAGE_CODE_LENGTH || !LANGUAGE_RE.is_match(&normalised) {
            return Err(CoreError::Validation(format!(
                "Invalid language code '{raw}'. Expected e.g. 'en' or 'pt-BR'"
            )));
        }
        Ok(Self(normalised))
    }

    /// Resolve the effective language for a request: the explicit query
    /// value if present, otherwise `fallback`.
    pub fn resolve(requested: Option<&str>, fallback: &str) -> Result<Self, CoreError> {
        match requested {
            Some(raw) if !raw.trim().is_empty() => Self::parse(raw),
            _ => Self::parse(fallback),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
