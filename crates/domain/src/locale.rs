//! Locale preference sent as `Accept-Language`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// A language tag such as `en` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Tag used when no preference has been stored.
    pub const DEFAULT_TAG: &'static str = "en";

    /// Parses a language tag.
    ///
    /// Accepts ASCII letters, digits and `-`, 1 to 35 characters, which
    /// covers BCP 47 tags without admitting header-breaking input.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is empty or contains other characters.
    pub fn parse(tag: &str) -> DomainResult<Self> {
        let tag = tag.trim();
        let valid = !tag.is_empty()
            && tag.len() <= 35
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !tag.starts_with('-');
        if valid {
            Ok(Self(tag.to_string()))
        } else {
            Err(DomainError::InvalidLocale(tag.to_string()))
        }
    }

    /// Returns the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(Self::DEFAULT_TAG.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}
