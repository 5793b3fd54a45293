//! Default-language tag carried by instances.

use std::fmt;

use serde::{Deserialize, Serialize};

const UNDEFINED: &str = "und";

/// IETF BCP 47 language tag.
///
/// Parsing is lenient: empty or malformed input yields the `und`
/// ("undefined") tag instead of an error, so a stored value can always be
/// turned into a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// The `und` sentinel.
    #[must_use]
    pub fn undefined() -> Self {
        Self(UNDEFINED.to_owned())
    }

    /// Parse `value`, falling back to `und` when it is empty or not a
    /// well-formed tag.
    #[must_use]
    pub fn parse_or_undefined(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Self::undefined();
        }
        match language_tags::LanguageTag::parse(value) {
            Ok(tag) => Self(tag.as_str().to_owned()),
            Err(_) => Self::undefined(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag, e.g. `en` for `en-US`.
    #[must_use]
    pub fn primary_language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.primary_language().eq_ignore_ascii_case(UNDEFINED)
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::undefined()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LanguageTag {
    fn from(value: String) -> Self {
        Self::parse_or_undefined(&value)
    }
}

impl From<&str> for LanguageTag {
    fn from(value: &str) -> Self {
        Self::parse_or_undefined(value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}
