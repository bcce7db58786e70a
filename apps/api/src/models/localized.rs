use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Languages the site is published in. The first entry is the default.
pub const SUPPORTED_LANGUAGES: [Language; 2] = [Language::Nl, Language::En];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Nl,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Nl => "nl",
            Language::En => "en",
        }
    }

    /// Label shown on the language-selection splash, in the language itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Nl => "Nederlands",
            Language::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nl" => Ok(Language::Nl),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

/// Per-language text for one logical field.
///
/// Keys are raw language codes so rows written by other clients survive a
/// round trip even when they carry a code this service does not publish.
/// Lookups of a missing code yield the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedField(BTreeMap<String, String>);

impl LocalizedField {
    /// A field with an empty value for every supported language.
    pub fn empty() -> Self {
        Self(
            SUPPORTED_LANGUAGES
                .iter()
                .map(|lang| (lang.code().to_string(), String::new()))
                .collect(),
        )
    }

    pub fn get(&self, language: &str) -> &str {
        self.0.get(language).map(String::as_str).unwrap_or("")
    }

    pub fn text(&self, language: Language) -> &str {
        self.get(language.code())
    }

    /// Sets one language, leaving the others untouched.
    pub fn set(&mut self, language: impl Into<String>, value: impl Into<String>) {
        self.0.insert(language.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes a stored column value.
    ///
    /// Accepts either the per-language object or a JSON string that encodes
    /// it. Anything else decodes to an empty field and is logged.
    pub fn from_column(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(
                map.into_iter()
                    .map(|(lang, text)| {
                        let text = match text {
                            Value::String(s) => s,
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (lang, text)
                    })
                    .collect(),
            ),
            Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
                Ok(inner @ Value::Object(_)) => Self::from_column(inner),
                _ => {
                    warn!("Localized field holds an undecodable string; treating as empty");
                    Self::default()
                }
            },
            Value::Null => Self::default(),
            other => {
                warn!("Localized field has unexpected shape: {other}");
                Self::default()
            }
        }
    }

    pub fn to_column(&self) -> Value {
        serde_json::to_value(&self.0).unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedField {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
