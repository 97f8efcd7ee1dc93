//! Display languages of the course.
//!
//! The set is fixed at compile time: English, which is canonical and the
//! fallback for missing translations, then French. [`Language`] values can
//! only be built from that table.

use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Metadata of a display language.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LanguageInfo {
    /// ISO 639-1 code, also the value of `<html lang>`
    pub code: &'static str,

    /// English name (e.g., "French")
    pub name: &'static str,

    /// Name shown in the language dropdown (e.g., "Français")
    pub native_name: &'static str,
}

const ENGLISH_INFO: LanguageInfo = LanguageInfo {
    code: "en",
    name: "English",
    native_name: "English",
};

const FRENCH_INFO: LanguageInfo = LanguageInfo {
    code: "fr",
    name: "French",
    native_name: "Français",
};

/// Supported languages in dropdown order. The first one is canonical.
pub static LANGUAGES: [LanguageInfo; 2] = [ENGLISH_INFO, FRENCH_INFO];

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    info: &'static LanguageInfo,
}

impl Language {
    pub const ENGLISH: Language = Language {
        info: &ENGLISH_INFO,
    };

    pub const FRENCH: Language = Language {
        info: &FRENCH_INFO,
    };

    /// Parse an exact, lowercase language code.
    pub fn from_code(code: &str) -> Result<Language> {
        match LANGUAGES.iter().find(|info| info.code == code) {
            Some(info) => Ok(Language { info }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Every supported language, canonical first.
    pub fn all() -> impl Iterator<Item = Language> {
        LANGUAGES.iter().map(|info| Language { info })
    }

    /// The language used when a translation is missing.
    pub fn canonical() -> Language {
        Language::ENGLISH
    }

    pub fn code(&self) -> &'static str {
        self.info.code
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn native_name(&self) -> &'static str {
        self.info.native_name
    }

    pub fn is_canonical(&self) -> bool {
        *self == Language::canonical()
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code).map_err(serde::de::Error::custom)
    }
}
