//! Translation catalog: language -> {ui, categories, lessons} string table.
//!
//! The table is JSON (`site/translations.json`). Nested objects are
//! flattened into dotted keys (`ui.verify`, `lessons.3.title`,
//! `lessons.3.feedback.has-id`) at load time, so lookups are a map access.

use crate::i18n::{Language, LookupMetrics};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Top-level sections every language must provide.
pub const SECTIONS: [&str; 3] = ["ui", "categories", "lessons"];

const BUILTIN_JSON: &str = include_str!("../../site/translations.json");

static BUILTIN: OnceLock<TranslationCatalog> = OnceLock::new();

/// Anything that turns a translation key into display text.
pub trait Resolver {
    /// Resolve `key` for `language`. Never fails; the worst case is the key.
    fn resolve(&self, key: &str, language: Language) -> String;
}

/// Loaded translation table.
#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    /// The table as read, kept for re-serialization by the bundler
    raw: Value,

    /// language code -> dotted key -> text
    strings: BTreeMap<String, BTreeMap<String, String>>,
}

impl TranslationCatalog {
    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json).context("Translation table is not valid JSON")?;
        Self::from_value(raw)
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read translations from {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to load translations from {}", path.display()))
    }

    /// Build a catalog from an already parsed JSON value.
    pub fn from_value(raw: Value) -> Result<Self> {
        let Some(languages) = raw.as_object() else {
            bail!("Translation table must be an object keyed by language code");
        };

        let mut strings = BTreeMap::new();
        for (code, table) in languages {
            let mut flat = BTreeMap::new();
            flatten("", table, &mut flat);
            strings.insert(code.clone(), flat);
        }

        Ok(Self { raw, strings })
    }

    /// The table compiled into the binary.
    ///
    /// A broken embedded table leaves an empty catalog, so every lookup
    /// shows its key.
    pub fn builtin() -> &'static TranslationCatalog {
        BUILTIN.get_or_init(|| match Self::from_json_str(BUILTIN_JSON) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Embedded translation table failed to load: {:#}", e);
                Self::default()
            }
        })
    }

    /// Exact lookup without fallback.
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        self.strings
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Look up `key` in `language`, falling back to the canonical language
    /// and then to the key itself.
    pub fn lookup<'a>(&'a self, key: &'a str, language: Language) -> &'a str {
        let metrics = LookupMetrics::global();

        if let Some(text) = self.get(language.code(), key) {
            metrics.record_hit();
            return text;
        }

        let canonical = Language::canonical();
        if language != canonical {
            if let Some(text) = self.get(canonical.code(), key) {
                debug!("Key '{}' missing for '{}', using '{}'", key, language, canonical);
                metrics.record_fallback();
                return text;
            }
        }

        debug!("Key '{}' missing in every language", key);
        metrics.record_miss();
        key
    }

    /// Look up `key` and substitute `{name}` placeholders.
    pub fn lookup_with(&self, key: &str, language: Language, args: &[(&str, &str)]) -> String {
        let mut text = self.lookup(key, language).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    /// Language codes present in the table.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    /// Dotted keys defined for `language` (empty if the language is absent).
    pub fn keys(&self, language: &str) -> Vec<&str> {
        self.strings
            .get(language)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether `language` has a top-level `section` object.
    pub fn has_section(&self, language: &str, section: &str) -> bool {
        self.raw
            .get(language)
            .and_then(|table| table.get(section))
            .map(Value::is_object)
            .unwrap_or(false)
    }

    /// The table as JSON, in its original shape.
    pub fn to_json_value(&self) -> &Value {
        &self.raw
    }
}

impl Resolver for TranslationCatalog {
    fn resolve(&self, key: &str, language: Language) -> String {
        self.lookup(key, language).to_string()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", prefix, name)
                };
                flatten(&key, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
