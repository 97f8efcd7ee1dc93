//! Translation table validation.
//!
//! Checks that a catalog covers every supported language and every key the
//! course needs, and that translations keep the `{placeholder}` names of
//! the canonical text.

use crate::course::{lessons, Category};
use crate::i18n::{Language, TranslationCatalog, SECTIONS};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Page strings that course code looks up by name.
const UI_KEYS: &[&str] = &["ui.hint_show", "ui.hint_hide", "ui.reference"];

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that leave the page showing raw keys
    pub errors: Vec<String>,

    /// Problems hidden by the English fallback
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation tables.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate a catalog.
    ///
    /// Errors:
    /// - a supported language is missing, or lacks a top-level section
    /// - a key the course needs is missing from the canonical language
    ///
    /// Warnings:
    /// - a canonical key is missing from another language
    /// - a key exists only outside the canonical language
    /// - a translation uses different placeholders than the canonical text
    pub fn validate(catalog: &TranslationCatalog) -> ValidationReport {
        let mut report = ValidationReport::new();
        let canonical = Language::canonical();

        for language in Language::all() {
            if !catalog.languages().any(|code| code == language.code()) {
                report
                    .errors
                    .push(format!("Language '{}' is missing", language));
                continue;
            }
            for section in SECTIONS {
                if !catalog.has_section(language.code(), section) {
                    report.errors.push(format!(
                        "Language '{}' has no '{}' section",
                        language, section
                    ));
                }
            }
        }

        for key in Self::required_keys() {
            if catalog.get(canonical.code(), &key).is_none() {
                report.errors.push(format!(
                    "Key '{}' is missing for '{}'",
                    key,
                    canonical.code()
                ));
            }
        }

        let canonical_keys: BTreeSet<&str> = catalog.keys(canonical.code()).into_iter().collect();
        for code in catalog.languages().filter(|c| *c != canonical.code()) {
            let keys: BTreeSet<&str> = catalog.keys(code).into_iter().collect();

            for key in canonical_keys.difference(&keys) {
                report
                    .warnings
                    .push(format!("Key '{}' is untranslated for '{}'", key, code));
            }
            for key in keys.difference(&canonical_keys) {
                report.warnings.push(format!(
                    "Key '{}' for '{}' has no '{}' counterpart",
                    key,
                    code,
                    canonical.code()
                ));
            }
            for key in keys.intersection(&canonical_keys) {
                let original = catalog.get(canonical.code(), key).unwrap_or_default();
                let translated = catalog.get(code, key).unwrap_or_default();
                let expected = Self::extract_placeholders(original);
                let found = Self::extract_placeholders(translated);
                if expected != found {
                    report.warnings.push(format!(
                        "Placeholder mismatch in '{}' for '{}': expected {:?}, found {:?}",
                        key, code, expected, found
                    ));
                }
            }
        }

        report
    }

    /// Every key the course looks up: lesson titles, starter code, hints,
    /// rule feedback, category titles and the hint/reference labels.
    pub fn required_keys() -> Vec<String> {
        let mut keys: Vec<String> = UI_KEYS.iter().map(|key| key.to_string()).collect();
        for lesson in lessons() {
            keys.push(lesson.title_key());
            keys.push(lesson.starter_code_key());
            keys.push(lesson.hint_key());
            for rule in lesson.rules {
                keys.push(lesson.feedback_key(rule.id));
            }
        }
        for category in Category::all() {
            keys.push(category.title_key());
        }
        keys
    }

    /// Extract `{name}` placeholders, sorted and deduplicated.
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
