//! Internationalization (i18n) module for the course's display languages.
//!
//! All language-related logic, the translation table and its checks are
//! contained here.
//!
//! # Architecture
//!
//! - `language`: The supported languages (`en` canonical, `fr`) and the Language type
//! - `catalog`: Translation table with fallback lookup (requested -> English -> key)
//! - `strings`: Locale data used by the engine itself (date formatting)
//! - `validator`: Translation table completeness checks
//! - `metrics`: Lookup counters
//!
//! # Example
//!
//! ```rust
//! use learn_html_css::i18n::{Language, TranslationCatalog};
//!
//! let catalog = TranslationCatalog::builtin();
//! assert_eq!(catalog.lookup("ui.skip", Language::FRENCH), "Passer");
//! assert_eq!(catalog.lookup("ui.unknown", Language::FRENCH), "ui.unknown");
//! ```

mod catalog;
mod language;
mod metrics;
mod strings;
mod validator;

pub use catalog::{Resolver, TranslationCatalog, SECTIONS};
pub use language::{Language, LanguageInfo, LANGUAGES};
pub use metrics::{LookupMetrics, MetricsReport};
pub use strings::{LanguageStrings, ENGLISH_STRINGS, FRENCH_STRINGS};
pub use validator::{CatalogValidator, ValidationReport};
