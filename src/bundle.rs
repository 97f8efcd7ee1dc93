//! Standalone page bundler.
//!
//! `index.html` loads `translations.json` with `fetch`, which browsers refuse
//! for pages opened from disk. The bundler swaps that loader block for the
//! table itself and writes `index-standalone.html`, a single file that works
//! without a server.

use crate::i18n::{CatalogValidator, TranslationCatalog};
use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

pub const INPUT_FILE: &str = "index.html";
pub const OUTPUT_FILE: &str = "index-standalone.html";

static FETCH_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();

const JSON_INDENT: &[u8] = b"          ";

/// Sizes and outcome of a bundling run.
#[derive(Debug, Clone, Serialize)]
pub struct BundleReport {
    pub output: PathBuf,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub translations_bytes: usize,
    /// False when no loader block was found; the output is then a copy
    pub replaced: bool,
}

impl BundleReport {
    pub fn format_log(&self) -> String {
        format!(
            "{}: {} -> {} bytes ({:.1} KB -> {:.1} KB), translations {} bytes",
            self.output.display(),
            self.input_bytes,
            self.output_bytes,
            self.input_bytes as f64 / 1024.0,
            self.output_bytes as f64 / 1024.0,
            self.translations_bytes
        )
    }
}

fn fetch_block_regex() -> &'static Regex {
    FETCH_BLOCK_REGEX.get_or_init(|| {
        Regex::new(
            r"// Load translations from external JSON file\s+let translations = \{\};\s+let translationsLoaded = false;\s+// Load translations\.json\s+fetch\('translations\.json'\)[\s\S]*?\}\);",
        )
        .unwrap()
    })
}

/// The translation table as a script literal: pretty JSON, non-ASCII kept.
pub fn translations_literal(catalog: &TranslationCatalog) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    catalog
        .to_json_value()
        .serialize(&mut serializer)
        .context("Failed to serialize translations")?;
    String::from_utf8(out).context("Serialized translations are not UTF-8")
}

/// Replace every loader block in `html` with the inlined table.
///
/// Returns the new page and whether anything was replaced.
pub fn inline_translations(html: &str, catalog: &TranslationCatalog) -> Result<(String, bool)> {
    let regex = fetch_block_regex();
    if !regex.is_match(html) {
        return Ok((html.to_string(), false));
    }

    let embedded = format!(
        "// Embedded translations (standalone version)\n        const translations = {};\n        const translationsLoaded = true;",
        translations_literal(catalog)?
    );
    let page = regex.replace_all(html, NoExpand(&embedded)).into_owned();
    Ok((page, true))
}

/// Bundle `<site_root>/index.html` with the table at `translations`.
pub fn bundle(site_root: &Path, translations: &Path) -> Result<BundleReport> {
    let catalog = TranslationCatalog::from_path(translations)?;
    let translations_bytes = std::fs::metadata(translations)
        .with_context(|| format!("Failed to stat {}", translations.display()))?
        .len() as usize;

    let report = CatalogValidator::validate(&catalog);
    for error in &report.errors {
        warn!("Translation table: {}", error);
    }
    for warning in &report.warnings {
        warn!("Translation table: {}", warning);
    }

    let input = site_root.join(INPUT_FILE);
    let html = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let (page, replaced) = inline_translations(&html, &catalog)?;
    if !replaced {
        warn!("No translation loader block found in {}; writing it unchanged", input.display());
    }

    let output = site_root.join(OUTPUT_FILE);
    std::fs::write(&output, &page)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let bundle_report = BundleReport {
        output,
        input_bytes: html.len(),
        output_bytes: page.len(),
        translations_bytes,
        replaced,
    };
    info!("Created {}", bundle_report.format_log());

    Ok(bundle_report)
}
