//! Dev server for the course page.
//!
//! Usage:
//!   cargo run              # serve ./site on PORT (default 8000)
//!   cargo run -- 3000      # port argument wins over PORT
//!
//! Optional environment variables:
//! - PORT (defaults to 8000)
//! - SITE_ROOT (defaults to site)
//! - BASE_URL (defaults to http://localhost:<port>/)
//! - TRANSLATIONS_FILE (defaults to <SITE_ROOT>/translations.json)

use anyhow::Result;
use learn_html_css::config::Config;
use learn_html_css::i18n::{CatalogValidator, TranslationCatalog};
use learn_html_css::server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learn_html_css=info".parse()?),
        )
        .init();

    let port_arg = std::env::args().nth(1);
    let config = Config::from_env()?.with_port_arg(port_arg.as_deref())?;

    // A broken table still serves; the page falls back to English or keys
    let translations = config.translations_path();
    match TranslationCatalog::from_path(&translations) {
        Ok(catalog) => {
            let report = CatalogValidator::validate(&catalog);
            if report.is_clean() {
                info!("Translations OK: {}", translations.display());
            }
            for problem in report.errors.iter().chain(&report.warnings) {
                warn!("Translation table: {}", problem);
            }
        }
        Err(e) => warn!("{:#}", e),
    }

    server::serve(&config).await
}
