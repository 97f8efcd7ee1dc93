//! Standalone bundler - inlines translations.json into index.html
//!
//! Usage:
//!   cargo run --bin embed                # bundle ./site
//!   cargo run --bin embed -- public      # bundle another site directory
//!
//! Output:
//!   <site>/index-standalone.html (single file that works without a server)
//!
//! Optional environment variables:
//! - SITE_ROOT (defaults to site)
//! - TRANSLATIONS_FILE (defaults to <SITE_ROOT>/translations.json)

use anyhow::Result;
use learn_html_css::bundle;
use learn_html_css::config::Config;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learn_html_css=info".parse()?),
        )
        .init();

    let mut config = Config::from_env()?;
    if let Some(site_root) = std::env::args().nth(1) {
        config.site_root = PathBuf::from(site_root);
    }

    info!("Creating standalone version with embedded translations...");
    let report = bundle::bundle(&config.site_root, &config.translations_path())?;

    println!("\n========== STANDALONE PAGE ==========");
    println!("Created: {}", report.output.display());
    println!(
        "  {} (requires server): {:>8} bytes ({:>6.1} KB)",
        bundle::INPUT_FILE,
        report.input_bytes,
        report.input_bytes as f64 / 1024.0
    );
    println!(
        "  {}:           {:>8} bytes ({:>6.1} KB)",
        bundle::OUTPUT_FILE,
        report.output_bytes,
        report.output_bytes as f64 / 1024.0
    );
    println!(
        "  translations.json:               {:>8} bytes ({:>6.1} KB)",
        report.translations_bytes,
        report.translations_bytes as f64 / 1024.0
    );
    println!("=====================================\n");

    if !report.replaced {
        warn!("The standalone page still fetches translations.json");
    }

    Ok(())
}
