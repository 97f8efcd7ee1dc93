use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SITE_ROOT: &str = "site";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Dev server
    pub port: u16,
    pub site_root: PathBuf,

    // Share links; derived from the port when unset
    pub base_url: Option<String>,

    // Translation table; `<site_root>/translations.json` when unset
    pub translations_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            site_root: PathBuf::from(DEFAULT_SITE_ROOT),
            base_url: None,
            translations_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Dev server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            site_root: std::env::var("SITE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITE_ROOT)),

            // Share links
            base_url: std::env::var("BASE_URL").ok().filter(|v| !v.is_empty()),

            // Translations
            translations_file: std::env::var("TRANSLATIONS_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Apply a port given on the command line; it wins over `PORT`.
    pub fn with_port_arg(mut self, arg: Option<&str>) -> Result<Self> {
        if let Some(arg) = arg {
            self.port = arg
                .parse()
                .with_context(|| format!("Invalid port argument: '{}'", arg))?;
        }
        Ok(self)
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/", self.port))
    }

    pub fn translations_path(&self) -> PathBuf {
        self.translations_file
            .clone()
            .unwrap_or_else(|| self.site_root.join("translations.json"))
    }
}
