use std::env;
use std::path::PathBuf;

use crate::catalog::Language;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Directory holding the allergen icon assets.
    pub assets_dir: PathBuf,
    /// Directory where generated reports are written before being streamed.
    pub output_dir: PathBuf,
    /// Default language for the report endpoint when no `lang` is supplied.
    pub report_language: String,
}

impl Config {
    pub fn from_env() -> Self {
        let report_language = env_or("REPORT_LANG", "en");
        if Language::parse(&report_language).is_none() {
            panic!("REPORT_LANG must be one of: en, nl (got {report_language:?})");
        }

        Config {
            port: env_or("PORT", "8080")
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env_or("DATABASE_URL", "snackbar_catalog.db"),
            assets_dir: PathBuf::from(env_or("ASSETS_DIR", "assets/allergens")),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "output")),
            report_language,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
