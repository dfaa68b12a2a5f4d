use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Where course snapshots come from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLocation {
    /// Base URL of the course service (`GET {url}/courses`).
    Service(String),
    /// JSON file holding a fixed snapshot.
    Snapshot(PathBuf),
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub genai_service_url: String,
    pub catalog: CatalogLocation,
    pub ai_timeout_secs: u64,
    pub ai_retry_base_delay_ms: u64,
    pub ai_fallback_enabled: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let genai_service_url = var("GENAI_SERVICE_URL")
            .with_context(|| "Required environment variable 'GENAI_SERVICE_URL' is not set")?;

        // A snapshot file wins over the service URL when both are set.
        let catalog = match (var("CATALOG_SNAPSHOT_PATH"), var("CATALOG_SERVICE_URL")) {
            (Some(path), _) => CatalogLocation::Snapshot(PathBuf::from(path)),
            (None, Some(url)) => CatalogLocation::Service(url),
            (None, None) => bail!(
                "Either 'CATALOG_SERVICE_URL' or 'CATALOG_SNAPSHOT_PATH' must be set"
            ),
        };

        Ok(Config {
            genai_service_url,
            catalog,
            ai_timeout_secs: var("AI_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            ai_retry_base_delay_ms: var("AI_RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|| "1000".to_string())
                .parse::<u64>()
                .context("AI_RETRY_BASE_DELAY_MS must be a whole number of milliseconds")?,
            ai_fallback_enabled: match var("AI_FALLBACK_ENABLED") {
                Some(v) => parse_bool(&v).context("AI_FALLBACK_ENABLED must be true or false")?,
                None => true,
            },
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}
