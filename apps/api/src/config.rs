use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the site runs on the in-memory table store.
    pub database_url: Option<String>,
    pub admin_password: String,
    pub draft_dir: String,
    pub site_name: String,
    pub site_subtitle: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            admin_password: require_env("ADMIN_PASSWORD")?,
            draft_dir: optional_env("DRAFT_DIR").unwrap_or_else(|| "./.drafts".to_string()),
            site_name: optional_env("SITE_NAME").unwrap_or_else(|| "John Doe".to_string()),
            site_subtitle: optional_env("SITE_SUBTITLE")
                .unwrap_or_else(|| "Example Expertise".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
