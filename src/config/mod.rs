// src/config/mod.rs

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

/// Fixed SICA salary-scale PDF used as pricing context for the budget table.
const DEFAULT_REFERENCE_URL: &str =
    "https://www.sicacine.org.ar/docs/Salarios%20Largometrajes%20Nacionales%20Febrero%2026.pdf";

#[derive(Debug, Clone)]
pub struct GreenlightConfig {
    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Generation
    pub model: String,
    pub generate_timeout: u64,
    pub retry_attempts: usize,
    pub retry_delay_secs: u64,

    // ── Prompt budgets (characters)
    pub script_char_budget: usize,
    pub reference_char_budget: usize,

    // ── Reference pricing fetch
    pub reference_url: String,
    pub reference_timeout: u64,

    // ── Auth
    pub users_file: String,

    // ── Logging
    pub log_level: String,
}

// Handles values with inline comments and extra whitespace; a missing
// variable is not an error, just the default.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl GreenlightConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            host: env_var_or("GREENLIGHT_HOST", "0.0.0.0".to_string()),
            port: env_var_or("GREENLIGHT_PORT", 3400),
            cors_origin: env_var_or("GREENLIGHT_CORS_ORIGIN", "http://localhost:3000".to_string()),
            model: env_var_or("GREENLIGHT_MODEL", "gemini-2.5-flash".to_string()),
            generate_timeout: env_var_or("GREENLIGHT_GENERATE_TIMEOUT", 300),
            retry_attempts: env_var_or("GREENLIGHT_RETRY_ATTEMPTS", 3),
            retry_delay_secs: env_var_or("GREENLIGHT_RETRY_DELAY", 60),
            script_char_budget: env_var_or("GREENLIGHT_SCRIPT_CHAR_BUDGET", 350_000),
            reference_char_budget: env_var_or("GREENLIGHT_REFERENCE_CHAR_BUDGET", 5_000),
            reference_url: env_var_or("GREENLIGHT_REFERENCE_URL", DEFAULT_REFERENCE_URL.to_string()),
            reference_timeout: env_var_or("GREENLIGHT_REFERENCE_TIMEOUT", 10),
            users_file: env_var_or("GREENLIGHT_USERS_FILE", "users.toml".to_string()),
            log_level: env_var_or("GREENLIGHT_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn retry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.retry_delay_secs)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<GreenlightConfig> = Lazy::new(GreenlightConfig::from_env);

#[derive(Debug, Deserialize)]
struct UsersFile {
    users: HashMap<String, String>,
}

/// Load the static `username = "password"` table from the users TOML file.
///
/// A missing or malformed file is a hard error: without it every login
/// would fail with no hint as to why.
pub fn load_users(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("users file not found: {}", path.display()))?;
    let parsed: UsersFile = toml::from_str(&raw)
        .with_context(|| format!("invalid users file: {}", path.display()))?;
    Ok(parsed.users)
}
