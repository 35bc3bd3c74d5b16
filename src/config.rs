use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "cafe-pos.db";
const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log_level: String,
    /// Prefix for amounts in human-readable output. Never stored.
    pub currency_symbol: String,
}

/// Reads the configuration from the process environment.
///
/// Call `bootstrap::init_env` first so values from `.env` are visible.
pub fn load() -> Result<Config> {
    from_lookup(|key| std::env::var(key).ok())
}

pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let pool_size = match lookup("DATABASE_POOL_SIZE") {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("DATABASE_POOL_SIZE must be a positive integer, got '{raw}'"))?,
        None => DEFAULT_POOL_SIZE,
    };
    if pool_size == 0 {
        anyhow::bail!("DATABASE_POOL_SIZE must be at least 1");
    }

    Ok(Config {
        database: DatabaseConfig { url, pool_size },
        log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        currency_symbol: lookup("CURRENCY_SYMBOL")
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
    })
}
