//! Process configuration read from the environment at startup.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` through `dotenvy`, then builds a `ServerConfig` once.
//! Rate-limit and pool tuning read their own variables with `env_parse`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use session::ProviderConfig;
use session::config::{DEFAULT_CLIENT_ID, DEFAULT_REALM, DEFAULT_URL};

const DEFAULT_PORT: u16 = 8000;

/// Parse a boolean-ish environment variable. Unset or unrecognized is `None`.
pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
    /// Skip bearer-token verification (local development only).
    pub auth_bypass: bool,
    pub provider: ProviderConfig,
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database_url: env_string("DATABASE_URL"),
            cors_origins: env_string("CORS_ORIGINS").map(|raw| parse_origins(&raw)).unwrap_or_default(),
            auth_bypass: env_bool("AUTH_BYPASS").unwrap_or(false),
            provider: ProviderConfig::new(
                env_string("OIDC_URL").unwrap_or_else(|| DEFAULT_URL.to_owned()),
                env_string("OIDC_REALM").unwrap_or_else(|| DEFAULT_REALM.to_owned()),
                env_string("OIDC_CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_owned()),
            ),
        }
    }
}
