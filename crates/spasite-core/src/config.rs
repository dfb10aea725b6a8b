use crate::app_config::{AppConfig, Environment, StoreBackend};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SPASITE_ENV", "development"));
    let store_backend = parse_store_backend(&or_default("SPASITE_STORE", "postgres"))
        .map_err(|reason| invalid("SPASITE_STORE", reason))?;

    let database_url = match store_backend {
        StoreBackend::Postgres => Some(require("DATABASE_URL")?),
        StoreBackend::Memory => lookup("DATABASE_URL").ok(),
    };

    let reviews_url = require("SPASITE_REVIEWS_URL")?;
    let hours_url = require("SPASITE_HOURS_URL")?;

    let bind_addr = or_default("SPASITE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SPASITE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SPASITE_LOG_LEVEL", "info");
    let upstream_timeout_secs = parse_u64("SPASITE_UPSTREAM_TIMEOUT_SECS", "30")?;
    if upstream_timeout_secs == 0 {
        return Err(invalid(
            "SPASITE_UPSTREAM_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }

    let admin_emails = parse_admin_emails(&or_default("SPASITE_ADMIN_EMAILS", ""));
    let identity_url = lookup("SPASITE_IDENTITY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let sync_cron = or_default("SPASITE_SYNC_CRON", "0 0 9 * * *");
    if sync_cron.split_whitespace().count() != 6 {
        return Err(invalid(
            "SPASITE_SYNC_CRON",
            format!("expected a 6-field cron expression, got '{sync_cron}'"),
        ));
    }
    let catalog_path = PathBuf::from(or_default("SPASITE_CATALOG_PATH", "./config/catalog.yaml"));

    let db_max_connections = parse_u32("SPASITE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SPASITE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SPASITE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        store_backend,
        env,
        bind_addr,
        log_level,
        reviews_url,
        hours_url,
        upstream_timeout_secs,
        admin_emails,
        identity_url,
        sync_cron,
        catalog_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_store_backend(s: &str) -> Result<StoreBackend, String> {
    match s.trim() {
        "postgres" => Ok(StoreBackend::Postgres),
        "memory" => Ok(StoreBackend::Memory),
        other => Err(format!("expected 'postgres' or 'memory', got '{other}'")),
    }
}

/// Split a comma-separated allow-list, trimming and lower-casing each entry.
fn parse_admin_emails(raw: &str) -> Vec<String> {
    let mut emails: Vec<String> = Vec::new();
    for email in raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
    {
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    emails
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
