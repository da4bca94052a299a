use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::policy::{load_policy, ScoringPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_percent = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u8>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value > 100 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{value} is above 100"),
            });
        }
        Ok(value)
    };

    let raw_path = PathBuf::from(or_default("LEADRANK_RAW_PATH", "leads_raw.csv"));
    let scored_path = PathBuf::from(or_default("LEADRANK_SCORED_PATH", "leads_scored.csv"));
    let export_path = PathBuf::from(or_default(
        "LEADRANK_EXPORT_PATH",
        "qualified_leads_filtered.csv",
    ));
    let policy_path = lookup("LEADRANK_POLICY_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let log_level = or_default("LEADRANK_LOG_LEVEL", "info");
    let high_match_threshold = parse_percent("LEADRANK_HIGH_MATCH_THRESHOLD", "80")?;

    Ok(AppConfig {
        raw_path,
        scored_path,
        export_path,
        policy_path,
        log_level,
        high_match_threshold,
    })
}

/// Resolve the scoring policy for a run.
///
/// An explicit `path` wins over `config.policy_path`; with neither, the
/// built-in default policy is used.
///
/// # Errors
///
/// Returns `ConfigError` if the selected policy file cannot be loaded or is invalid.
pub fn resolve_policy(
    config: &AppConfig,
    path: Option<&std::path::Path>,
) -> Result<ScoringPolicy, ConfigError> {
    match path.or(config.policy_path.as_deref()) {
        Some(p) => load_policy(p),
        None => Ok(ScoringPolicy::default()),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
