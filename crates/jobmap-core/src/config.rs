use crate::app_config::{AppConfig, ClusterSettings, Environment};
use crate::ConfigError;

/// Deepest zoom any map provider serves tiles for.
const ZOOM_CEILING: u8 = 24;

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

/// Build application configuration using the provided env-var lookup function,
/// so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u8>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("JOBMAP_ENV", "development"));
    let log_level = or_default("JOBMAP_LOG_LEVEL", "info");
    let data_source = or_default("JOBMAP_DATA_SOURCE", "./data/jobs.csv");
    let user_agent = or_default("JOBMAP_USER_AGENT", "jobmap/0.1 (job-search)");

    let radius_px = parse_f64("JOBMAP_CLUSTER_RADIUS_PX", "40")?;
    if !(radius_px.is_finite() && radius_px > 0.0) {
        return Err(invalid(
            "JOBMAP_CLUSTER_RADIUS_PX",
            "must be a positive number of pixels".to_string(),
        ));
    }
    let max_zoom = parse_u8("JOBMAP_CLUSTER_MAX_ZOOM", "16")?;
    if max_zoom > ZOOM_CEILING {
        return Err(invalid(
            "JOBMAP_CLUSTER_MAX_ZOOM",
            format!("must be at most {ZOOM_CEILING}"),
        ));
    }
    let min_points = parse_usize("JOBMAP_CLUSTER_MIN_POINTS", "2")?;
    if min_points < 2 {
        return Err(invalid(
            "JOBMAP_CLUSTER_MIN_POINTS",
            "a cluster needs at least 2 points".to_string(),
        ));
    }

    let viewport_width_px = parse_u32("JOBMAP_VIEWPORT_WIDTH_PX", "1280")?;
    let viewport_height_px = parse_u32("JOBMAP_VIEWPORT_HEIGHT_PX", "800")?;
    let cities_path = lookup("JOBMAP_CITIES_PATH").ok().map(PathBuf::from);
    let map_api_key = lookup("JOBMAP_MAP_API_KEY").ok();

    Ok(AppConfig {
        env,
        log_level,
        data_source,
        user_agent,
        cluster: ClusterSettings {
            radius_px,
            max_zoom,
            min_points,
            ..ClusterSettings::default()
        },
        viewport_width_px,
        viewport_height_px,
        cities_path,
        map_api_key,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
