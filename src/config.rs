use std::path::PathBuf;
use std::time::Duration;

use crate::models::{Currency, MarginType};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Environment variable overriding the remote API base URL.
pub const API_URL_ENV: &str = "KPURE_API_URL";
/// Environment variable overriding the settings database path.
pub const STORE_PATH_ENV: &str = "KPURE_PRICING_DB";

pub const SETTINGS_PATH: &str = "/pricing-settings";
pub const CALCULATE_PATH: &str = "/pricing-settings/calculate";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Seed values for a fresh store, matching the admin form's initial state.
pub const DEFAULT_EXCHANGE_RATE: f64 = 655.0;
pub const DEFAULT_MARGIN_TYPE: MarginType = MarginType::Percentage;
pub const DEFAULT_MARGIN_PERCENTAGE: f64 = 20.0;
pub const DEFAULT_FIXED_MARGIN: f64 = 0.0;
pub const DEFAULT_CURRENCY: Currency = Currency::Usd;

/// Minor units of the local currency (XOF has none).
pub const LOCAL_CURRENCY_DECIMALS: u32 = 0;
pub const LOCAL_CURRENCY_CODE: &str = "XOF";
/// Largest rounding precision accepted by the calculator.
pub const MAX_DECIMALS: u32 = 15;

/// Resolve the API base URL from the environment, falling back to the default.
pub fn api_base_from_env() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

pub fn default_store_path() -> PathBuf {
    if let Ok(path) = std::env::var(STORE_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Some(data) = dirs::data_dir() {
        data.join("kpure-pricing").join("settings.duckdb")
    } else {
        PathBuf::from(".kpure-pricing").join("settings.duckdb")
    }
}
