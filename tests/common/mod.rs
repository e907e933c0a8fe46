//! Shared test fixtures for the pricing SDK integration tests.
//!
//! Provides in-memory and file-backed stores plus the two reference settings
//! records used across the suites (655 per USD with a 20% margin, and 655 per
//! USD with a fixed 10 000 XOF margin).

#![allow(dead_code)]

use kpure_pricing::{Currency, PricingSdk, PricingSettings, SettingsStore};

/// 655 XOF per USD, 20% margin.
pub fn percentage_settings() -> PricingSettings {
    PricingSettings::percentage(655.0, 20.0, Currency::Usd)
}

/// 655 XOF per USD, fixed 10 000 XOF margin.
pub fn fixed_settings() -> PricingSettings {
    PricingSettings::fixed(655.0, 10_000.0, Currency::Usd)
}

/// An in-memory store with no records.
pub fn empty_store() -> SettingsStore {
    SettingsStore::open_in_memory().unwrap()
}

/// An in-memory SDK seeded with the default settings.
pub fn seeded_sdk() -> PricingSdk {
    PricingSdk::builder().in_memory().build().unwrap()
}

/// A file-backed SDK in a temporary directory.
///
/// Returns `(PricingSdk, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn file_sdk() -> (PricingSdk, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = PricingSdk::builder()
        .store_path(tmp_dir.path().join("settings.duckdb"))
        .build()
        .unwrap();
    (sdk, tmp_dir)
}

/// JSON record as the remote API returns it.
pub fn settings_json() -> serde_json::Value {
    serde_json::json!({
        "_id": "665f1c2e9b1d8a0012345678",
        "exchangeRate": 655,
        "marginPercentage": 20,
        "marginType": "percentage",
        "fixedMargin": 0,
        "currency": "USD",
        "isActive": true,
        "createdAt": "2026-01-05T10:00:00.000Z",
        "updatedAt": "2026-01-05T10:00:00.000Z"
    })
}
