//! K-Pure pricing SDK for Rust.
//!
//! Converts scraped source-currency prices into local sale prices using the
//! active pricing settings (exchange rate plus a percentage or fixed margin).
//! Settings are kept in a DuckDB store that guarantees a single active record,
//! or fetched from the remote admin API through [`ApiClient`].
//!
//! # Quick start
//!
//! ```no_run
//! use kpure_pricing::{PricingSdk, PriceCalculationInput};
//!
//! let sdk = PricingSdk::builder().in_memory().build().unwrap();
//!
//! // Defaults are seeded: 655 per USD, 20% margin.
//! let input = PriceCalculationInput::new(29.99).with_compare_price(39.99);
//! let result = sdk.preview().calculate(&input).unwrap();
//! assert_eq!(result.price, 23572.0);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod calculator;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod preview;
pub mod queries;
pub mod session;
pub mod source;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncPricingSdk;
pub use calculator::{calculate, calculate_with_precision};
pub use client::ApiClient;
pub use error::{PricingError, Result};
pub use models::{
    Currency, MarginType, PriceCalculationInput, PriceCalculationResult, PricingSettings,
    SettingsUpdate,
};
pub use preview::{FieldErrors, PreviewForm, PriceBreakdown, SettingsForm};
pub use session::{AdminUser, Role, Session};
pub use source::SettingsSource;
pub use store::SettingsStore;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

// ---------------------------------------------------------------------------
// PricingSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PricingSdk`] instance.
///
/// Use [`PricingSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PricingSdkBuilder::build) to create the SDK.
pub struct PricingSdkBuilder {
    store_path: Option<PathBuf>,
    in_memory: bool,
    seed_defaults: bool,
}

impl Default for PricingSdkBuilder {
    fn default() -> Self {
        Self {
            store_path: None,
            in_memory: false,
            seed_defaults: true,
        }
    }
}

impl PricingSdkBuilder {
    /// Set the DuckDB file holding the settings.
    ///
    /// If not set, `KPURE_PRICING_DB` is consulted, then the platform data
    /// directory (e.g. `~/.local/share/kpure-pricing/settings.duckdb`).
    pub fn store_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Keep settings in memory only.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self.store_path = None;
        self
    }

    /// Whether to create the default settings record when none is active.
    ///
    /// Defaults to `true`.
    pub fn seed_defaults(mut self, seed: bool) -> Self {
        self.seed_defaults = seed;
        self
    }

    /// Build the SDK, opening the store and seeding defaults if requested.
    pub fn build(self) -> Result<PricingSdk> {
        let store = if self.in_memory {
            SettingsStore::open_in_memory()?
        } else {
            let path = self.store_path.unwrap_or_else(config::default_store_path);
            SettingsStore::open(path)?
        };
        let sdk = PricingSdk { store };
        if self.seed_defaults {
            let active = sdk.settings().ensure_active_settings()?;
            info!(id = %active.id, "pricing settings ready");
        }
        Ok(sdk)
    }
}

// ---------------------------------------------------------------------------
// PricingSdk
// ---------------------------------------------------------------------------

/// The main entry point for the pricing SDK.
///
/// Owns a [`SettingsStore`] and exposes query interfaces as lightweight
/// borrowing wrappers.
pub struct PricingSdk {
    store: SettingsStore,
}

impl PricingSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> PricingSdkBuilder {
        PricingSdkBuilder::default()
    }

    /// Access the settings query interface.
    pub fn settings(&self) -> queries::SettingsQuery<'_> {
        queries::SettingsQuery::new(&self.store)
    }

    /// Access the price preview interface.
    ///
    /// Calculations use the active settings at call time.
    pub fn preview(&self) -> queries::PreviewQuery<'_> {
        queries::PreviewQuery::new(&self.store)
    }

    /// Return a reference to the underlying [`SettingsStore`].
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Consume the SDK and close the store.
    pub fn close(self) {
        drop(self);
    }
}

impl fmt::Display for PricingSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PricingSdk(store={})", self.store.describe_location())
    }
}
