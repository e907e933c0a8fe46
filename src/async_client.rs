//! Async wrapper around [`PricingSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use kpure_pricing::{AsyncPricingSdk, PriceCalculationInput};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncPricingSdk::builder().in_memory().build().await.unwrap();
//!
//!     let result = sdk
//!         .calculate(PriceCalculationInput::new(29.99))
//!         .await
//!         .unwrap();
//!
//!     // Any sync SDK method via closure
//!     let history = sdk.run(|s| s.settings().history()).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{PricingError, Result};
use crate::models::{PriceCalculationInput, PriceCalculationResult, PricingSettings, SettingsUpdate};
use crate::PricingSdk;

// ---------------------------------------------------------------------------
// AsyncPricingSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncPricingSdk`] instance.
pub struct AsyncPricingSdkBuilder {
    store_path: Option<PathBuf>,
    in_memory: bool,
    seed_defaults: bool,
}

impl Default for AsyncPricingSdkBuilder {
    fn default() -> Self {
        Self {
            store_path: None,
            in_memory: false,
            seed_defaults: true,
        }
    }
}

impl AsyncPricingSdkBuilder {
    /// Set the DuckDB file holding the settings.
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
    pub fn seed_defaults(mut self, seed: bool) -> Self {
        self.seed_defaults = seed;
        self
    }

    /// Build the async SDK on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncPricingSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = PricingSdk::builder().seed_defaults(self.seed_defaults);
            if self.in_memory {
                builder = builder.in_memory();
            } else if let Some(path) = self.store_path {
                builder = builder.store_path(path);
            }
            let sdk = builder.build()?;
            Ok(AsyncPricingSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| PricingError::Internal(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncPricingSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`PricingSdk`].
///
/// The underlying SDK is guarded by a [`Mutex`], so store operations are
/// serialized; concurrent updates resolve as last write wins.
#[derive(Clone)]
pub struct AsyncPricingSdk {
    inner: Arc<Mutex<PricingSdk>>,
}

impl AsyncPricingSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncPricingSdkBuilder {
        AsyncPricingSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PricingSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| PricingError::Internal("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| PricingError::Internal(format!("Task join error: {e}")))?
    }

    /// The active settings record.
    pub async fn active_settings(&self) -> Result<PricingSettings> {
        self.run(|s| s.settings().get_active_settings()).await
    }

    /// Merge `update` over the active record.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<PricingSettings> {
        self.run(move |s| s.settings().update_settings(&update)).await
    }

    /// Price `input` with the active settings.
    pub async fn calculate(&self, input: PriceCalculationInput) -> Result<PriceCalculationResult> {
        self.run(move |s| s.preview().calculate(&input)).await
    }
}
