//! Where the settings screen reads and writes its record.
//!
//! The screen logic works the same whether settings come from a local
//! [`SettingsStore`](crate::store::SettingsStore) or from the remote API, so
//! both sit behind [`SettingsSource`].

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{PricingSettings, SettingsUpdate};
use crate::preview::{PreviewForm, PriceBreakdown, SettingsForm};
use crate::queries::SettingsQuery;

pub trait SettingsSource {
    /// The active settings record.
    fn get_active_settings(&self) -> Result<PricingSettings>;

    /// Merge a partial record over the active one and return the result.
    fn update_settings(&self, update: &SettingsUpdate) -> Result<PricingSettings>;
}

impl SettingsSource for SettingsQuery<'_> {
    fn get_active_settings(&self) -> Result<PricingSettings> {
        SettingsQuery::get_active_settings(self)
    }

    fn update_settings(&self, update: &SettingsUpdate) -> Result<PricingSettings> {
        SettingsQuery::update_settings(self, update)
    }
}

impl SettingsSource for ApiClient {
    fn get_active_settings(&self) -> Result<PricingSettings> {
        self.get_settings()
    }

    fn update_settings(&self, update: &SettingsUpdate) -> Result<PricingSettings> {
        ApiClient::update_settings(self, update)
    }
}

/// Validate the settings form and submit it.
pub fn save_settings<S: SettingsSource + ?Sized>(
    source: &S,
    form: &SettingsForm,
) -> Result<PricingSettings> {
    let update = form.validate()?;
    source.update_settings(&update)
}

/// Validate the preview form and price it locally with the source's settings.
pub fn preview<S: SettingsSource + ?Sized>(
    source: &S,
    form: &PreviewForm,
) -> Result<PriceBreakdown> {
    let input = form.validate()?;
    let settings = source.get_active_settings()?;
    PriceBreakdown::new(&input, &settings)
}
