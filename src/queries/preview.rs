//! Price previews computed against the active settings record.

use crate::calculator;
use crate::error::Result;
use crate::models::{PriceCalculationInput, PriceCalculationResult};
use crate::preview::{PreviewForm, PriceBreakdown};
use crate::queries::settings::SettingsQuery;
use crate::store::SettingsStore;

// ---------------------------------------------------------------------------
// PreviewQuery
// ---------------------------------------------------------------------------

/// Server-side price calculation using the store's active settings.
pub struct PreviewQuery<'a> {
    store: &'a SettingsStore,
}

impl<'a> PreviewQuery<'a> {
    /// Create a new `PreviewQuery` bound to the given store.
    pub fn new(store: &'a SettingsStore) -> Self {
        Self { store }
    }

    /// Calculate the sale price for `input` with the active settings.
    pub fn calculate(&self, input: &PriceCalculationInput) -> Result<PriceCalculationResult> {
        let settings = SettingsQuery::new(self.store).get_active_settings()?;
        calculator::calculate_input(input, &settings)
    }

    /// Full breakdown for `input`, as shown by the preview screen.
    pub fn breakdown(&self, input: &PriceCalculationInput) -> Result<PriceBreakdown> {
        let settings = SettingsQuery::new(self.store).get_active_settings()?;
        PriceBreakdown::new(input, &settings)
    }

    /// Validate the raw preview form, then compute its breakdown.
    pub fn from_form(&self, form: &PreviewForm) -> Result<PriceBreakdown> {
        let input = form.validate()?;
        self.breakdown(&input)
    }
}
