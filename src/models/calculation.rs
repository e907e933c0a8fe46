use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceCalculationInput: Body of POST /pricing-settings/calculate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationInput {
    pub scraped_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_compare_price: Option<f64>,
}

impl PriceCalculationInput {
    pub fn new(scraped_price: f64) -> Self {
        Self {
            scraped_price,
            scraped_compare_price: None,
        }
    }

    pub fn with_compare_price(mut self, scraped_compare_price: f64) -> Self {
        self.scraped_compare_price = Some(scraped_compare_price);
        self
    }
}

// ---------------------------------------------------------------------------
// PriceCalculationResult: Computed sale prices in local currency
// ---------------------------------------------------------------------------

/// `compare_at_price` is omitted from the JSON when no compare price was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationResult {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
}
