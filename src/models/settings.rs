use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::PricingError;

// ---------------------------------------------------------------------------
// MarginType: How the margin is applied on top of the converted price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginType {
    Percentage,
    Fixed,
}

impl MarginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginType::Percentage => "percentage",
            MarginType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarginType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "percentage" => Ok(MarginType::Percentage),
            "fixed" => Ok(MarginType::Fixed),
            other => Err(PricingError::InvalidSettings(format!(
                "unknown margin type '{}'",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Currency: Source currency of scraped prices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            _ => Err(PricingError::InvalidSettings(format!(
                "unsupported currency '{}'",
                s.trim()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// PricingSettings: The pricing configuration record
// ---------------------------------------------------------------------------

/// A pricing configuration record.
///
/// Exactly one record is active at a time. The calculator only ever reads a
/// snapshot of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSettings {
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Local currency units per one unit of the source currency.
    pub exchange_rate: f64,
    pub margin_type: MarginType,
    #[serde(default)]
    pub margin_percentage: f64,
    /// Local currency amount added when `margin_type` is fixed. Absent means 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_margin: Option<f64>,
    pub currency: Currency,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PricingSettings {
    /// Settings with a percentage margin.
    pub fn percentage(exchange_rate: f64, margin_percentage: f64, currency: Currency) -> Self {
        Self {
            exchange_rate,
            margin_type: MarginType::Percentage,
            margin_percentage,
            currency,
            ..Self::default()
        }
    }

    /// Settings with a fixed additive margin in local currency.
    pub fn fixed(exchange_rate: f64, fixed_margin: f64, currency: Currency) -> Self {
        Self {
            exchange_rate,
            margin_type: MarginType::Fixed,
            margin_percentage: 0.0,
            fixed_margin: Some(fixed_margin),
            currency,
            ..Self::default()
        }
    }

    pub fn fixed_margin_or_zero(&self) -> f64 {
        self.fixed_margin.unwrap_or(0.0)
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            id: String::new(),
            exchange_rate: config::DEFAULT_EXCHANGE_RATE,
            margin_type: config::DEFAULT_MARGIN_TYPE,
            margin_percentage: config::DEFAULT_MARGIN_PERCENTAGE,
            fixed_margin: Some(config::DEFAULT_FIXED_MARGIN),
            currency: config::DEFAULT_CURRENCY,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// SettingsUpdate: Partial record sent with PUT /pricing-settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_type: Option<MarginType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == SettingsUpdate::default()
    }

    /// Merge this update over `base`, returning the replacement record.
    ///
    /// Identity and timestamps are carried over from `base`.
    pub fn apply_to(&self, base: &PricingSettings) -> PricingSettings {
        PricingSettings {
            id: base.id.clone(),
            exchange_rate: self.exchange_rate.unwrap_or(base.exchange_rate),
            margin_type: self.margin_type.unwrap_or(base.margin_type),
            margin_percentage: self.margin_percentage.unwrap_or(base.margin_percentage),
            fixed_margin: self.fixed_margin.or(base.fixed_margin),
            currency: self.currency.unwrap_or(base.currency),
            is_active: self.is_active.unwrap_or(base.is_active),
            created_at: base.created_at.clone(),
            updated_at: base.updated_at.clone(),
        }
    }
}

impl From<&PricingSettings> for SettingsUpdate {
    fn from(s: &PricingSettings) -> Self {
        Self {
            exchange_rate: Some(s.exchange_rate),
            margin_type: Some(s.margin_type),
            margin_percentage: Some(s.margin_percentage),
            fixed_margin: s.fixed_margin,
            currency: Some(s.currency),
            is_active: None,
        }
    }
}
