//! Form handling and breakdown rendering for the pricing settings screen.
//!
//! Raw text inputs are parsed into typed forms. Each form has a validation
//! step that yields either a typed value ready for the store/gateway or a
//! [`FieldErrors`] map keyed by the wire field name, so every message can be
//! shown inline next to its input.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::calculator;
use crate::config;
use crate::error::{PricingError, Result};
use crate::models::{
    Currency, MarginType, PriceCalculationInput, PriceCalculationResult, PricingSettings,
    SettingsUpdate,
};

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Validation messages keyed by field name (`exchangeRate`, `scrapedPrice`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise a [`PricingError::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PricingError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

// ---------------------------------------------------------------------------
// SettingsForm
// ---------------------------------------------------------------------------

/// The settings form as typed by the administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub exchange_rate: String,
    pub margin_type: String,
    pub margin_percentage: String,
    pub fixed_margin: String,
    pub currency: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_settings(&PricingSettings::default())
    }
}

impl SettingsForm {
    /// Pre-fill the form from the stored record.
    pub fn from_settings(settings: &PricingSettings) -> Self {
        Self {
            exchange_rate: settings.exchange_rate.to_string(),
            margin_type: settings.margin_type.as_str().to_string(),
            margin_percentage: settings.margin_percentage.to_string(),
            fixed_margin: settings.fixed_margin_or_zero().to_string(),
            currency: settings.currency.as_str().to_string(),
        }
    }

    /// Validate every field and build the update to submit.
    ///
    /// Only the margin field matching the selected margin type is required;
    /// the other one is forwarded when it holds a usable number.
    pub fn validate(&self) -> Result<SettingsUpdate> {
        let mut errors = FieldErrors::new();

        let currency = match self.currency.parse::<Currency>() {
            Ok(c) => Some(c),
            Err(_) => {
                errors.insert("currency", "Choose USD or EUR");
                None
            }
        };

        let exchange_rate = match parse_number(&self.exchange_rate) {
            Some(rate) if rate > 0.0 => Some(rate),
            Some(_) => {
                errors.insert("exchangeRate", "Exchange rate must be greater than 0");
                None
            }
            None => {
                errors.insert("exchangeRate", "Exchange rate is required");
                None
            }
        };

        let margin_type = match self.margin_type.parse::<MarginType>() {
            Ok(m) => Some(m),
            Err(_) => {
                errors.insert("marginType", "Choose percentage or fixed");
                None
            }
        };

        let margin_percentage =
            parse_number(&self.margin_percentage).filter(|p| (0.0..=100.0).contains(p));
        let fixed_margin = parse_number(&self.fixed_margin).filter(|m| *m >= 0.0);

        match margin_type {
            Some(MarginType::Percentage) => match parse_number(&self.margin_percentage) {
                None => errors.insert("marginPercentage", "Margin percentage is required"),
                Some(p) if !(0.0..=100.0).contains(&p) => {
                    errors.insert("marginPercentage", "Margin must be between 0 and 100")
                }
                Some(_) => {}
            },
            Some(MarginType::Fixed) => match parse_number(&self.fixed_margin) {
                None => errors.insert("fixedMargin", "Fixed margin is required"),
                Some(m) if m < 0.0 => {
                    errors.insert("fixedMargin", "Fixed margin must not be negative")
                }
                Some(_) => {}
            },
            None => {}
        }

        errors.into_result()?;

        Ok(SettingsUpdate {
            exchange_rate,
            margin_type,
            margin_percentage,
            fixed_margin,
            currency,
            is_active: None,
        })
    }
}

// ---------------------------------------------------------------------------
// PreviewForm
// ---------------------------------------------------------------------------

/// Scraped prices typed into the preview calculator.
///
/// A blank compare price means "no compare price", never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewForm {
    pub scraped_price: String,
    pub scraped_compare_price: String,
}

impl PreviewForm {
    pub fn new(scraped_price: impl Into<String>, scraped_compare_price: impl Into<String>) -> Self {
        Self {
            scraped_price: scraped_price.into(),
            scraped_compare_price: scraped_compare_price.into(),
        }
    }

    /// The calculate button is disabled until a scraped price is entered.
    pub fn can_submit(&self) -> bool {
        !self.scraped_price.trim().is_empty()
    }

    pub fn validate(&self) -> Result<PriceCalculationInput> {
        let mut errors = FieldErrors::new();

        let scraped_price = match parse_number(&self.scraped_price) {
            Some(p) if p > 0.0 => Some(p),
            Some(_) => {
                errors.insert("scrapedPrice", "Scraped price must be greater than 0");
                None
            }
            None => {
                errors.insert("scrapedPrice", "Scraped price is required");
                None
            }
        };

        let scraped_compare_price = if self.scraped_compare_price.trim().is_empty() {
            None
        } else {
            match parse_number(&self.scraped_compare_price) {
                Some(p) if p > 0.0 => Some(p),
                _ => {
                    errors.insert(
                        "scrapedComparePrice",
                        "Compare price must be a number greater than 0",
                    );
                    None
                }
            }
        };

        errors.into_result()?;

        Ok(PriceCalculationInput {
            scraped_price: scraped_price.unwrap_or_default(),
            scraped_compare_price,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceBreakdown
// ---------------------------------------------------------------------------

/// Step-by-step view of a calculation, as displayed under the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub scraped_price: f64,
    pub currency: Currency,
    pub exchange_rate: f64,
    /// Converted price before margin, rounded for display.
    pub local_price: f64,
    pub margin_type: MarginType,
    /// Percentage points or local currency amount, depending on `margin_type`.
    pub margin_value: f64,
    pub result: PriceCalculationResult,
}

impl PriceBreakdown {
    pub fn new(input: &PriceCalculationInput, settings: &PricingSettings) -> Result<Self> {
        let result = calculator::calculate_input(input, settings)?;
        let local_price = calculator::round_to(
            calculator::convert(input.scraped_price, settings),
            config::LOCAL_CURRENCY_DECIMALS,
        );
        let margin_value = match settings.margin_type {
            MarginType::Percentage => settings.margin_percentage,
            MarginType::Fixed => settings.fixed_margin_or_zero(),
        };
        Ok(Self {
            scraped_price: input.scraped_price,
            currency: settings.currency,
            exchange_rate: settings.exchange_rate,
            local_price,
            margin_type: settings.margin_type,
            margin_value,
            result,
        })
    }

    pub fn margin_label(&self) -> String {
        match self.margin_type {
            MarginType::Percentage => format!("+{}%", self.margin_value),
            MarginType::Fixed => format!("+{} {}", self.margin_value, config::LOCAL_CURRENCY_CODE),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let local = config::LOCAL_CURRENCY_CODE;
        let mut lines = vec![
            format!("Prix source: {} {}", self.scraped_price, self.currency),
            format!(
                "Taux de change: 1 {} = {} {}",
                self.currency, self.exchange_rate, local
            ),
            format!("Prix en {}: {} {}", local, self.local_price, local),
            format!("Marge: {}", self.margin_label()),
            format!("Prix final: {} {}", format_grouped(self.result.price), local),
        ];
        if let Some(compare) = self.result.compare_at_price {
            lines.push(format!(
                "Prix comparé final: {} {}",
                format_grouped(compare),
                local
            ));
        }
        lines
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// The formula line shown under the settings form.
pub fn formula(settings: &PricingSettings) -> String {
    match settings.margin_type {
        MarginType::Percentage => format!(
            "Prix final = (Prix scrapé × {}) × (1 + {}%)",
            settings.exchange_rate, settings.margin_percentage
        ),
        MarginType::Fixed => format!(
            "Prix final = (Prix scrapé × {}) + {} {}",
            settings.exchange_rate,
            settings.fixed_margin_or_zero(),
            config::LOCAL_CURRENCY_CODE
        ),
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

const NARROW_NBSP: char = '\u{202F}';
const NBSP: char = '\u{00A0}';

/// Whole amount with French digit grouping, e.g. `23 572`.
pub fn format_grouped(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NARROW_NBSP);
        }
        out.push(ch);
    }
    out
}

/// Amount formatted as West African CFA francs, e.g. `23 572 F CFA`.
pub fn format_xof(amount: f64) -> String {
    format!("{}{}F{}CFA", format_grouped(amount), NBSP, NBSP)
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
