//! Sale price calculation from scraped source-currency prices.
//!
//! The conversion is linear: the scraped price is multiplied by the exchange
//! rate, then the margin is applied either as a percentage multiplier or as a
//! fixed amount in local currency. The compare-at price, when present, goes
//! through the same two steps independently.
//!
//! Both the SDK's preview queries and the remote gateway's callers rely on
//! these functions, so a preview always matches the price used at import.

use crate::config;
use crate::error::{PricingError, Result};
use crate::models::{MarginType, PriceCalculationInput, PriceCalculationResult, PricingSettings};

/// Check that `settings` can be used for a calculation.
///
/// The exchange rate must be strictly positive. A percentage margin must lie
/// in `[0, 100]`; a fixed margin must not be negative.
pub fn validate_settings(settings: &PricingSettings) -> Result<()> {
    if !is_positive(settings.exchange_rate) {
        return Err(PricingError::InvalidSettings(format!(
            "exchange rate must be greater than 0, got {}",
            settings.exchange_rate
        )));
    }
    match settings.margin_type {
        MarginType::Percentage => {
            let pct = settings.margin_percentage;
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(PricingError::InvalidSettings(format!(
                    "margin percentage must be between 0 and 100, got {}",
                    pct
                )));
            }
        }
        MarginType::Fixed => {
            let fixed = settings.fixed_margin_or_zero();
            if !fixed.is_finite() || fixed < 0.0 {
                return Err(PricingError::InvalidSettings(format!(
                    "fixed margin must not be negative, got {}",
                    fixed
                )));
            }
        }
    }
    Ok(())
}

/// Convert a source-currency amount into local currency, without rounding.
pub fn convert(amount: f64, settings: &PricingSettings) -> f64 {
    amount * settings.exchange_rate
}

/// Apply the configured margin to a local-currency amount, without rounding.
pub fn apply_margin(local_price: f64, settings: &PricingSettings) -> f64 {
    match settings.margin_type {
        MarginType::Percentage => local_price * (1.0 + settings.margin_percentage / 100.0),
        MarginType::Fixed => local_price + settings.fixed_margin_or_zero(),
    }
}

/// Round to `decimals` places, halves away from zero.
///
/// `decimals` is capped at [`config::MAX_DECIMALS`]; an `f64` holds no more
/// significant digits than that.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let factor = 10f64.powi(decimals.min(config::MAX_DECIMALS) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to carry a fractional part.
        return value;
    }
    scaled.round() / factor
}

/// Calculate the sale price (and compare-at price) in local currency.
///
/// Results are rounded to the local currency's minor units, which for XOF
/// means whole numbers.
///
/// # Errors
///
/// [`PricingError::InvalidInput`] when a price is not strictly positive or
/// the computed price is too large to represent,
/// [`PricingError::InvalidSettings`] when `settings` fail
/// [`validate_settings`].
pub fn calculate(
    scraped_price: f64,
    scraped_compare_price: Option<f64>,
    settings: &PricingSettings,
) -> Result<PriceCalculationResult> {
    calculate_with_precision(
        scraped_price,
        scraped_compare_price,
        settings,
        config::LOCAL_CURRENCY_DECIMALS,
    )
}

/// Same as [`calculate`] with an explicit number of decimal places.
///
/// More than [`config::MAX_DECIMALS`] places is [`PricingError::InvalidInput`].
pub fn calculate_with_precision(
    scraped_price: f64,
    scraped_compare_price: Option<f64>,
    settings: &PricingSettings,
    decimals: u32,
) -> Result<PriceCalculationResult> {
    if decimals > config::MAX_DECIMALS {
        return Err(PricingError::InvalidInput(format!(
            "at most {} decimal places are supported, got {}",
            config::MAX_DECIMALS,
            decimals
        )));
    }
    if !is_positive(scraped_price) {
        return Err(PricingError::InvalidInput(format!(
            "scraped price must be greater than 0, got {}",
            scraped_price
        )));
    }
    if let Some(compare) = scraped_compare_price {
        if !is_positive(compare) {
            return Err(PricingError::InvalidInput(format!(
                "scraped compare price must be greater than 0, got {}",
                compare
            )));
        }
    }
    validate_settings(settings)?;

    let price = priced(scraped_price, settings, decimals)?;
    let compare_at_price = scraped_compare_price
        .map(|compare| priced(compare, settings, decimals))
        .transpose()?;

    Ok(PriceCalculationResult {
        price,
        compare_at_price,
    })
}

/// Calculate from a request body.
pub fn calculate_input(
    input: &PriceCalculationInput,
    settings: &PricingSettings,
) -> Result<PriceCalculationResult> {
    calculate(input.scraped_price, input.scraped_compare_price, settings)
}

/// Convert, apply the margin and round; the result must still be a finite number.
fn priced(amount: f64, settings: &PricingSettings, decimals: u32) -> Result<f64> {
    let price = round_to(apply_margin(convert(amount, settings), settings), decimals);
    if !price.is_finite() {
        return Err(PricingError::InvalidInput(format!(
            "price for {} is out of range with exchange rate {}",
            amount, settings.exchange_rate
        )));
    }
    Ok(price)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
