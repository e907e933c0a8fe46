//! Price calculator tests: formulas, rounding, validation, reference scenarios.

mod common;

use kpure_pricing::calculator::{self, calculate, calculate_with_precision, round_to};
use kpure_pricing::{Currency, MarginType, PriceCalculationInput, PricingError, PricingSettings};

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn percentage_margin_scenario() {
    let settings = common::percentage_settings();
    let result = calculate(29.99, None, &settings).unwrap();
    // 29.99 * 655 = 19643.45, * 1.2 = 23572.14
    assert_eq!(result.price, 23572.0);
    assert_eq!(result.price, (29.99_f64 * 655.0 * (1.0 + 20.0 / 100.0)).round());
    assert!(result.compare_at_price.is_none());
}

#[test]
fn fixed_margin_scenario() {
    let settings = common::fixed_settings();
    let result = calculate(29.99, None, &settings).unwrap();
    // 19643.45 + 10000 = 29643.45
    assert_eq!(result.price, 29643.0);
    assert_eq!(result.price, (29.99_f64 * 655.0 + 10_000.0).round());
}

#[test]
fn zero_price_is_invalid_input() {
    let settings = common::percentage_settings();
    let err = calculate(0.0, None, &settings).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

#[test]
fn percentage_above_hundred_is_invalid_settings() {
    let settings = PricingSettings::percentage(655.0, 150.0, Currency::Usd);
    let err = calculate(29.99, None, &settings).unwrap_err();
    assert!(matches!(err, PricingError::InvalidSettings(_)));
}

#[test]
fn compare_price_goes_through_same_steps() {
    let settings = common::percentage_settings();
    let result = calculate(29.99, Some(39.99), &settings).unwrap();
    assert_eq!(result.price, 23572.0);
    assert_eq!(
        result.compare_at_price,
        Some((39.99_f64 * 655.0 * 1.2).round())
    );
    assert_eq!(result.compare_at_price, Some(31432.0));
}

// ---------------------------------------------------------------------------
// Formula properties
// ---------------------------------------------------------------------------

#[test]
fn percentage_formula_holds_across_inputs() {
    for &price in &[0.01, 1.0, 4.5, 12.99, 99.95, 250.0, 1234.56] {
        for &rate in &[1.0, 655.0, 655.957, 1000.0] {
            for &pct in &[0.0, 5.0, 20.0, 33.3, 100.0] {
                let settings = PricingSettings::percentage(rate, pct, Currency::Eur);
                let result = calculate(price, None, &settings).unwrap();
                assert_eq!(result.price, (price * rate * (1.0 + pct / 100.0)).round());
            }
        }
    }
}

#[test]
fn fixed_formula_holds_across_inputs() {
    for &price in &[0.01, 1.0, 12.99, 99.95, 1234.56] {
        for &margin in &[0.0, 500.0, 10_000.0, 12_345.5] {
            let settings = PricingSettings::fixed(655.0, margin, Currency::Usd);
            let result = calculate(price, None, &settings).unwrap();
            assert_eq!(result.price, (price * 655.0 + margin).round());
        }
    }
}

#[test]
fn higher_exchange_rate_gives_higher_price() {
    let mut previous = 0.0;
    for rate in [500.0, 600.0, 655.0, 700.0, 800.0] {
        let settings = PricingSettings::percentage(rate, 20.0, Currency::Usd);
        let price = calculate(29.99, None, &settings).unwrap().price;
        assert!(price > previous, "rate {} gave {} <= {}", rate, price, previous);
        previous = price;
    }
}

#[test]
fn calculation_is_repeatable() {
    let settings = common::percentage_settings();
    let first = calculate(17.49, Some(24.99), &settings).unwrap();
    let second = calculate(17.49, Some(24.99), &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fixed_margin_absent_counts_as_zero() {
    let mut settings = common::fixed_settings();
    settings.fixed_margin = None;
    let result = calculate(10.0, None, &settings).unwrap();
    assert_eq!(result.price, 6550.0);
}

#[test]
fn percentage_mode_ignores_fixed_margin() {
    let mut settings = common::percentage_settings();
    settings.fixed_margin = Some(99_999.0);
    let result = calculate(10.0, None, &settings).unwrap();
    assert_eq!(result.price, 7860.0);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn negative_and_non_finite_prices_are_rejected() {
    let settings = common::percentage_settings();
    for price in [-1.0, f64::NAN, f64::INFINITY] {
        let err = calculate(price, None, &settings).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)), "{}", price);
    }
}

#[test]
fn non_positive_compare_price_is_rejected() {
    let settings = common::percentage_settings();
    let err = calculate(10.0, Some(0.0), &settings).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

#[test]
fn non_positive_exchange_rate_is_rejected() {
    for rate in [0.0, -655.0] {
        let settings = PricingSettings::percentage(rate, 20.0, Currency::Usd);
        let err = calculate(10.0, None, &settings).unwrap_err();
        assert!(matches!(err, PricingError::InvalidSettings(_)));
    }
}

#[test]
fn negative_percentage_is_rejected() {
    let settings = PricingSettings::percentage(655.0, -1.0, Currency::Usd);
    assert!(matches!(
        calculator::validate_settings(&settings),
        Err(PricingError::InvalidSettings(_))
    ));
}

#[test]
fn percentage_bounds_are_inclusive() {
    for pct in [0.0, 100.0] {
        let settings = PricingSettings::percentage(655.0, pct, Currency::Usd);
        assert!(calculator::validate_settings(&settings).is_ok());
    }
}

#[test]
fn out_of_range_percentage_is_ignored_in_fixed_mode() {
    let mut settings = common::fixed_settings();
    settings.margin_percentage = 150.0;
    assert!(calculate(10.0, None, &settings).is_ok());
}

#[test]
fn negative_fixed_margin_is_rejected() {
    let settings = PricingSettings::fixed(655.0, -5.0, Currency::Usd);
    let err = calculate(10.0, None, &settings).unwrap_err();
    assert!(matches!(err, PricingError::InvalidSettings(_)));
}

#[test]
fn invalid_input_is_reported_before_invalid_settings() {
    let settings = PricingSettings::percentage(0.0, 150.0, Currency::Usd);
    let err = calculate(0.0, None, &settings).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

// ---------------------------------------------------------------------------
// Rounding and precision
// ---------------------------------------------------------------------------

#[test]
fn round_to_handles_decimals() {
    assert_eq!(round_to(23572.5, 0), 23573.0);
    assert_eq!(round_to(12.345, 1), 12.3);
    assert_eq!(round_to(19.999, 2), 20.0);
}

#[test]
fn explicit_precision_keeps_cents() {
    let settings = PricingSettings::percentage(1.1, 10.0, Currency::Eur);
    let result = calculate_with_precision(10.0, Some(20.0), &settings, 2).unwrap();
    assert_eq!(result.price, 12.1);
    assert_eq!(result.compare_at_price, Some(24.2));
}

#[test]
fn precision_above_f64_digits_is_rejected() {
    let settings = common::percentage_settings();
    for decimals in [16, 400, u32::MAX] {
        let err = calculate_with_precision(29.99, None, &settings, decimals).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)), "{}", decimals);
    }
    let result = calculate_with_precision(29.99, None, &settings, 15).unwrap();
    assert!((result.price - 23572.14).abs() < 1e-6);
}

#[test]
fn round_to_caps_precision() {
    assert_eq!(round_to(12.5, u32::MAX), 12.5);
    assert_eq!(round_to(12.5, 400), 12.5);
    assert_eq!(round_to(1e300, 15), 1e300);
}

#[test]
fn overflowing_prices_are_invalid_input() {
    let err = calculate(1e306, None, &common::percentage_settings()).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));

    let err = calculate(29.99, Some(1e306), &common::percentage_settings()).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));

    let huge_rate = PricingSettings::percentage(1e308, 20.0, Currency::Usd);
    let err = calculate(29.99, None, &huge_rate).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

#[test]
fn convert_and_apply_margin_are_unrounded() {
    let settings = common::percentage_settings();
    let local = calculator::convert(29.99, &settings);
    assert!((local - 19643.45).abs() < 1e-6);
    let final_price = calculator::apply_margin(local, &settings);
    assert!((final_price - 23572.14).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn result_without_compare_price_omits_the_key() {
    let settings = common::percentage_settings();
    let result = calculate(29.99, None, &settings).unwrap();
    let json = serde_json::to_value(result).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj.contains_key("price"));
    assert!(!obj.contains_key("compareAtPrice"));
}

#[test]
fn result_with_compare_price_uses_camel_case() {
    let settings = common::percentage_settings();
    let result = calculate(29.99, Some(39.99), &settings).unwrap();
    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["compareAtPrice"], 31432.0);
}

#[test]
fn input_deserializes_from_request_body() {
    let input: PriceCalculationInput =
        serde_json::from_str(r#"{"scrapedPrice": 29.99}"#).unwrap();
    assert_eq!(input, PriceCalculationInput::new(29.99));

    let input: PriceCalculationInput =
        serde_json::from_str(r#"{"scrapedPrice": 29.99, "scrapedComparePrice": 39.99}"#).unwrap();
    assert_eq!(input.scraped_compare_price, Some(39.99));

    let result = calculator::calculate_input(&input, &common::percentage_settings()).unwrap();
    assert_eq!(result.compare_at_price, Some(31432.0));
}

#[test]
fn settings_deserialize_from_api_record() {
    let settings: PricingSettings = serde_json::from_value(common::settings_json()).unwrap();
    assert_eq!(settings.id, "665f1c2e9b1d8a0012345678");
    assert_eq!(settings.exchange_rate, 655.0);
    assert_eq!(settings.margin_type, MarginType::Percentage);
    assert_eq!(settings.currency, Currency::Usd);
    assert!(settings.is_active);
}

#[test]
fn settings_tolerate_missing_fixed_margin() {
    let settings: PricingSettings = serde_json::from_value(serde_json::json!({
        "exchangeRate": 656,
        "marginType": "fixed",
        "marginPercentage": 0,
        "currency": "EUR",
        "isActive": true
    }))
    .unwrap();
    assert_eq!(settings.fixed_margin, None);
    assert_eq!(settings.currency, Currency::Eur);
    assert_eq!(calculate(1.0, None, &settings).unwrap().price, 656.0);
}
