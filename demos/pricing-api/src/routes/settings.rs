use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use kpure_pricing::{PriceCalculationInput, SettingsUpdate};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/pricing-settings
///
/// Return the active pricing settings record.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let settings = state.sdk.active_settings().await?;
    Ok(Json(json!({ "data": settings })))
}

/// PUT /api/pricing-settings
///
/// Merge a partial record over the active one. The merged record is
/// revalidated and must leave exactly one active record.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Value>, AppError> {
    if update.is_empty() {
        return Err(AppError::bad_request("Request body has no settings fields"));
    }
    let settings = state.sdk.update_settings(update).await?;
    tracing::info!(id = %settings.id, "pricing settings updated");
    Ok(Json(json!({ "data": settings })))
}

/// POST /api/pricing-settings/calculate
///
/// Price `{ scrapedPrice, scrapedComparePrice? }` with the active settings.
/// `compareAtPrice` is omitted from the response when no compare price is sent.
pub async fn calculate_price(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PriceCalculationInput>,
) -> Result<Json<Value>, AppError> {
    let result = state.sdk.calculate(input).await?;
    Ok(Json(json!({ "data": result })))
}
