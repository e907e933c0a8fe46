//! Pricing settings operations against the `pricing_settings` table.
//!
//! Every write runs in a transaction that ends by checking that exactly one
//! record is active. A write that would leave zero or several active records
//! is rolled back and the previous state is kept.

use duckdb::params;
use tracing::{debug, info};

use crate::calculator;
use crate::error::{PricingError, Result};
use crate::models::{PricingSettings, SettingsUpdate};
use crate::store::{SettingsStore, SETTINGS_COLUMNS};

// ---------------------------------------------------------------------------
// SettingsQuery
// ---------------------------------------------------------------------------

/// Query interface for the pricing settings records held by a [`SettingsStore`].
pub struct SettingsQuery<'a> {
    store: &'a SettingsStore,
}

impl<'a> SettingsQuery<'a> {
    /// Create a new `SettingsQuery` bound to the given store.
    pub fn new(store: &'a SettingsStore) -> Self {
        Self { store }
    }

    /// Return the active settings record.
    ///
    /// Fails with [`PricingError::NotFound`] when no record is active.
    pub fn get_active_settings(&self) -> Result<PricingSettings> {
        find_active(self.store)?
            .ok_or_else(|| PricingError::NotFound("no active pricing settings".to_string()))
    }

    /// Return the active record, seeding the defaults first if there is none.
    pub fn ensure_active_settings(&self) -> Result<PricingSettings> {
        self.store.in_transaction(|store| match find_active(store)? {
            Some(active) => Ok(active),
            None => {
                info!("no active pricing settings, seeding defaults");
                insert_active(store, &PricingSettings::default())
            }
        })
    }

    /// Merge `update` over the active record and persist the result.
    ///
    /// When no record exists yet, the update is merged over the defaults and
    /// stored as a new active record. The merged record must pass
    /// [`calculator::validate_settings`].
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<PricingSettings> {
        self.store.in_transaction(|store| {
            let Some(current) = find_active(store)? else {
                let merged = update.apply_to(&PricingSettings::default());
                calculator::validate_settings(&merged)?;
                return insert_active(store, &merged);
            };

            let merged = update.apply_to(&current);
            calculator::validate_settings(&merged)?;

            store.execute_write(
                "UPDATE pricing_settings SET \
                    exchange_rate = ?, \
                    margin_type = ?, \
                    margin_percentage = ?, \
                    fixed_margin = ?, \
                    currency = ?, \
                    is_active = ?, \
                    updated_at = CAST(now() AS VARCHAR) \
                 WHERE id = ?",
                params![
                    merged.exchange_rate,
                    merged.margin_type.as_str(),
                    merged.margin_percentage,
                    merged.fixed_margin,
                    merged.currency.as_str(),
                    merged.is_active,
                    current.id.as_str(),
                ],
            )?;
            if merged.is_active {
                deactivate_others(store, &current.id)?;
            }
            check_single_active(store)?;

            debug!(id = %current.id, "updated pricing settings");
            find_by_id(store, &current.id)
        })
    }

    /// Store `settings` as a new record and make it the only active one.
    pub fn create_settings(&self, settings: &PricingSettings) -> Result<PricingSettings> {
        calculator::validate_settings(settings)?;
        self.store
            .in_transaction(|store| insert_active(store, settings))
    }

    /// Every stored record, newest first.
    pub fn history(&self) -> Result<Vec<PricingSettings>> {
        let sql = format!(
            "SELECT {} FROM pricing_settings ORDER BY seq DESC",
            SETTINGS_COLUMNS
        );
        self.store.execute_into(&sql, params![])
    }

    /// Number of records currently flagged active.
    pub fn active_count(&self) -> Result<i64> {
        count_active(self.store)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn find_active(store: &SettingsStore) -> Result<Option<PricingSettings>> {
    let sql = format!(
        "SELECT {} FROM pricing_settings WHERE is_active ORDER BY seq DESC LIMIT 1",
        SETTINGS_COLUMNS
    );
    Ok(store.execute_into(&sql, params![])?.into_iter().next())
}

fn find_by_id(store: &SettingsStore, id: &str) -> Result<PricingSettings> {
    let sql = format!(
        "SELECT {} FROM pricing_settings WHERE id = ?",
        SETTINGS_COLUMNS
    );
    store
        .execute_into(&sql, params![id])?
        .into_iter()
        .next()
        .ok_or_else(|| PricingError::NotFound(format!("pricing settings '{}'", id)))
}

fn count_active(store: &SettingsStore) -> Result<i64> {
    let count = store
        .execute_scalar(
            "SELECT COUNT(*) FROM pricing_settings WHERE is_active",
            params![],
        )?
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    Ok(count)
}

fn check_single_active(store: &SettingsStore) -> Result<()> {
    match count_active(store)? {
        1 => Ok(()),
        n => Err(PricingError::InvalidSettings(format!(
            "exactly one active pricing settings record is required, found {}",
            n
        ))),
    }
}

fn deactivate_others(store: &SettingsStore, keep_id: &str) -> Result<()> {
    store.execute_write(
        "UPDATE pricing_settings SET is_active = false, updated_at = CAST(now() AS VARCHAR) \
         WHERE is_active AND id <> ?",
        params![keep_id],
    )?;
    Ok(())
}

/// Insert `settings` as the newest record, active, and deactivate the rest.
fn insert_active(store: &SettingsStore, settings: &PricingSettings) -> Result<PricingSettings> {
    let id = store
        .execute_scalar("SELECT CAST(uuid() AS VARCHAR)", params![])?
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| PricingError::Internal("uuid() returned no value".to_string()))?;
    let seq = store
        .execute_scalar(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM pricing_settings",
            params![],
        )?
        .and_then(|v| v.as_i64())
        .unwrap_or(1);

    store.execute_write(
        "INSERT INTO pricing_settings \
            (id, seq, exchange_rate, margin_type, margin_percentage, fixed_margin, \
             currency, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, true, CAST(now() AS VARCHAR), CAST(now() AS VARCHAR))",
        params![
            id.as_str(),
            seq,
            settings.exchange_rate,
            settings.margin_type.as_str(),
            settings.margin_percentage,
            settings.fixed_margin,
            settings.currency.as_str(),
        ],
    )?;

    deactivate_others(store, &id)?;
    check_single_active(store)?;

    info!(id = %id, "created active pricing settings");
    find_by_id(store, &id)
}
