//! DuckDB-backed storage for pricing settings records.
//!
//! Wraps a single DuckDB connection (file-backed or in-memory), creates the
//! `pricing_settings` table on open, and converts result rows into
//! `serde_json::Value` maps so they can be deserialized into model types.
//! Higher-level settings operations live in [`crate::queries::settings`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use duckdb::{types::ValueRef, Connection as DuckDbConnection, ToSql};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pricing_settings (
    id VARCHAR NOT NULL,
    seq BIGINT NOT NULL,
    exchange_rate DOUBLE NOT NULL,
    margin_type VARCHAR NOT NULL,
    margin_percentage DOUBLE NOT NULL DEFAULT 0,
    fixed_margin DOUBLE,
    currency VARCHAR NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT false,
    created_at VARCHAR NOT NULL,
    updated_at VARCHAR NOT NULL
);
"#;

/// Column list mapping table columns onto the camelCase wire names used by
/// [`PricingSettings`](crate::models::PricingSettings).
pub const SETTINGS_COLUMNS: &str = r#"id AS "_id",
    exchange_rate AS "exchangeRate",
    margin_type AS "marginType",
    margin_percentage AS "marginPercentage",
    fixed_margin AS "fixedMargin",
    currency,
    is_active AS "isActive",
    created_at AS "createdAt",
    updated_at AS "updatedAt""#;

/// Owns the DuckDB connection holding pricing settings.
pub struct SettingsStore {
    conn: DuckDbConnection,
    location: Option<PathBuf>,
}

impl SettingsStore {
    /// Open (or create) a file-backed store at `path`.
    ///
    /// Parent directories are created as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(&path)?;
        let store = Self {
            conn,
            location: Some(path),
        };
        store.ensure_schema()?;
        info!(path = %store.describe_location(), "opened pricing settings store");
        Ok(store)
    }

    /// Open a store that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        let store = Self {
            conn,
            location: None,
        };
        store.ensure_schema()?;
        debug!("opened in-memory pricing settings store");
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Database file path, or `None` for an in-memory store.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub(crate) fn describe_location(&self) -> String {
        match &self.location {
            Some(p) => p.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        // Column metadata is only available once the query has run.
        let column_names: Vec<String> = match rows.as_ref() {
            Some(s) => s.column_names().into_iter().map(|s| s.to_string()).collect(),
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Execute a write statement, returning the number of affected rows.
    pub fn execute_write(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise.
    pub fn in_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        let result = f(self).and_then(|value| {
            self.conn.execute_batch("COMMIT")?;
            Ok(value)
        });
        if result.is_err() {
            self.rollback();
        }
        result
    }

    fn rollback(&self) {
        if self.conn.is_autocommit() {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!(error = %e, "rollback failed");
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        _ => serde_json::Value::Null,
    }
}
