//! Query modules for the pricing SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`SettingsStore`](crate::store::SettingsStore) and exposes methods
//! returning `Result<T>` with typed model payloads.

pub mod preview;
pub mod settings;

pub use preview::PreviewQuery;
pub use settings::SettingsQuery;
