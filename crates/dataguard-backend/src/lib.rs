//! Uniform access port over tabular data stores.
//!
//! The scan engine only ever talks to a store through the [`Backend`] trait:
//! enumerate tables, introspect one table's schema, run a read query, sample
//! rows. Dialect differences are deliberately NOT absorbed here; checkers
//! carry their own fallback query forms.

#![forbid(unsafe_code)]

mod error;
mod sqlite;

pub use error::BackendError;
pub use sqlite::SqliteBackend;

use dataguard_types::TableSchema;
use serde_json::Value as JsonValue;

/// One result row: ordered field name -> JSON value.
pub type Row = serde_json::Map<String, JsonValue>;

/// Blocking access port over a connected store.
///
/// Implementations must be shareable across scan workers; connection
/// hand-over or internal locking is the implementation's concern.
pub trait Backend: Send + Sync {
    /// Short human-facing name for logs ("sqlite", "scripted"...).
    fn name(&self) -> &str;

    /// Enumerate tables (or collections) in the connected store.
    fn list_tables(&self) -> Result<Vec<String>, BackendError>;

    /// Introspect one table: columns, types, keys, indexes.
    fn table_schema(&self, table: &str) -> Result<TableSchema, BackendError>;

    /// Run a parametrized read query, returning ordered field-maps.
    fn query(&self, sql: &str, params: &[JsonValue]) -> Result<Vec<Row>, BackendError>;

    /// Sample up to `limit` rows from a table.
    fn sample(&self, table: &str, limit: u32) -> Result<Vec<Row>, BackendError>;
}

/// Quote an identifier for interpolation into SQL, stripping characters
/// that would break out of the quoted form.
pub fn quote_ident(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | ';'))
        .collect();
    format!("\"{cleaned}\"")
}
