use thiserror::Error;

/// Errors surfaced by a backend.
///
/// `Open` is the fatal connection error: a scan never starts without a
/// working backend. Everything else is recoverable at (table, rule)
/// granularity by the scan coordinator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("failed to open database {path}: {message}")]
    Open { path: String, message: String },

    #[error("query failed: {0}")]
    Query(String),

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("schema introspection failed for {table}: {message}")]
    Schema { table: String, message: String },
}
