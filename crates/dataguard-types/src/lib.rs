//! Stable DTOs shared across the dataguard workspace.
//!
//! This crate is intentionally boring:
//! - the rule input contract consumed from the ingestion stage
//! - schema snapshots, potential violations, and scan results
//! - the scored violation record and its summary statistics
//! - the emitted report envelope
//!
//! Anything with behavior (matching, checking, scoring) lives in
//! `dataguard-domain`.

#![forbid(unsafe_code)]

pub mod report;
pub mod rule;
pub mod schema;
pub mod scan;
pub mod violation;

pub use report::{ScanData, ScanReport, ToolMeta, SCHEMA_SCAN_REPORT_V1};
pub use rule::{Rule, RuleType, Severity};
pub use scan::{PotentialViolation, ScanDiagnostic, ScanResult};
pub use schema::{ColumnInfo, IndexInfo, TableSchema};
pub use violation::{Framework, Violation, ViolationStatus, ViolationSummary};
