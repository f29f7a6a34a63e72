use crate::scan::ScanDiagnostic;
use crate::violation::{Violation, ViolationSummary};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for the emitted scan report.
pub const SCHEMA_SCAN_REPORT_V1: &str = "dataguard.scan.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Scan-level summary payload for the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanData {
    pub scan_id: String,
    pub tables_scanned: Vec<String>,
    pub rules_checked: u32,

    /// Raw hits produced by checkers; every hit is accounted for as either
    /// a violation or a diagnostic.
    pub hits_total: u32,
    pub diagnostics_total: u32,

    pub violations_total: u32,
    pub violations_emitted: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// The report envelope written after scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,

    pub data: ScanData,

    /// Ranked descending by risk score.
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ScanDiagnostic>,

    pub summary: ViolationSummary,
}
