use crate::rule::{Rule, RuleType};
use crate::schema::TableSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A raw, unscored hit produced by a checker.
///
/// Ephemeral: consumed by the scorer immediately after the scan and never
/// persisted standalone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PotentialViolation {
    pub rule_type: RuleType,
    pub table: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Composite hits (e.g. the access check) list several columns at once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_count: Option<u64>,

    pub details: String,

    /// Set by checks that only surface data for manual adjudication.
    #[serde(default)]
    pub requires_review: bool,

    /// Check-specific structured payload (sampled regions, predicate text).
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub data: JsonValue,
}

impl PotentialViolation {
    pub fn new(rule_type: RuleType, table: &str, rule: &Rule, details: String) -> Self {
        PotentialViolation {
            rule_type,
            table: table.to_string(),
            column: None,
            columns: None,
            rule_id: Some(rule.id.clone()),
            rule_text: Some(rule.text.clone()),
            violation_count: None,
            details,
            requires_review: false,
            data: JsonValue::Null,
        }
    }
}

/// Internal error marker recorded when a check fails at (table, rule)
/// granularity. Not a user-facing violation, but never silently dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanDiagnostic {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub error: String,
}

/// Everything one scan produced, finalized at scan end.
///
/// Discarded after scoring; only the violation history survives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanResult {
    pub scan_id: String,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,

    pub tables_scanned: Vec<String>,
    pub rules_checked: u32,

    pub potential_violations: Vec<PotentialViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ScanDiagnostic>,

    /// Full schema snapshot for downstream consumers.
    pub schema: BTreeMap<String, TableSchema>,
}
