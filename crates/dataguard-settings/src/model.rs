use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `dataguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so
/// forward-compat is easy. Validation happens in `resolve`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataguardConfigV1 {
    /// Optional schema string for tooling (`dataguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    /// Tables to scan; empty means every table the backend lists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,

    /// Path to the rules JSON produced by the ingestion stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,

    /// Severity threshold that fails the run: `low`, `medium`, `high`,
    /// `critical`. Absent means the scan never fails the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many violations to emit before truncating the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_violations: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseConfig {
    /// Store kind; only `sqlite` is built in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
