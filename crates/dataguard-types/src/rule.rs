use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Severity is ordered so threshold comparisons (`>= fail_on`) work directly.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Base weight used by the risk-score formula.
    pub fn base_weight(self) -> f64 {
        match self {
            Severity::Critical => 100.0,
            Severity::High => 75.0,
            Severity::Medium => 50.0,
            Severity::Low => 25.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Closed set of rule categories.
///
/// Serde names match the ingestion contract. Categories the ingestion stage
/// emits that we have no checker for (`data_quality`, `security`, ...) fold
/// into `Other` instead of failing deserialization.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    DataRetention,
    DataEncryption,
    DataMasking,
    DataAccess,
    Consent,
    AgeRestriction,
    GeographicRestriction,
    AuditLogging,
    Notification,
    #[serde(other)]
    Other,
}

impl RuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::DataRetention => "data_retention",
            RuleType::DataEncryption => "data_encryption",
            RuleType::DataMasking => "data_masking",
            RuleType::DataAccess => "data_access",
            RuleType::Consent => "consent",
            RuleType::AgeRestriction => "age_restriction",
            RuleType::GeographicRestriction => "geographic_restriction",
            RuleType::AuditLogging => "audit_logging",
            RuleType::Notification => "notification",
            RuleType::Other => "other",
        }
    }
}

/// A declarative or heuristic policy constraint, produced by the external
/// ingestion stage. Immutable for the duration of a scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rule {
    pub id: String,

    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Free-text statement of the policy constraint.
    pub text: String,

    /// Severity declared by the policy itself; when absent the scorer
    /// derives one from the rule category and hit count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Target-entity hints, either `"table.column"` or a bare column name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<String>,

    /// Raw predicate for the generic count check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_condition: Option<String>,

    /// Retention window magnitude. The ingestion stage extracts this from
    /// policy text and sometimes emits it as a string, so accept both.
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub retention_value: Option<u32>,

    /// Retention window unit, free-form (`"days"`, `"months"`, `"years"`...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_unit: Option<String>,
}

impl Rule {
    /// Retention window in days, using the fixed 30/365-day month/year
    /// approximations. Defaults to 90 days when no magnitude is declared.
    pub fn retention_days(&self) -> u32 {
        let value = self.retention_value.unwrap_or(90);
        let unit = self
            .retention_unit
            .as_deref()
            .unwrap_or("days")
            .to_lowercase();
        if unit.contains("month") {
            value * 30
        } else if unit.contains("year") {
            value * 365
        } else {
            value
        }
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(de)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
