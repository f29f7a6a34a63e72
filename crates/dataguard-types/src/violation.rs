use crate::rule::{RuleType, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Regulatory frameworks a violation can be tagged with.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Framework {
    Gdpr,
    Hipaa,
    Ccpa,
    PciDss,
    Sox,
    Coppa,
}

impl Framework {
    pub fn as_str(self) -> &'static str {
        match self {
            Framework::Gdpr => "GDPR",
            Framework::Hipaa => "HIPAA",
            Framework::Ccpa => "CCPA",
            Framework::PciDss => "PCI-DSS",
            Framework::Sox => "SOX",
            Framework::Coppa => "COPPA",
        }
    }
}

/// Review lifecycle. The engine always emits `Open`; every later transition
/// belongs to the external review workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    Open,
    Confirmed,
    FalsePositive,
    Escalated,
}

/// A scored, categorized violation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub id: String,
    pub scan_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_text: Option<String>,

    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    pub violation_count: u64,
    pub details: String,

    /// Populated by the external explanation stage, never by this engine.
    pub explanation: Option<String>,
    /// Populated by the external explanation stage, never by this engine.
    pub remediation: Option<String>,

    pub severity: Severity,
    /// 0-100, two decimals.
    pub risk_score: f64,
    /// Human-facing grouping label ("Data Protection", "Privacy Rights"...).
    pub category: String,
    pub frameworks: Vec<Framework>,

    pub status: ViolationStatus,
    pub requires_review: bool,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub detected_at: OffsetDateTime,

    /// Stable identity hash for dedup and trending across scans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Aggregate statistics over a scored violation set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViolationSummary {
    pub total_violations: u32,
    pub by_severity: BTreeMap<String, u32>,
    pub by_category: BTreeMap<String, u32>,
    pub by_type: BTreeMap<String, u32>,
    pub by_framework: BTreeMap<String, u32>,
    pub average_risk_score: f64,
    pub critical_count: u32,
    pub high_count: u32,
    pub requires_review: u32,
}

impl ViolationSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = ViolationSummary {
            total_violations: violations.len() as u32,
            ..ViolationSummary::default()
        };

        let mut risk_total = 0.0;
        for v in violations {
            *summary
                .by_severity
                .entry(v.severity.as_str().to_string())
                .or_default() += 1;
            *summary.by_category.entry(v.category.clone()).or_default() += 1;
            *summary
                .by_type
                .entry(v.rule_type.as_str().to_string())
                .or_default() += 1;
            for fw in &v.frameworks {
                *summary
                    .by_framework
                    .entry(fw.as_str().to_string())
                    .or_default() += 1;
            }
            risk_total += v.risk_score;
            if v.requires_review {
                summary.requires_review += 1;
            }
        }

        if !violations.is_empty() {
            summary.average_risk_score =
                (risk_total / violations.len() as f64 * 100.0).round() / 100.0;
        }
        summary.critical_count = summary.by_severity.get("critical").copied().unwrap_or(0);
        summary.high_count = summary.by_severity.get("high").copied().unwrap_or(0);

        summary
    }
}
