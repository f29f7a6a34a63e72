//! Caller-owned scan and violation history.
//!
//! The engine itself keeps no ambient state: whoever runs scans owns a
//! `ScanHistory` value and decides its lifetime and synchronization.
//! Violations recorded here are mutated afterwards only by the external
//! review workflow.

use dataguard_types::{RuleType, ScanReport, Severity, Violation, ViolationStatus};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq)]
pub struct ScanRecord {
    pub scan_id: String,
    pub finished_at: OffsetDateTime,
    pub tables: u32,
    pub violations: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ScanHistory {
    scans: Vec<ScanRecord>,
    violations: Vec<Violation>,
}

impl ScanHistory {
    pub fn new() -> Self {
        ScanHistory::default()
    }

    /// Append one finished scan: a summary line plus its scored violations.
    pub fn record(&mut self, report: &ScanReport) {
        self.scans.push(ScanRecord {
            scan_id: report.data.scan_id.clone(),
            finished_at: report.finished_at,
            tables: report.data.tables_scanned.len() as u32,
            violations: report.data.violations_emitted,
        });
        self.violations.extend(report.violations.iter().cloned());
    }

    pub fn scans(&self) -> &[ScanRecord] {
        &self.scans
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn filter(&self, filter: &ViolationFilter) -> Vec<&Violation> {
        filter_violations(&self.violations, filter)
    }
}

/// Criteria are conjunctive; `None` means "any".
#[derive(Clone, Debug, Default)]
pub struct ViolationFilter {
    pub severity: Option<Severity>,
    pub category: Option<String>,
    pub rule_type: Option<RuleType>,
    pub status: Option<ViolationStatus>,
    pub min_risk_score: Option<f64>,
}

pub fn filter_violations<'a>(
    violations: &'a [Violation],
    filter: &ViolationFilter,
) -> Vec<&'a Violation> {
    violations
        .iter()
        .filter(|v| filter.severity.is_none_or(|s| v.severity == s))
        .filter(|v| {
            filter
                .category
                .as_deref()
                .is_none_or(|c| v.category == c)
        })
        .filter(|v| filter.rule_type.is_none_or(|t| v.rule_type == t))
        .filter(|v| filter.status.is_none_or(|s| v.status == s))
        .filter(|v| filter.min_risk_score.is_none_or(|min| v.risk_score >= min))
        .collect()
}
