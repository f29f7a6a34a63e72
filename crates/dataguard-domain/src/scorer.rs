//! Converts raw hits into ranked, categorized violations.
//!
//! Pure and deterministic apart from the fresh violation id and detection
//! timestamp: same hits in, same severities, scores, categories, and tags
//! out.

use crate::fingerprint::fingerprint_for_hit;
use dataguard_types::{
    Framework, PotentialViolation, Rule, RuleType, ScanResult, Severity, Violation,
    ViolationStatus,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use uuid::Uuid;

/// Score every hit of a scan. Diagnostics stay on the scan result; each
/// remaining hit yields exactly one violation, ranked descending by risk
/// score (ties keep discovery order).
pub fn score(result: &ScanResult, rules: &[Rule]) -> Vec<Violation> {
    let rules_by_id: BTreeMap<&str, &Rule> = rules.iter().map(|r| (r.id.as_str(), r)).collect();
    let detected_at = OffsetDateTime::now_utc();

    let mut violations: Vec<Violation> = result
        .potential_violations
        .iter()
        .map(|hit| {
            let rule = hit
                .rule_id
                .as_deref()
                .and_then(|id| rules_by_id.get(id).copied());
            build_violation(hit, rule, &result.scan_id, detected_at)
        })
        .collect();

    // Vec::sort_by is stable, so equal scores keep discovery order.
    violations.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    violations
}

fn build_violation(
    hit: &PotentialViolation,
    rule: Option<&Rule>,
    scan_id: &str,
    detected_at: OffsetDateTime,
) -> Violation {
    let severity = resolve_severity(hit, rule);
    let count = hit.violation_count.unwrap_or(1);

    Violation {
        id: Uuid::new_v4().to_string(),
        scan_id: scan_id.to_string(),
        rule_id: hit.rule_id.clone(),
        rule_type: hit.rule_type,
        rule_text: hit
            .rule_text
            .clone()
            .or_else(|| rule.map(|r| r.text.clone())),
        table: hit.table.clone(),
        column: hit.column.clone(),
        columns: hit.columns.clone(),
        violation_count: count,
        details: hit.details.clone(),
        explanation: None,
        remediation: None,
        severity,
        risk_score: risk_score(severity, hit.rule_type, count),
        category: category_label(hit.rule_type).to_string(),
        frameworks: frameworks_for(hit.rule_type).to_vec(),
        status: ViolationStatus::Open,
        requires_review: hit.requires_review,
        detected_at,
        fingerprint: Some(fingerprint_for_hit(hit)),
    }
}

/// First applicable wins: declared rule severity, then category defaults
/// (volume-sensitive for the encryption and age categories).
pub fn resolve_severity(hit: &PotentialViolation, rule: Option<&Rule>) -> Severity {
    if let Some(declared) = rule.and_then(|r| r.severity) {
        return declared;
    }

    match hit.rule_type {
        RuleType::DataEncryption | RuleType::AgeRestriction => {
            if hit.violation_count.unwrap_or(1) > 100 {
                Severity::Critical
            } else {
                Severity::High
            }
        }
        RuleType::DataRetention | RuleType::DataAccess | RuleType::GeographicRestriction => {
            Severity::High
        }
        RuleType::Consent | RuleType::DataMasking | RuleType::Notification => Severity::Medium,
        RuleType::AuditLogging => Severity::Low,
        RuleType::Other => Severity::Medium,
    }
}

/// `min(100, base × multiplier × (1 + log10(max(count, 1)) × 0.1))`,
/// rounded to two decimals.
pub fn risk_score(severity: Severity, rule_type: RuleType, count: u64) -> f64 {
    let base = severity.base_weight();
    let count_factor = 1.0 + (count.max(1) as f64).log10() * 0.1;
    let score = (base * risk_multiplier(rule_type) * count_factor).min(100.0);
    (score * 100.0).round() / 100.0
}

fn risk_multiplier(rule_type: RuleType) -> f64 {
    match rule_type {
        RuleType::DataEncryption => 1.5,
        RuleType::DataRetention => 1.3,
        RuleType::DataAccess => 1.4,
        RuleType::Consent => 1.2,
        RuleType::AgeRestriction => 1.5,
        RuleType::GeographicRestriction => 1.3,
        RuleType::AuditLogging => 1.0,
        RuleType::DataMasking => 1.1,
        RuleType::Notification => 1.2,
        RuleType::Other => 1.0,
    }
}

fn category_label(rule_type: RuleType) -> &'static str {
    match rule_type {
        RuleType::DataRetention => "Data Lifecycle",
        RuleType::DataAccess => "Access Control",
        RuleType::DataEncryption | RuleType::DataMasking => "Data Protection",
        RuleType::Consent | RuleType::AgeRestriction => "Privacy Rights",
        RuleType::GeographicRestriction => "Data Sovereignty",
        RuleType::AuditLogging => "Audit & Compliance",
        RuleType::Notification => "Incident Response",
        RuleType::Other => "General Compliance",
    }
}

fn frameworks_for(rule_type: RuleType) -> &'static [Framework] {
    match rule_type {
        RuleType::DataRetention => &[Framework::Gdpr, Framework::Hipaa, Framework::Ccpa],
        RuleType::DataEncryption => &[Framework::Hipaa, Framework::PciDss],
        RuleType::DataMasking => &[Framework::PciDss],
        RuleType::DataAccess => &[
            Framework::Gdpr,
            Framework::Hipaa,
            Framework::Ccpa,
            Framework::PciDss,
            Framework::Sox,
        ],
        RuleType::Consent => &[Framework::Gdpr, Framework::Ccpa],
        RuleType::AgeRestriction => &[Framework::Coppa],
        RuleType::GeographicRestriction => &[Framework::Gdpr],
        RuleType::AuditLogging => &[Framework::Hipaa, Framework::PciDss, Framework::Sox],
        RuleType::Notification => &[Framework::Gdpr],
        RuleType::Other => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hit, rule};
    use std::collections::BTreeMap;
    use time::Duration;

    fn result_with_hits(hits: Vec<PotentialViolation>) -> ScanResult {
        let now = OffsetDateTime::now_utc();
        ScanResult {
            scan_id: "20260805_120000".to_string(),
            started_at: now - Duration::seconds(1),
            completed_at: now,
            tables_scanned: vec!["users".to_string()],
            rules_checked: 1,
            potential_violations: hits,
            diagnostics: Vec::new(),
            schema: BTreeMap::new(),
        }
    }

    #[test]
    fn declared_rule_severity_wins() {
        let mut r = rule("r-test", RuleType::AuditLogging);
        r.severity = Some(Severity::Critical);

        let h = hit(RuleType::AuditLogging, "users", None);
        assert_eq!(resolve_severity(&h, Some(&r)), Severity::Critical);
        assert_eq!(resolve_severity(&h, None), Severity::Low);
    }

    #[test]
    fn encryption_severity_escalates_on_volume() {
        let large = hit(RuleType::DataEncryption, "users", Some(150));
        assert_eq!(resolve_severity(&large, None), Severity::Critical);

        let small = hit(RuleType::DataEncryption, "users", Some(10));
        assert_eq!(resolve_severity(&small, None), Severity::High);
    }

    #[test]
    fn category_defaults_cover_every_type() {
        assert_eq!(
            resolve_severity(&hit(RuleType::DataRetention, "t", None), None),
            Severity::High
        );
        assert_eq!(
            resolve_severity(&hit(RuleType::GeographicRestriction, "t", None), None),
            Severity::High
        );
        assert_eq!(
            resolve_severity(&hit(RuleType::DataMasking, "t", None), None),
            Severity::Medium
        );
        assert_eq!(
            resolve_severity(&hit(RuleType::Other, "t", None), None),
            Severity::Medium
        );
    }

    #[test]
    fn risk_score_matches_formula() {
        // high (75) x encryption (1.5) x count 1 => 112.5, capped.
        assert_eq!(risk_score(Severity::High, RuleType::DataEncryption, 1), 100.0);
        // low (25) x audit (1.0) x count 1 => 25.
        assert_eq!(risk_score(Severity::Low, RuleType::AuditLogging, 1), 25.0);
        // medium (50) x masking (1.1) x count 10 => 55 x 1.1 => 60.5.
        assert_eq!(risk_score(Severity::Medium, RuleType::DataMasking, 10), 60.5);
    }

    #[test]
    fn score_ranks_descending_with_stable_ties() {
        let hits = vec![
            hit(RuleType::AuditLogging, "alpha", None), // 25.0
            hit(RuleType::DataEncryption, "bravo", Some(200)), // 100.0
            hit(RuleType::AuditLogging, "charlie", None), // 25.0
        ];
        let violations = score(&result_with_hits(hits), &[]);

        assert_eq!(violations[0].table, "bravo");
        assert_eq!(violations[1].table, "alpha");
        assert_eq!(violations[2].table, "charlie");
    }

    #[test]
    fn every_hit_becomes_exactly_one_violation() {
        let hits = vec![
            hit(RuleType::DataAccess, "users", None),
            hit(RuleType::AuditLogging, "orders", None),
        ];
        let violations = score(&result_with_hits(hits), &[]);

        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.status == ViolationStatus::Open));
        assert!(violations.iter().all(|v| v.scan_id == "20260805_120000"));
    }

    #[test]
    fn rescoring_differs_only_in_id_and_timestamp() {
        let result = result_with_hits(vec![hit(RuleType::DataEncryption, "users", Some(5))]);

        let mut first = score(&result, &[]).remove(0);
        let mut second = score(&result, &[]).remove(0);
        assert_ne!(first.id, second.id);

        first.id = String::new();
        second.id = String::new();
        first.detected_at = OffsetDateTime::UNIX_EPOCH;
        second.detected_at = OffsetDateTime::UNIX_EPOCH;
        assert_eq!(first, second);
    }

    #[test]
    fn explanation_fields_stay_unpopulated() {
        let violations = score(
            &result_with_hits(vec![hit(RuleType::Consent, "users", None)]),
            &[],
        );
        assert_eq!(violations[0].explanation, None);
        assert_eq!(violations[0].remediation, None);
    }

    #[test]
    fn framework_tags_follow_category() {
        let violations = score(
            &result_with_hits(vec![
                hit(RuleType::AgeRestriction, "users", Some(1)),
                hit(RuleType::DataEncryption, "users", Some(1)),
            ]),
            &[],
        );

        let age = violations
            .iter()
            .find(|v| v.rule_type == RuleType::AgeRestriction)
            .expect("age violation");
        assert_eq!(age.frameworks, vec![Framework::Coppa]);
        assert_eq!(age.category, "Privacy Rights");

        let enc = violations
            .iter()
            .find(|v| v.rule_type == RuleType::DataEncryption)
            .expect("encryption violation");
        assert_eq!(enc.frameworks, vec![Framework::Hipaa, Framework::PciDss]);
        assert_eq!(enc.category, "Data Protection");
    }
}
