//! Scorer properties that must hold for arbitrary inputs.

use crate::scorer::{resolve_severity, risk_score};
use crate::test_support::hit;
use dataguard_types::{RuleType, Severity};
use proptest::prelude::*;

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

fn any_rule_type() -> impl Strategy<Value = RuleType> {
    prop_oneof![
        Just(RuleType::DataRetention),
        Just(RuleType::DataEncryption),
        Just(RuleType::DataMasking),
        Just(RuleType::DataAccess),
        Just(RuleType::Consent),
        Just(RuleType::AgeRestriction),
        Just(RuleType::GeographicRestriction),
        Just(RuleType::AuditLogging),
        Just(RuleType::Notification),
        Just(RuleType::Other),
    ]
}

proptest! {
    #[test]
    fn risk_score_stays_in_bounds(
        severity in any_severity(),
        rule_type in any_rule_type(),
        count in 0u64..10_000_000,
    ) {
        let score = risk_score(severity, rule_type, count);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn risk_score_is_monotone_in_count(
        severity in any_severity(),
        rule_type in any_rule_type(),
        count in 1u64..1_000_000,
        extra in 0u64..1_000_000,
    ) {
        let lower = risk_score(severity, rule_type, count);
        let higher = risk_score(severity, rule_type, count + extra);
        prop_assert!(higher >= lower);
    }

    #[test]
    fn severity_resolution_is_deterministic(
        rule_type in any_rule_type(),
        count in proptest::option::of(0u64..1_000_000),
    ) {
        let h = hit(rule_type, "users", count);
        prop_assert_eq!(resolve_severity(&h, None), resolve_severity(&h, None));
    }
}
