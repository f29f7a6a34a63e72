use dataguard_types::{PotentialViolation, Rule, RuleType};
use serde_json::Value as JsonValue;

pub fn rule(id: &str, rule_type: RuleType) -> Rule {
    Rule {
        id: id.to_string(),
        rule_type,
        text: "test rule".to_string(),
        severity: None,
        entities: Vec::new(),
        sql_condition: None,
        retention_value: None,
        retention_unit: None,
    }
}

pub fn rule_with_text(id: &str, rule_type: RuleType, text: &str) -> Rule {
    Rule {
        text: text.to_string(),
        ..rule(id, rule_type)
    }
}

pub fn retention_rule(id: &str, value: u32, unit: &str) -> Rule {
    Rule {
        retention_value: Some(value),
        retention_unit: Some(unit.to_string()),
        ..rule(id, RuleType::DataRetention)
    }
}

pub fn hit(rule_type: RuleType, table: &str, count: Option<u64>) -> PotentialViolation {
    PotentialViolation {
        rule_type,
        table: table.to_string(),
        column: None,
        columns: None,
        rule_id: Some("r-test".to_string()),
        rule_text: Some("test rule".to_string()),
        violation_count: count,
        details: "test hit".to_string(),
        requires_review: false,
        data: JsonValue::Null,
    }
}

pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
