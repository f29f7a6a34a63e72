use dataguard_types::PotentialViolation;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a hit.
///
/// Identity fields:
/// - rule category
/// - table
/// - originating rule id (if present)
/// - column / column list (if present)
///
/// Deliberately excludes counts, details, and timestamps so the same
/// exposure fingerprints identically across scans.
pub fn fingerprint_for_hit(hit: &PotentialViolation) -> String {
    let mut canonical = format!("{}|{}", hit.rule_type.as_str(), hit.table);
    if let Some(rule_id) = &hit.rule_id {
        canonical.push('|');
        canonical.push_str(rule_id);
    }
    if let Some(column) = &hit.column {
        canonical.push('|');
        canonical.push_str(column);
    }
    if let Some(columns) = &hit.columns {
        canonical.push('|');
        canonical.push_str(&columns.join(","));
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::hit;
    use dataguard_types::RuleType;

    #[test]
    fn fingerprint_ignores_count_but_not_column() {
        let mut a = hit(RuleType::DataEncryption, "users", Some(10));
        a.column = Some("ssn".to_string());
        let mut b = hit(RuleType::DataEncryption, "users", Some(500));
        b.column = Some("ssn".to_string());
        assert_eq!(fingerprint_for_hit(&a), fingerprint_for_hit(&b));

        b.column = Some("credit_card".to_string());
        assert_ne!(fingerprint_for_hit(&a), fingerprint_for_hit(&b));
    }
}
