//! Resolves which columns of a table a rule targets.

use crate::keywords;
use dataguard_types::Rule;

/// Match a rule against a table's column set.
///
/// Entity hints are resolved first: a `table.column` hint contributes its
/// column part when the table has it; a bare hint must equal a column name
/// exactly. Keyword augmentation by rule category follows. The result keeps
/// discovery order and contains no duplicates.
///
/// An empty result for a rule without a raw predicate means "not
/// applicable": the caller must skip evaluation for that (table, rule) pair.
pub fn match_columns(rule: &Rule, table_columns: &[String]) -> Vec<String> {
    let mut applicable: Vec<String> = Vec::new();

    for entity in &rule.entities {
        let hint = match entity.split_once('.') {
            Some((_, column)) => column,
            None => entity.as_str(),
        };
        if table_columns.iter().any(|c| c == hint) && !applicable.iter().any(|c| c == hint) {
            applicable.push(hint.to_string());
        }
    }

    let patterns = keywords::matcher_keywords(rule.rule_type);
    for column in table_columns {
        let lower = column.to_lowercase();
        if patterns.iter().any(|p| lower.contains(p)) && !applicable.contains(column) {
            applicable.push(column.clone());
        }
    }

    applicable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rule;
    use dataguard_types::RuleType;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn qualified_hint_keeps_column_part_when_present() {
        let mut r = rule("r-1", RuleType::Other);
        r.entities = vec!["users.email".to_string(), "users.missing".to_string()];

        let matched = match_columns(&r, &columns(&["id", "email"]));
        assert_eq!(matched, vec!["email".to_string()]);
    }

    #[test]
    fn bare_hint_requires_exact_match() {
        let mut r = rule("r-2", RuleType::Other);
        r.entities = vec!["email".to_string(), "mail".to_string()];

        let matched = match_columns(&r, &columns(&["email", "email_backup"]));
        assert_eq!(matched, vec!["email".to_string()]);
    }

    #[test]
    fn keyword_augmentation_is_substring_on_lowercase() {
        let r = rule("r-3", RuleType::DataEncryption);
        let matched = match_columns(&r, &columns(&["id", "User_Password", "notes"]));
        assert_eq!(matched, vec!["User_Password".to_string()]);
    }

    #[test]
    fn hints_come_before_keyword_matches_without_duplicates() {
        let mut r = rule("r-4", RuleType::DataMasking);
        r.entities = vec!["phone".to_string(), "phone".to_string()];

        let matched = match_columns(&r, &columns(&["email", "phone"]));
        assert_eq!(matched, vec!["phone".to_string(), "email".to_string()]);
    }

    #[test]
    fn categories_without_keywords_match_hints_only() {
        let r = rule("r-5", RuleType::DataRetention);
        let matched = match_columns(&r, &columns(&["created_at", "updated_at"]));
        assert!(matched.is_empty());
    }
}
