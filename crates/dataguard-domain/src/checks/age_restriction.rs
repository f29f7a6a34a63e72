use super::CheckContext;
use super::utils::{columns_containing, count_from_rows};
use crate::keywords;
use dataguard_backend::{BackendError, quote_ident};
use dataguard_types::{PotentialViolation, RuleType};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const DEFAULT_MIN_AGE: u32 = 18;

/// Count rows whose computed age falls below the rule's minimum in every
/// birth-date-like column. Standard `AGE()` arithmetic first, a
/// `julianday`-based form second; columns where both fail are skipped.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let birth_columns = columns_containing(ctx.columns, keywords::BIRTH_COLUMN_HINTS);
    if birth_columns.is_empty() {
        return Ok(Vec::new());
    }

    let min_age = minimum_age(&ctx.rule.text);
    let table = quote_ident(ctx.table);

    let mut out = Vec::new();
    for column in &birth_columns {
        let col = quote_ident(column);
        let standard = format!(
            "SELECT COUNT(*) AS count FROM {table} \
             WHERE EXTRACT(YEAR FROM AGE(CURRENT_DATE, CAST({col} AS date))) < {min_age}"
        );
        let fallback = format!(
            "SELECT COUNT(*) AS count FROM {table} \
             WHERE CAST((julianday('now') - julianday({col})) / 365.25 AS INTEGER) < {min_age}"
        );

        let rows = match ctx.backend.query(&standard, &[]) {
            Ok(rows) => rows,
            Err(_) => match ctx.backend.query(&fallback, &[]) {
                Ok(rows) => rows,
                Err(e) => {
                    debug!(table = ctx.table, column = %column, error = %e, "age check skipped column");
                    continue;
                }
            },
        };

        let count = count_from_rows(&rows);
        if count > 0 {
            let mut hit = PotentialViolation::new(
                RuleType::AgeRestriction,
                ctx.table,
                ctx.rule,
                format!("Found {count} records with age below {min_age}"),
            );
            hit.column = Some(column.clone());
            hit.violation_count = Some(count);
            out.push(hit);
        }
    }

    Ok(out)
}

/// Parse a minimum age from the rule text (`"... 16 years ..."`).
fn minimum_age(text: &str) -> u32 {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"(?i)(\d+)\s*years?").expect("static pattern"));
    re.captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(DEFAULT_MIN_AGE)
}

#[cfg(test)]
mod tests {
    use super::minimum_age;

    #[test]
    fn parses_minimum_age_from_rule_text() {
        assert_eq!(minimum_age("no accounts for users under 16 years of age"), 16);
        assert_eq!(minimum_age("must be 21 Years or older"), 21);
    }

    #[test]
    fn defaults_to_eighteen() {
        assert_eq!(minimum_age("minors may not be profiled"), 18);
    }
}
