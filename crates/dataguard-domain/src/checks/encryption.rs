use super::CheckContext;
use super::utils::{SAMPLE_LIMIT, display_value, sample_column_sql};
use dataguard_backend::BackendError;
use dataguard_types::{PotentialViolation, RuleType};
use tracing::debug;

/// Sample matched columns and flag values that look like plaintext where
/// ciphertext or a hash is expected. Paired name+shape heuristics only; the
/// first matching value flags the column and stops its sampling.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let mut out = Vec::new();

    for column in ctx.matched {
        let sql = sample_column_sql(ctx.table, column, SAMPLE_LIMIT);
        let rows = match ctx.backend.query(&sql, &[]) {
            Ok(rows) => rows,
            Err(e) => {
                debug!(table = ctx.table, column = %column, error = %e, "encryption check skipped column");
                continue;
            }
        };

        let lower = column.to_lowercase();
        for row in &rows {
            let Some(value) = row.get(column.as_str()) else {
                continue;
            };
            if looks_plaintext(&lower, &display_value(value)) {
                let mut hit = PotentialViolation::new(
                    RuleType::DataEncryption,
                    ctx.table,
                    ctx.rule,
                    format!("Column {column} appears to contain unencrypted sensitive data"),
                );
                hit.column = Some(column.clone());
                out.push(hit);
                break;
            }
        }
    }

    Ok(out)
}

/// Hashed passwords are assumed to be at least 60 characters (bcrypt and
/// friends); anything shorter in a password column is treated as plaintext.
fn looks_plaintext(column_lower: &str, value: &str) -> bool {
    let all_digits = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit());

    (column_lower.contains("ssn") && value.len() == 9 && all_digits)
        || (column_lower.contains("credit") && matches!(value.len(), 15 | 16) && all_digits)
        || (column_lower.contains("password") && value.chars().count() < 60)
}

#[cfg(test)]
mod tests {
    use super::looks_plaintext;

    #[test]
    fn nine_digit_value_in_ssn_column_is_plaintext() {
        assert!(looks_plaintext("ssn", "123456789"));
        assert!(!looks_plaintext("ssn", "12345678"));
        assert!(!looks_plaintext("ssn", "12345678a"));
        assert!(!looks_plaintext("notes", "123456789"));
    }

    #[test]
    fn card_number_lengths_in_credit_column_are_plaintext() {
        assert!(looks_plaintext("credit_card", "411111111111111"));
        assert!(looks_plaintext("credit_card", "4111111111111111"));
        assert!(!looks_plaintext("credit_card", "41111111"));
    }

    #[test]
    fn short_password_is_plaintext_long_hash_is_not() {
        assert!(looks_plaintext("password_hash", "hunter2"));
        assert!(!looks_plaintext(
            "password_hash",
            "$2b$12$LJ3m4yuT0Jrhsha3BlaZgOY6kyBnRJqzXiJmVkNqt8zFO1vi0DpGq"
        ));
    }
}
