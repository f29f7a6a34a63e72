use super::CheckContext;
use super::utils::{SAMPLE_LIMIT, display_value, sample_column_sql};
use dataguard_backend::BackendError;
use dataguard_types::{PotentialViolation, RuleType};
use tracing::debug;

/// Sample matched columns for personal data stored without a masking
/// marker. First match flags the column and stops its sampling.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let mut out = Vec::new();

    for column in ctx.matched {
        let sql = sample_column_sql(ctx.table, column, SAMPLE_LIMIT);
        let rows = match ctx.backend.query(&sql, &[]) {
            Ok(rows) => rows,
            Err(e) => {
                debug!(table = ctx.table, column = %column, error = %e, "masking check skipped column");
                continue;
            }
        };

        let lower = column.to_lowercase();
        for row in &rows {
            let Some(value) = row.get(column.as_str()) else {
                continue;
            };
            if looks_unmasked(&lower, &display_value(value)) {
                let mut hit = PotentialViolation::new(
                    RuleType::DataMasking,
                    ctx.table,
                    ctx.rule,
                    format!("Column {column} contains unmasked sensitive data"),
                );
                hit.column = Some(column.clone());
                out.push(hit);
                break;
            }
        }
    }

    Ok(out)
}

fn looks_unmasked(column_lower: &str, value: &str) -> bool {
    if column_lower.contains("email") {
        return value.contains('@') && !value.starts_with("***");
    }
    if column_lower.contains("phone") {
        let digits: String = value.chars().filter(|c| *c != '-' && *c != ' ').collect();
        return digits.chars().count() >= 10;
    }
    false
}
