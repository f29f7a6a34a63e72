use super::CheckContext;
use super::utils::{columns_containing, count_from_rows};
use crate::keywords;
use dataguard_backend::{BackendError, quote_ident};
use dataguard_types::{PotentialViolation, RuleType};
use tracing::debug;

/// Count rows older than the rule's retention window in every date-like
/// column. Standard interval arithmetic is tried first; stores without it
/// (SQLite) get the `date('now', ...)` form.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let date_columns = columns_containing(ctx.columns, keywords::DATE_COLUMN_HINTS);
    if date_columns.is_empty() {
        return Ok(Vec::new());
    }

    let retention_days = ctx.rule.retention_days();
    let table = quote_ident(ctx.table);

    let mut out = Vec::new();
    for column in &date_columns {
        let col = quote_ident(column);
        let standard = format!(
            "SELECT COUNT(*) AS count FROM {table} \
             WHERE {col} < CURRENT_DATE - INTERVAL '{retention_days} days'"
        );
        let fallback = format!(
            "SELECT COUNT(*) AS count FROM {table} \
             WHERE {col} < date('now', '-{retention_days} days')"
        );

        let rows = match ctx.backend.query(&standard, &[]) {
            Ok(rows) => rows,
            Err(_) => match ctx.backend.query(&fallback, &[]) {
                Ok(rows) => rows,
                Err(e) => {
                    debug!(table = ctx.table, column = %column, error = %e, "retention check skipped column");
                    continue;
                }
            },
        };

        let count = count_from_rows(&rows);
        if count > 0 {
            let mut hit = PotentialViolation::new(
                RuleType::DataRetention,
                ctx.table,
                ctx.rule,
                format!("Found {count} records older than {retention_days} days based on {column}"),
            );
            hit.column = Some(column.clone());
            hit.violation_count = Some(count);
            out.push(hit);
        }
    }

    Ok(out)
}
