use super::CheckContext;
use super::utils::{count_from_rows, count_sql};
use dataguard_backend::BackendError;
use dataguard_types::PotentialViolation;
use serde_json::json;

/// Generic count check over the rule's raw predicate.
///
/// Also the fallback for categories without a dedicated checker. Unlike the
/// per-column checks there is no alternate query form, so a failure
/// propagates and the coordinator records a diagnostic for the pair.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let Some(condition) = ctx.rule.sql_condition.as_deref() else {
        return Ok(Vec::new());
    };

    let rows = ctx.backend.query(&count_sql(ctx.table, condition), &[])?;
    let count = count_from_rows(&rows);
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut hit = PotentialViolation::new(
        ctx.rule.rule_type,
        ctx.table,
        ctx.rule,
        format!("Found {count} records matching violation condition"),
    );
    hit.violation_count = Some(count);
    hit.data = json!({ "sql_condition": condition });
    Ok(vec![hit])
}
