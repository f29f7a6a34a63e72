use super::CheckContext;
use crate::keywords;
use dataguard_backend::BackendError;
use dataguard_types::{PotentialViolation, RuleType};

/// Static check, no sampling: a table with none of the canonical audit
/// columns gets one requires-review hit.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let has_audit = ctx.columns.iter().any(|column| {
        let lower = column.to_lowercase();
        keywords::AUDIT_COLUMN_NAMES.iter().any(|a| lower.contains(a))
    });
    if has_audit {
        return Ok(Vec::new());
    }

    let mut hit = PotentialViolation::new(
        RuleType::AuditLogging,
        ctx.table,
        ctx.rule,
        format!(
            "Table {} lacks audit columns (created_at, updated_at, etc.)",
            ctx.table
        ),
    );
    hit.requires_review = true;
    Ok(vec![hit])
}
