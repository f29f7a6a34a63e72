use super::CheckContext;
use super::utils::columns_containing;
use crate::keywords;
use dataguard_backend::BackendError;
use dataguard_types::{PotentialViolation, RuleType};

/// Static check, no sampling: a table exposing sensitive-named columns gets
/// one composite hit listing all of them, flagged for manual review.
/// Whether access controls actually exist is not observable through the
/// port, so this check never self-resolves.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let sensitive = columns_containing(ctx.columns, keywords::SENSITIVE_COLUMN_NAMES);
    if sensitive.is_empty() {
        return Ok(Vec::new());
    }

    let mut hit = PotentialViolation::new(
        RuleType::DataAccess,
        ctx.table,
        ctx.rule,
        format!(
            "Table contains sensitive columns that may need access controls: {}",
            sensitive.join(", ")
        ),
    );
    hit.columns = Some(sensitive);
    hit.requires_review = true;
    Ok(vec![hit])
}
