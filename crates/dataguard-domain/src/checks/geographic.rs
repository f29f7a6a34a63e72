use super::CheckContext;
use super::utils::{columns_containing, display_value};
use crate::keywords;
use dataguard_backend::{BackendError, quote_ident};
use dataguard_types::{PotentialViolation, RuleType};
use serde_json::json;
use tracing::debug;

/// Distinct values sampled per geography-like column.
const DISTINCT_LIMIT: u32 = 50;
/// Distinct values carried into the hit payload.
const REPORTED_LIMIT: usize = 10;

/// Surface distinct geographic values for manual adjudication. This check
/// never self-resolves: whether a region is restricted is a judgment call,
/// so every populated column yields a requires-review hit.
pub fn run(ctx: &CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError> {
    let geo_columns = columns_containing(ctx.columns, keywords::GEO_COLUMN_HINTS);
    if geo_columns.is_empty() {
        return Ok(Vec::new());
    }

    let restricted = restricted_families(&ctx.rule.text);
    let table = quote_ident(ctx.table);

    let mut out = Vec::new();
    for column in &geo_columns {
        let col = quote_ident(column);
        let sql = format!(
            "SELECT DISTINCT {col} FROM {table} WHERE {col} IS NOT NULL LIMIT {DISTINCT_LIMIT}"
        );
        let rows = match ctx.backend.query(&sql, &[]) {
            Ok(rows) => rows,
            Err(e) => {
                debug!(table = ctx.table, column = %column, error = %e, "geographic check skipped column");
                continue;
            }
        };
        if rows.is_empty() {
            continue;
        }

        let values: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get(column.as_str()))
            .map(display_value)
            .take(REPORTED_LIMIT)
            .collect();

        let mut hit = PotentialViolation::new(
            RuleType::GeographicRestriction,
            ctx.table,
            ctx.rule,
            format!("Geographic data found in {column}. Manual review needed for compliance."),
        );
        hit.column = Some(column.clone());
        hit.requires_review = true;
        hit.data = json!({
            "unique_regions": values,
            "restricted": restricted,
        });
        out.push(hit);
    }

    Ok(out)
}

/// Infer restricted region families from keywords in the rule text.
fn restricted_families(text: &str) -> Vec<serde_json::Value> {
    let lower = text.to_lowercase();
    let mut families = Vec::new();
    if lower.contains("eu") || lower.contains("eea") {
        families.push(json!({"family": "EU_DATA", "regions": ["EU", "EEA"]}));
    }
    if lower.contains("us") {
        families.push(json!({"family": "US_DATA", "regions": ["US", "USA"]}));
    }
    families
}
