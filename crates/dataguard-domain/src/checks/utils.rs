use dataguard_backend::{Row, quote_ident};
use serde_json::Value as JsonValue;

/// Rows sampled per column by the value-shape checks.
pub(crate) const SAMPLE_LIMIT: u32 = 10;

/// Columns whose lowercased name contains any of the given fragments,
/// keeping schema order.
pub(crate) fn columns_containing(columns: &[String], fragments: &[&str]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            fragments.iter().any(|f| lower.contains(f))
        })
        .cloned()
        .collect()
}

/// `SELECT "col" FROM "table" WHERE "col" IS NOT NULL LIMIT n`
pub(crate) fn sample_column_sql(table: &str, column: &str, limit: u32) -> String {
    let table = quote_ident(table);
    let column = quote_ident(column);
    format!("SELECT {column} FROM {table} WHERE {column} IS NOT NULL LIMIT {limit}")
}

/// `SELECT COUNT(*) AS count FROM "table" WHERE <predicate>`
pub(crate) fn count_sql(table: &str, predicate: &str) -> String {
    format!(
        "SELECT COUNT(*) AS count FROM {} WHERE {predicate}",
        quote_ident(table)
    )
}

/// Pull the `count` field out of a count query's result.
pub(crate) fn count_from_rows(rows: &[Row]) -> u64 {
    let Some(value) = rows.first().and_then(|row| row.get("count")) else {
        return 0;
    };
    match value {
        JsonValue::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)).unwrap_or(0),
        JsonValue::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Render a sampled cell the way a human would read it (no JSON quoting).
pub(crate) fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
