//! The scan coordinator: walks the (table, rule) cross-product.

use crate::checks::{self, CheckContext, predicate};
use crate::matcher;
use dataguard_backend::{Backend, BackendError};
use dataguard_types::{PotentialViolation, Rule, ScanDiagnostic, ScanResult, TableSchema};
use rayon::prelude::*;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, warn};

#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Explicit table subset; `None` scans every table the backend lists.
    pub tables: Option<Vec<String>>,
}

struct TableOutcome {
    table: String,
    schema: Option<TableSchema>,
    hits: Vec<PotentialViolation>,
    diagnostics: Vec<ScanDiagnostic>,
}

/// Scan the connected store against the given rules.
///
/// Per-table work fans out across the rayon pool; checkers are pure
/// functions over their inputs plus the backend, so no ordering between
/// (table, rule) pairs exists. Table order in the result matches the
/// resolved input order regardless of scheduling.
///
/// A failing check never aborts the scan: it becomes a diagnostic tied to
/// its (table, rule) pair. Only backend enumeration failure is fatal.
pub fn scan(
    backend: &dyn Backend,
    rules: &[Rule],
    options: &ScanOptions,
) -> Result<ScanResult, BackendError> {
    let started_at = OffsetDateTime::now_utc();
    let scan_id = format_scan_id(started_at);
    info!(%scan_id, backend = backend.name(), "starting compliance scan");

    let all_tables = backend.list_tables()?;
    let requested = options
        .tables
        .clone()
        .unwrap_or_else(|| all_tables.clone());

    let mut targets = Vec::new();
    for table in requested {
        if all_tables.contains(&table) {
            targets.push(table);
        } else {
            warn!(%table, "table not found, skipping");
        }
    }

    let outcomes: Vec<TableOutcome> = targets
        .par_iter()
        .map(|table| scan_table(backend, table, rules))
        .collect();

    let mut result = ScanResult {
        scan_id,
        started_at,
        completed_at: started_at,
        tables_scanned: Vec::new(),
        rules_checked: rules.len() as u32,
        potential_violations: Vec::new(),
        diagnostics: Vec::new(),
        schema: BTreeMap::new(),
    };
    for outcome in outcomes {
        if let Some(schema) = outcome.schema {
            result.schema.insert(outcome.table.clone(), schema);
        }
        result.tables_scanned.push(outcome.table);
        result.potential_violations.extend(outcome.hits);
        result.diagnostics.extend(outcome.diagnostics);
    }
    result.completed_at = OffsetDateTime::now_utc();

    info!(
        scan_id = %result.scan_id,
        hits = result.potential_violations.len(),
        diagnostics = result.diagnostics.len(),
        "scan complete"
    );
    Ok(result)
}

fn scan_table(backend: &dyn Backend, table: &str, rules: &[Rule]) -> TableOutcome {
    let mut outcome = TableOutcome {
        table: table.to_string(),
        schema: None,
        hits: Vec::new(),
        diagnostics: Vec::new(),
    };

    let schema = match backend.table_schema(table) {
        Ok(schema) => schema,
        Err(e) => {
            warn!(table, error = %e, "schema introspection failed");
            outcome.diagnostics.push(ScanDiagnostic {
                table: table.to_string(),
                rule_id: None,
                error: e.to_string(),
            });
            return outcome;
        }
    };
    let columns = schema.column_names();
    outcome.schema = Some(schema);
    info!(table, "scanning table");

    for rule in rules {
        let matched = matcher::match_columns(rule, &columns);
        // Not applicable to this table; a valid outcome, not an error.
        if matched.is_empty() && rule.sql_condition.is_none() {
            continue;
        }

        let ctx = CheckContext {
            table,
            rule,
            columns: &columns,
            matched: &matched,
            backend,
        };
        let checked = match checks::checker_for(rule.rule_type) {
            Some(check) => check(&ctx),
            None => predicate::run(&ctx),
        };
        match checked {
            Ok(hits) => outcome.hits.extend(hits),
            Err(e) => {
                warn!(table, rule_id = %rule.id, error = %e, "check failed");
                outcome.diagnostics.push(ScanDiagnostic {
                    table: table.to_string(),
                    rule_id: Some(rule.id.clone()),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

fn format_scan_id(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}
