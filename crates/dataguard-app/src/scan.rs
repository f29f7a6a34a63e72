//! The `scan` use case: resolve config, connect, scan, score, report.

use anyhow::Context;
use dataguard_backend::{Backend, SqliteBackend};
use dataguard_domain::ScanOptions;
use dataguard_settings::{DatabaseKind, Overrides, ResolvedConfig};
use dataguard_types::{
    Rule, ScanData, ScanReport, Severity, ToolMeta, ViolationSummary, SCHEMA_SCAN_REPORT_V1,
};
use time::OffsetDateTime;

/// Input for the scan use case.
#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the scan use case.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub report: ScanReport,
    /// The resolved configuration used.
    pub resolved: ResolvedConfig,
}

pub fn parse_rules_json(text: &str) -> anyhow::Result<Vec<Rule>> {
    serde_json::from_str(text).context("parse rules json")
}

/// Run the scan use case end to end: parse config, open the backend, load
/// rules, scan, score, build the report envelope.
pub fn run_scan(input: ScanInput<'_>) -> anyhow::Result<ScanOutput> {
    let cfg = if input.config_text.trim().is_empty() {
        dataguard_settings::DataguardConfigV1::default()
    } else {
        dataguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = dataguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let database = resolved.database.clone().context(
        "no database configured (pass --database or set [database] in dataguard.toml)",
    )?;
    let backend = match database.kind {
        DatabaseKind::Sqlite => SqliteBackend::open(&database.path)?,
    };

    let rules_path = resolved
        .rules_path
        .clone()
        .context("no rules file configured (pass --rules or set rules in dataguard.toml)")?;
    let rules_text = std::fs::read_to_string(&rules_path)
        .with_context(|| format!("read rules file {rules_path}"))?;
    let rules = parse_rules_json(&rules_text)?;

    run_scan_with_backend(&backend, &rules, &resolved)
}

/// Scan and score against an already-connected backend. Split out so tests
/// and embedders can drive scripted or in-memory stores.
pub fn run_scan_with_backend(
    backend: &dyn Backend,
    rules: &[Rule],
    resolved: &ResolvedConfig,
) -> anyhow::Result<ScanOutput> {
    let started_at = OffsetDateTime::now_utc();

    let options = ScanOptions {
        tables: resolved.tables.clone(),
    };
    let result = dataguard_domain::scan(backend, rules, &options)?;
    let violations = dataguard_domain::score(&result, rules);

    let summary = ViolationSummary::from_violations(&violations);
    let violations_total = violations.len() as u32;

    let mut emitted = violations;
    let mut truncated_reason = None;
    if emitted.len() > resolved.max_violations {
        emitted.truncate(resolved.max_violations);
        truncated_reason = Some(format!(
            "violations truncated to max_violations={}",
            resolved.max_violations
        ));
    }

    let finished_at = OffsetDateTime::now_utc();
    let report = ScanReport {
        schema: SCHEMA_SCAN_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "dataguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        data: ScanData {
            scan_id: result.scan_id.clone(),
            tables_scanned: result.tables_scanned.clone(),
            rules_checked: result.rules_checked,
            hits_total: result.potential_violations.len() as u32,
            diagnostics_total: result.diagnostics.len() as u32,
            violations_total,
            violations_emitted: emitted.len() as u32,
            truncated_reason,
        },
        violations: emitted,
        diagnostics: result.diagnostics,
        summary,
    };

    Ok(ScanOutput {
        report,
        resolved: resolved.clone(),
    })
}

/// Map a finished scan to an exit code: 0, or 2 when any violation meets
/// the fail-on threshold.
pub fn scan_exit_code(report: &ScanReport, fail_on: Option<Severity>) -> i32 {
    match fail_on {
        Some(threshold) if report.violations.iter().any(|v| v.severity >= threshold) => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataguard_settings::{Overrides, resolve_config};
    use dataguard_test_util::{ScriptedBackend, value_rows};
    use dataguard_types::RuleType;

    fn resolved() -> ResolvedConfig {
        resolve_config(Default::default(), Overrides::default()).expect("resolve")
    }

    fn encryption_rule() -> Rule {
        parse_rules_json(
            r#"[{"id": "r-enc", "type": "data_encryption",
                 "text": "Sensitive data must be encrypted at rest"}]"#,
        )
        .expect("parse rules")
        .remove(0)
    }

    #[test]
    fn scan_use_case_scores_and_accounts_for_every_hit() {
        let backend = ScriptedBackend::new()
            .with_table("users", &["id", "ssn", "password"])
            .respond(&["\"ssn\"", "LIMIT 10"], value_rows("ssn", &["123456789"]))
            .respond(&["\"password\"", "LIMIT 10"], value_rows("password", &["pw"]));

        let rules = vec![encryption_rule()];
        let output =
            run_scan_with_backend(&backend, &rules, &resolved()).expect("scan succeeds");
        let report = output.report;

        assert_eq!(report.schema, SCHEMA_SCAN_REPORT_V1);
        assert_eq!(report.data.hits_total, 2);
        assert_eq!(report.data.violations_total, 2);
        assert_eq!(report.data.diagnostics_total, 0);
        assert_eq!(report.data.violations_emitted, 2);
        assert_eq!(report.summary.total_violations, 2);
        assert!(report.violations.iter().all(|v| v.rule_type == RuleType::DataEncryption));
    }

    #[test]
    fn violations_are_truncated_at_max_with_reason() {
        let backend = ScriptedBackend::new()
            .with_table("users", &["ssn", "password"])
            .respond(&["\"ssn\""], value_rows("ssn", &["123456789"]))
            .respond(&["\"password\""], value_rows("password", &["pw"]));

        let mut cfg = resolved();
        cfg.max_violations = 1;

        let output =
            run_scan_with_backend(&backend, &[encryption_rule()], &cfg).expect("scan succeeds");

        assert_eq!(output.report.data.violations_total, 2);
        assert_eq!(output.report.data.violations_emitted, 1);
        assert_eq!(output.report.violations.len(), 1);
        assert!(output.report.data.truncated_reason.is_some());
        // Summary still describes the full scored set.
        assert_eq!(output.report.summary.total_violations, 2);
    }

    #[test]
    fn exit_code_respects_threshold() {
        let backend = ScriptedBackend::new()
            .with_table("users", &["ssn"])
            .respond(&["\"ssn\""], value_rows("ssn", &["123456789"]));

        let output = run_scan_with_backend(&backend, &[encryption_rule()], &resolved())
            .expect("scan succeeds");

        // Encryption hits default to high severity.
        assert_eq!(scan_exit_code(&output.report, None), 0);
        assert_eq!(scan_exit_code(&output.report, Some(Severity::High)), 2);
        assert_eq!(scan_exit_code(&output.report, Some(Severity::Critical)), 0);
    }

    #[test]
    fn missing_database_is_a_fatal_connection_error() {
        let input = ScanInput {
            config_text: "",
            overrides: Overrides::default(),
        };
        let err = run_scan(input).expect_err("should fail");
        assert!(err.to_string().contains("no database configured"));
    }
}
