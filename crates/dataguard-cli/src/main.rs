//! CLI entry point for dataguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. All business logic lives in the `dataguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use dataguard_app::{
    ScanInput, ViolationFilter, filter_violations, parse_report_json, run_scan, scan_exit_code,
    write_report,
};
use dataguard_backend::{Backend, SqliteBackend};
use dataguard_settings::{DatabaseKind, Overrides, parse_severity};
use dataguard_types::{RuleType, ViolationStatus};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dataguard",
    version,
    about = "Compliance scanner and violation scoring for live data stores"
)]
struct Cli {
    /// Path to dataguard config TOML.
    #[arg(long, default_value = "dataguard.toml")]
    config: Utf8PathBuf,

    /// Override the database path (sqlite).
    #[arg(long)]
    database: Option<String>,

    /// Override the rules JSON path.
    #[arg(long)]
    rules: Option<String>,

    /// Restrict the scan to these tables (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',')]
    tables: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the connected store, score violations, write the JSON report.
    Scan {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/dataguard/report.json")]
        report_out: Utf8PathBuf,

        /// Fail the run (exit 2) when any violation reaches this severity.
        #[arg(long)]
        fail_on: Option<String>,

        /// Override maximum violations to emit.
        #[arg(long)]
        max_violations: Option<u32>,
    },

    /// List tables of the connected store with their column counts.
    Tables,

    /// Filter violations from an existing JSON report.
    Violations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/dataguard/report.json")]
        report: Utf8PathBuf,

        /// Keep only this severity (low|medium|high|critical).
        #[arg(long)]
        severity: Option<String>,

        /// Keep only this category label (e.g. "Data Protection").
        #[arg(long)]
        category: Option<String>,

        /// Keep only this rule type (e.g. data_encryption).
        #[arg(long)]
        rule_type: Option<String>,

        /// Keep only this review status (open|confirmed|false_positive|escalated).
        #[arg(long)]
        status: Option<String>,

        /// Keep only violations with at least this risk score.
        #[arg(long)]
        min_risk: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli.cmd {
        Commands::Scan {
            ref report_out,
            ref fail_on,
            max_violations,
        } => cmd_scan(&cli, report_out.clone(), fail_on.clone(), max_violations)?,
        Commands::Tables => cmd_tables(&cli)?,
        Commands::Violations {
            ref report,
            ref severity,
            ref category,
            ref rule_type,
            ref status,
            min_risk,
        } => cmd_violations(
            report.clone(),
            severity.clone(),
            category.clone(),
            rule_type.clone(),
            status.clone(),
            min_risk,
        )?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn overrides_from(cli: &Cli, fail_on: Option<String>, max_violations: Option<u32>) -> Overrides {
    Overrides {
        database: cli.database.clone(),
        rules: cli.rules.clone(),
        tables: cli.tables.clone(),
        fail_on,
        max_violations,
    }
}

fn read_config(cli: &Cli) -> String {
    // A missing config file is fine; defaults and CLI overrides apply.
    std::fs::read_to_string(&cli.config).unwrap_or_default()
}

fn cmd_scan(
    cli: &Cli,
    report_out: Utf8PathBuf,
    fail_on: Option<String>,
    max_violations: Option<u32>,
) -> anyhow::Result<i32> {
    let config_text = read_config(cli);
    let output = run_scan(ScanInput {
        config_text: &config_text,
        overrides: overrides_from(cli, fail_on, max_violations),
    })?;

    write_report(&report_out, &output.report)?;

    let summary = &output.report.summary;
    println!(
        "scan {}: {} violations ({} critical, {} high), {} diagnostics",
        output.report.data.scan_id,
        summary.total_violations,
        summary.critical_count,
        summary.high_count,
        output.report.data.diagnostics_total,
    );
    println!("report written to {report_out}");

    Ok(scan_exit_code(&output.report, output.resolved.fail_on))
}

fn cmd_tables(cli: &Cli) -> anyhow::Result<i32> {
    let config_text = read_config(cli);
    let cfg = if config_text.trim().is_empty() {
        dataguard_settings::DataguardConfigV1::default()
    } else {
        dataguard_settings::parse_config_toml(&config_text).context("parse config")?
    };
    let resolved = dataguard_settings::resolve_config(cfg, overrides_from(cli, None, None))
        .context("resolve config")?;
    let database = resolved.database.context(
        "no database configured (pass --database or set [database] in dataguard.toml)",
    )?;
    let backend = match database.kind {
        DatabaseKind::Sqlite => SqliteBackend::open(&database.path)?,
    };

    for table in backend.list_tables()? {
        match backend.table_schema(&table) {
            Ok(schema) => println!("{table}  ({} columns)", schema.columns.len()),
            Err(e) => println!("{table}  (schema unavailable: {e})"),
        }
    }
    Ok(0)
}

fn cmd_violations(
    report_path: Utf8PathBuf,
    severity: Option<String>,
    category: Option<String>,
    rule_type: Option<String>,
    status: Option<String>,
    min_risk: Option<f64>,
) -> anyhow::Result<i32> {
    let text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report {report_path}"))?;
    let report = parse_report_json(&text)?;

    let filter = ViolationFilter {
        severity: severity.as_deref().map(parse_severity).transpose()?,
        category,
        rule_type: rule_type.as_deref().map(parse_rule_type).transpose()?,
        status: status.as_deref().map(parse_status).transpose()?,
        min_risk_score: min_risk,
    };
    let matched = filter_violations(&report.violations, &filter);

    for v in &matched {
        let location = match (&v.column, &v.columns) {
            (Some(column), _) => format!("{}.{}", v.table, column),
            (None, Some(columns)) => format!("{}.[{}]", v.table, columns.join(", ")),
            (None, None) => v.table.clone(),
        };
        println!(
            "{:>7.2}  {:<8}  {:<24}  {:<40}  {}",
            v.risk_score,
            v.severity.as_str(),
            v.rule_type.as_str(),
            location,
            v.details,
        );
    }
    println!(
        "{} of {} violations matched",
        matched.len(),
        report.violations.len()
    );
    Ok(0)
}

fn parse_rule_type(v: &str) -> anyhow::Result<RuleType> {
    let parsed: RuleType = serde_json::from_value(serde_json::Value::String(v.to_string()))
        .context("parse rule type")?;
    // The serde fallback folds unknown names into Other; only accept the
    // literal spelling.
    if parsed == RuleType::Other && v != "other" {
        anyhow::bail!("unknown rule type: {v}");
    }
    Ok(parsed)
}

fn parse_status(v: &str) -> anyhow::Result<ViolationStatus> {
    serde_json::from_value(serde_json::Value::String(v.to_string())).map_err(|_| {
        anyhow::anyhow!("unknown status: {v} (expected open|confirmed|false_positive|escalated)")
    })
}
