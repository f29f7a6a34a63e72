//! End-to-end scans against a seeded SQLite database.

use assert_cmd::Command;
use dataguard_test_util::seed_demo_database;
use predicates::prelude::*;
use std::path::Path;

const RULES: &str = r#"[
  {
    "id": "r-ret",
    "type": "data_retention",
    "text": "Order records may be retained for at most 90 days",
    "entities": ["orders.created_at"],
    "retention_value": 90,
    "retention_unit": "days"
  },
  {
    "id": "r-enc",
    "type": "data_encryption",
    "text": "Sensitive personal data must be encrypted at rest"
  },
  {
    "id": "r-mask",
    "type": "data_masking",
    "text": "Contact details must be masked in analytical stores"
  },
  {
    "id": "r-acc",
    "type": "data_access",
    "text": "Access to credential data must be restricted",
    "entities": ["users.password"]
  },
  {
    "id": "r-age",
    "type": "age_restriction",
    "text": "Users must be at least 18 years old"
  },
  {
    "id": "r-geo",
    "type": "geographic_restriction",
    "text": "EU customer data must remain in the EU"
  },
  {
    "id": "r-audit",
    "type": "audit_logging",
    "text": "All tables must carry audit columns",
    "entities": ["cache_entries.payload"]
  },
  {
    "id": "r-con",
    "type": "consent",
    "text": "Marketing contact requires recorded consent",
    "sql_condition": "marketing_opt_in = 0"
  }
]"#;

fn setup(dir: &Path) {
    seed_demo_database(dir.join("demo.db").to_str().expect("utf8 path")).expect("seed demo db");
    std::fs::write(dir.join("rules.json"), RULES).expect("write rules");
}

fn dataguard() -> Command {
    Command::cargo_bin("dataguard").expect("binary built")
}

fn read_report(dir: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(dir.join("report.json")).expect("read report");
    serde_json::from_str(&text).expect("parse report")
}

fn count_by_type(report: &serde_json::Value, rule_type: &str) -> usize {
    report["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .filter(|v| v["rule_type"] == rule_type)
        .count()
}

#[test]
fn scan_finds_expected_violations_in_demo_database() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());

    dataguard()
        .current_dir(tmp.path())
        .args([
            "--database",
            "demo.db",
            "--rules",
            "rules.json",
            "scan",
            "--report-out",
            "report.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("violations"))
        .stdout(predicate::str::contains("report written to report.json"));

    let report = read_report(tmp.path());
    assert_eq!(report["schema"], "dataguard.scan.v1");
    assert_eq!(report["tool"]["name"], "dataguard");

    // users.birth_date + users.created_at + orders.created_at
    assert_eq!(count_by_type(&report, "data_retention"), 3);
    // orders holds one stale row and one recent row; only the stale one counts.
    let orders_retention = report["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .find(|v| v["rule_type"] == "data_retention" && v["table"] == "orders")
        .expect("orders retention violation");
    assert_eq!(orders_retention["column"], "created_at");
    assert_eq!(orders_retention["violation_count"], 1);
    // users.password (plaintext) + users.ssn (9-digit)
    assert_eq!(count_by_type(&report, "data_encryption"), 2);
    // users.email (bare) + users.phone (10 digits)
    assert_eq!(count_by_type(&report, "data_masking"), 2);
    // one composite hit for users
    assert_eq!(count_by_type(&report, "data_access"), 1);
    // one minor in users.birth_date
    assert_eq!(count_by_type(&report, "age_restriction"), 1);
    // users.country surfaces for review
    assert_eq!(count_by_type(&report, "geographic_restriction"), 1);
    // cache_entries has no audit columns
    assert_eq!(count_by_type(&report, "audit_logging"), 1);

    assert_eq!(report["data"]["hits_total"], 11);
    assert_eq!(report["data"]["violations_total"], 11);
    assert_eq!(report["data"]["violations_emitted"], 11);
    // The consent predicate fails on every table: three diagnostics, zero
    // dropped hits.
    assert_eq!(report["data"]["diagnostics_total"], 3);
    assert_eq!(report["diagnostics"].as_array().expect("diagnostics").len(), 3);
}

#[test]
fn report_is_ranked_and_scored() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());

    dataguard()
        .current_dir(tmp.path())
        .args([
            "--database",
            "demo.db",
            "--rules",
            "rules.json",
            "scan",
            "--report-out",
            "report.json",
        ])
        .assert()
        .success();

    let report = read_report(tmp.path());
    let violations = report["violations"].as_array().expect("violations");

    let scores: Vec<f64> = violations
        .iter()
        .map(|v| v["risk_score"].as_f64().expect("risk score"))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "ranked descending");
    assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    assert_eq!(scores[0], 100.0);

    let access = violations
        .iter()
        .find(|v| v["rule_type"] == "data_access")
        .expect("access violation");
    assert_eq!(access["requires_review"], true);
    assert_eq!(access["columns"], serde_json::json!(["password", "ssn"]));
    assert_eq!(access["severity"], "high");

    let audit = violations
        .iter()
        .find(|v| v["rule_type"] == "audit_logging")
        .expect("audit violation");
    assert_eq!(audit["severity"], "low");
    assert_eq!(audit["risk_score"], 25.0);

    // Present-but-unpopulated, for the downstream explanation stage.
    assert!(violations.iter().all(|v| v["explanation"].is_null()));
    assert!(violations.iter().all(|v| v["remediation"].is_null()));
    assert!(violations.iter().all(|v| v["status"] == "open"));
}

#[test]
fn fail_on_threshold_controls_exit_code() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());

    dataguard()
        .current_dir(tmp.path())
        .args([
            "--database",
            "demo.db",
            "--rules",
            "rules.json",
            "scan",
            "--fail-on",
            "high",
        ])
        .assert()
        .code(2);

    // Nothing in the demo data escalates to critical (all counts are small).
    dataguard()
        .current_dir(tmp.path())
        .args([
            "--database",
            "demo.db",
            "--rules",
            "rules.json",
            "scan",
            "--fail-on",
            "critical",
        ])
        .assert()
        .success();
}

#[test]
fn explicit_table_subset_skips_unknown_tables() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());

    dataguard()
        .current_dir(tmp.path())
        .args([
            "--database",
            "demo.db",
            "--rules",
            "rules.json",
            "--tables",
            "users,ghosts",
            "scan",
            "--report-out",
            "report.json",
        ])
        .assert()
        .success();

    let report = read_report(tmp.path());
    assert_eq!(report["data"]["tables_scanned"], serde_json::json!(["users"]));
    assert_eq!(count_by_type(&report, "audit_logging"), 0);
}

#[test]
fn violations_subcommand_filters_an_existing_report() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());

    dataguard()
        .current_dir(tmp.path())
        .args([
            "--database",
            "demo.db",
            "--rules",
            "rules.json",
            "scan",
            "--report-out",
            "report.json",
        ])
        .assert()
        .success();

    // Only the two masking hits are medium.
    dataguard()
        .current_dir(tmp.path())
        .args([
            "violations",
            "--report",
            "report.json",
            "--severity",
            "medium",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 11 violations matched"))
        .stdout(predicate::str::contains("data_masking"));

    dataguard()
        .current_dir(tmp.path())
        .args([
            "violations",
            "--report",
            "report.json",
            "--rule-type",
            "bogus_type",
        ])
        .assert()
        .failure();
}

#[test]
fn tables_subcommand_lists_the_store() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());

    dataguard()
        .current_dir(tmp.path())
        .args(["--database", "demo.db", "tables"])
        .assert()
        .success()
        .stdout(predicate::str::contains("users  (8 columns)"))
        .stdout(predicate::str::contains("cache_entries  (2 columns)"));
}

#[test]
fn scan_without_database_fails_with_connection_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::write(tmp.path().join("rules.json"), RULES).expect("write rules");

    dataguard()
        .current_dir(tmp.path())
        .args(["--rules", "rules.json", "scan"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no database configured"));
}

#[test]
fn config_file_supplies_defaults() {
    let tmp = tempfile::tempdir().expect("tempdir");
    setup(tmp.path());
    std::fs::write(
        tmp.path().join("dataguard.toml"),
        r#"
schema = "dataguard.config.v1"
rules = "rules.json"
tables = ["cache_entries"]

[database]
kind = "sqlite"
path = "demo.db"
"#,
    )
    .expect("write config");

    dataguard()
        .current_dir(tmp.path())
        .args(["scan", "--report-out", "report.json"])
        .assert()
        .success();

    let report = read_report(tmp.path());
    assert_eq!(
        report["data"]["tables_scanned"],
        serde_json::json!(["cache_entries"])
    );
    assert_eq!(count_by_type(&report, "audit_logging"), 1);
}
