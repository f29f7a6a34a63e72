use anyhow::Context;
use camino::Utf8Path;
use dataguard_types::{ScanReport, SCHEMA_SCAN_REPORT_V1};

pub fn parse_report_json(text: &str) -> anyhow::Result<ScanReport> {
    let report: ScanReport = serde_json::from_str(text).context("parse scan report json")?;
    if report.schema != SCHEMA_SCAN_REPORT_V1 {
        anyhow::bail!(
            "unknown report schema: {} (expected {SCHEMA_SCAN_REPORT_V1})",
            report.schema
        );
    }
    Ok(report)
}

pub fn serialize_report(report: &ScanReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize scan report")
}

pub fn write_report(path: &Utf8Path, report: &ScanReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {parent}"))?;
    }
    let bytes = serialize_report(report)?;
    std::fs::write(path, bytes).with_context(|| format!("write report {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataguard_types::{ScanData, ToolMeta, ViolationSummary};
    use time::OffsetDateTime;

    fn report() -> ScanReport {
        ScanReport {
            schema: SCHEMA_SCAN_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "dataguard".to_string(),
                version: "0.0.0".to_string(),
            },
            started_at: OffsetDateTime::UNIX_EPOCH,
            finished_at: OffsetDateTime::UNIX_EPOCH,
            data: ScanData::default(),
            violations: Vec::new(),
            diagnostics: Vec::new(),
            summary: ViolationSummary::default(),
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let original = report();
        let bytes = serialize_report(&original).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let mut bad = report();
        bad.schema = "someone.elses.report.v9".to_string();
        let text = String::from_utf8(serialize_report(&bad).expect("serialize")).expect("utf8");
        assert!(parse_report_json(&text).is_err());
    }

    #[test]
    fn write_report_creates_parent_directories() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = camino::Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let out = root.join("artifacts/dataguard/report.json");

        write_report(&out, &report()).expect("write");
        assert!(out.exists());
    }
}
