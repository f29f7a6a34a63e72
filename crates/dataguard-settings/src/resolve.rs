use crate::model::DataguardConfigV1;
use anyhow::Context;
use dataguard_types::Severity;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub database: Option<String>,
    pub rules: Option<String>,
    pub tables: Vec<String>,
    pub fail_on: Option<String>,
    pub max_violations: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDatabase {
    pub kind: DatabaseKind,
    pub path: String,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// `None` only for use cases that never touch a store (report filtering).
    pub database: Option<ResolvedDatabase>,
    /// `None` scans every table the backend lists.
    pub tables: Option<Vec<String>>,
    pub rules_path: Option<String>,
    pub fail_on: Option<Severity>,
    pub max_violations: usize,
}

pub fn parse_config_toml(text: &str) -> anyhow::Result<DataguardConfigV1> {
    toml::from_str(text).context("parse dataguard.toml")
}

pub fn resolve_config(
    cfg: DataguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let path = overrides
        .database
        .or_else(|| cfg.database.as_ref().and_then(|db| db.path.clone()));
    let kind = cfg
        .database
        .as_ref()
        .and_then(|db| db.kind.as_deref())
        .unwrap_or("sqlite");
    let database = match path {
        Some(path) => Some(ResolvedDatabase {
            kind: parse_database_kind(kind)?,
            path,
        }),
        None => None,
    };

    let tables: Vec<String> = if overrides.tables.is_empty() {
        cfg.tables
    } else {
        overrides.tables
    };

    let fail_on = overrides
        .fail_on
        .or(cfg.fail_on)
        .as_deref()
        .map(parse_severity)
        .transpose()?;

    Ok(ResolvedConfig {
        database,
        tables: if tables.is_empty() { None } else { Some(tables) },
        rules_path: overrides.rules.or(cfg.rules),
        fail_on,
        max_violations: overrides
            .max_violations
            .or(cfg.max_violations)
            .unwrap_or(200) as usize,
    })
}

fn parse_database_kind(v: &str) -> anyhow::Result<DatabaseKind> {
    match v {
        "sqlite" => Ok(DatabaseKind::Sqlite),
        other => anyhow::bail!("unsupported database kind: {other} (expected 'sqlite')"),
    }
}

pub fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "low" => Ok(Severity::Low),
        "medium" => Ok(Severity::Medium),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        other => anyhow::bail!("unknown severity: {other} (expected low|medium|high|critical)"),
    }
}
