//! Shared test utilities for the dataguard workspace.
//!
//! This crate exists because the domain, app, and CLI crates all need the
//! same two things in their tests: a backend double whose query behavior is
//! scripted per test, and a seeded demo SQLite database for end-to-end runs.

use dataguard_backend::{Backend, BackendError, Row};
use dataguard_types::{ColumnInfo, TableSchema};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

/// A backend double with scripted query behavior.
///
/// Queries are matched by substring needles: the first `fail` entry whose
/// needles all appear in the SQL errors, then the first `respond` entry
/// whose needles all appear returns its rows, and anything unmatched
/// returns no rows (counts read as zero).
#[derive(Default)]
pub struct ScriptedBackend {
    tables: BTreeMap<String, TableSchema>,
    samples: BTreeMap<String, Vec<Row>>,
    responses: Vec<(Vec<String>, Vec<Row>)>,
    failures: Vec<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        ScriptedBackend::default()
    }

    /// Register a table of nullable TEXT columns.
    pub fn with_table(mut self, table: &str, columns: &[&str]) -> Self {
        self.tables.insert(
            table.to_string(),
            TableSchema {
                table_name: table.to_string(),
                columns: columns
                    .iter()
                    .map(|name| ColumnInfo {
                        name: name.to_string(),
                        data_type: "TEXT".to_string(),
                        nullable: true,
                    })
                    .collect(),
                primary_key: Vec::new(),
                indexes: Vec::new(),
            },
        );
        self
    }

    pub fn with_samples(mut self, table: &str, rows: Vec<Row>) -> Self {
        self.samples.insert(table.to_string(), rows);
        self
    }

    pub fn respond(mut self, needles: &[&str], rows: Vec<Row>) -> Self {
        self.responses
            .push((needles.iter().map(|n| n.to_string()).collect(), rows));
        self
    }

    pub fn fail(mut self, needles: &[&str]) -> Self {
        self.failures
            .push(needles.iter().map(|n| n.to_string()).collect());
        self
    }
}

impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn table_schema(&self, table: &str) -> Result<TableSchema, BackendError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| BackendError::UnknownTable(table.to_string()))
    }

    fn query(&self, sql: &str, _params: &[JsonValue]) -> Result<Vec<Row>, BackendError> {
        for needles in &self.failures {
            if needles.iter().all(|n| sql.contains(n.as_str())) {
                return Err(BackendError::Query(format!("scripted failure for: {sql}")));
            }
        }
        for (needles, rows) in &self.responses {
            if needles.iter().all(|n| sql.contains(n.as_str())) {
                return Ok(rows.clone());
            }
        }
        Ok(Vec::new())
    }

    fn sample(&self, table: &str, limit: u32) -> Result<Vec<Row>, BackendError> {
        let rows = self.samples.get(table).cloned().unwrap_or_default();
        Ok(rows.into_iter().take(limit as usize).collect())
    }
}

pub fn row(entries: &[(&str, JsonValue)]) -> Row {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Single-column rows, as returned by the per-column sampling queries.
pub fn value_rows(column: &str, values: &[&str]) -> Vec<Row> {
    values
        .iter()
        .map(|v| row(&[(column, JsonValue::String(v.to_string()))]))
        .collect()
}

/// The one-row result of a `COUNT(*) AS count` query.
pub fn count_rows(count: u64) -> Vec<Row> {
    vec![row(&[("count", JsonValue::from(count))])]
}

/// An ISO date `days` days in the past, for seeding age/retention fixtures
/// that stay valid as the clock moves.
pub fn days_ago(days: i64) -> String {
    let date = (OffsetDateTime::now_utc() - Duration::days(days)).date();
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Seed a demo database with the kind of data the scanner is built to flag:
/// plaintext secrets, unmasked contact data, stale orders, a minor's birth
/// date, EU country codes, and a table without audit columns.
pub fn seed_demo_database(path: &str) -> Result<(), rusqlite::Error> {
    let conn = rusqlite::Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE users (
             id INTEGER PRIMARY KEY,
             email TEXT NOT NULL,
             phone TEXT,
             password TEXT,
             ssn TEXT,
             birth_date TEXT,
             country TEXT,
             created_at TEXT
         );
         CREATE TABLE orders (
             id INTEGER PRIMARY KEY,
             user_id INTEGER,
             amount REAL,
             created_at TEXT
         );
         CREATE TABLE cache_entries (
             cache_key TEXT PRIMARY KEY,
             payload TEXT
         );",
    )?;

    let insert_user = "INSERT INTO users (email, phone, password, ssn, birth_date, country, created_at) \
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
    conn.execute(
        insert_user,
        rusqlite::params![
            "alice@example.com",
            "555-123-4567",
            "hunter2",
            "123456789",
            days_ago(12 * 365),
            "DE",
            days_ago(400),
        ],
    )?;
    conn.execute(
        insert_user,
        rusqlite::params![
            "***@example.com",
            "555-9876",
            "$2b$12$LJ3m4yuT0Jrhsha3BlaZgOY6kyBnRJqzXiJmVkNqt8zFO1vi0DpGq",
            "hashed-ssn-value",
            days_ago(30 * 365),
            "FR",
            days_ago(10),
        ],
    )?;

    let insert_order = "INSERT INTO orders (user_id, amount, created_at) VALUES (?1, ?2, ?3)";
    conn.execute(insert_order, rusqlite::params![1, 19.99, days_ago(400)])?;
    conn.execute(insert_order, rusqlite::params![2, 5.50, days_ago(10)])?;

    conn.execute(
        "INSERT INTO cache_entries (cache_key, payload) VALUES ('greeting', 'hello')",
        [],
    )?;
    Ok(())
}
