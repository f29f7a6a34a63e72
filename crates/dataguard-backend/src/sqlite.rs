use crate::{BackendError, Backend, Row, quote_ident};
use dataguard_types::{ColumnInfo, IndexInfo, TableSchema};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use serde_json::Value as JsonValue;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// SQLite-backed access port.
///
/// The connection is serialized through a mutex; scan workers share one
/// `SqliteBackend` across threads.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    name: String,
}

impl SqliteBackend {
    pub fn open(path: &str) -> Result<Self, BackendError> {
        let conn = Connection::open(path).map_err(|e| BackendError::Open {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        // Probe the connection before handing it to the scanner.
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| BackendError::Open {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        info!(path, "connected to sqlite database");
        Ok(SqliteBackend {
            conn: Mutex::new(conn),
            name: "sqlite".to_string(),
        })
    }

    pub fn open_in_memory() -> Result<Self, BackendError> {
        let conn = Connection::open_in_memory().map_err(|e| BackendError::Open {
            path: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        Ok(SqliteBackend {
            conn: Mutex::new(conn),
            name: "sqlite".to_string(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(e: rusqlite::Error) -> Self {
        BackendError::Query(e.to_string())
    }
}

impl Backend for SqliteBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn table_schema(&self, table: &str) -> Result<TableSchema, BackendError> {
        let conn = self.lock();

        let mut stmt = conn.prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let mut columns = Vec::new();
        let mut pk_columns: Vec<(i64, String)> = Vec::new();
        let mut rows = stmt.query([table])?;
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let data_type: String = row.get(1)?;
            let not_null: i64 = row.get(2)?;
            let pk: i64 = row.get(3)?;
            if pk > 0 {
                pk_columns.push((pk, name.clone()));
            }
            columns.push(ColumnInfo {
                name,
                data_type,
                nullable: not_null == 0,
            });
        }
        drop(rows);
        drop(stmt);

        if columns.is_empty() {
            return Err(BackendError::UnknownTable(table.to_string()));
        }
        pk_columns.sort_by_key(|(pk, _)| *pk);

        let mut indexes = Vec::new();
        let mut list = conn.prepare("SELECT name, \"unique\" FROM pragma_index_list(?1)")?;
        let index_heads = list
            .query_map([table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(list);
        for (index_name, unique) in index_heads {
            let mut info = conn.prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
            let index_columns = info
                .query_map([index_name.as_str()], |row| {
                    row.get::<_, Option<String>>(0)
                })?
                .collect::<Result<Vec<_>, _>>()?;
            indexes.push(IndexInfo {
                name: index_name,
                columns: index_columns.into_iter().flatten().collect(),
                unique: unique != 0,
            });
        }

        Ok(TableSchema {
            table_name: table.to_string(),
            columns,
            primary_key: pk_columns.into_iter().map(|(_, name)| name).collect(),
            indexes,
        })
    }

    fn query(&self, sql: &str, params: &[JsonValue]) -> Result<Vec<Row>, BackendError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let sql_params: Vec<SqlValue> = params.iter().map(json_to_sql).collect();
        let mut rows = stmt.query(params_from_iter(sql_params))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = Row::new();
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), value_ref_to_json(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }

    fn sample(&self, table: &str, limit: u32) -> Result<Vec<Row>, BackendError> {
        let sql = format!("SELECT * FROM {} LIMIT {limit}", quote_ident(table));
        self.query(&sql, &[])
    }
}

fn json_to_sql(value: &JsonValue) -> SqlValue {
    match value {
        JsonValue::Null => SqlValue::Null,
        JsonValue::Bool(b) => SqlValue::Integer(*b as i64),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else {
                SqlValue::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        JsonValue::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn value_ref_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => JsonValue::String(String::from_utf8_lossy(b).into_owned()),
    }
}
