//! Query executor - one round-trip against the stats data source.
//!
//! The executor holds the data-source handle it was constructed with;
//! nothing here reaches for ambient connection state. A store-level
//! failure wraps into [`ExecError`], whose message carries no query text.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::sql::BuiltQuery;

/// Failure while running a report query against the data source.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("report query failed")]
    Query(#[from] rusqlite::Error),
}

pub type ExecResult<T> = Result<T, ExecError>;

/// An executed result: column names in select-list order, rows in query
/// order. This is the snapshot shape persisted with a report; keeping
/// columns separate from row values preserves column order through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ResultSet {
    /// Position of a column by output alias.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Runs built queries against an injected SQLite connection.
pub struct QueryExecutor {
    conn: Connection,
}

impl QueryExecutor {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Execute the query and materialize every row.
    pub fn run(&self, query: &BuiltQuery) -> ExecResult<ResultSet> {
        let mut stmt = self.conn.prepare(&query.sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query(rusqlite::params_from_iter(query.params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(json_value(row.get_ref(i)?));
            }
            out.push(values);
        }

        Ok(ResultSet {
            columns,
            rows: out,
        })
    }
}

fn json_value(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => {
            // NaN/inf have no JSON representation
            serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)
        }
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}
