//! SQLite-backed report store.
//!
//! Persists each report as one row: the specification split into plain
//! columns (name, description, grouping, chart type) plus JSON TEXT blobs
//! for filters, metrics and the result snapshot.
//!
//! # Ownership
//!
//! Every read and write is scoped to the owning user. A report that
//! exists but belongs to someone else fails with [`StoreError::Forbidden`],
//! which renders the exact same message as [`StoreError::NotFound`] so a
//! non-owner can never confirm that another user's report id exists.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Grouping;
use crate::exec::ResultSet;
use crate::model::{ChartType, ReportSpec};

/// Errors that can occur during report store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No report with this id.
    #[error("report not found: {0}")]
    NotFound(String),

    /// The report exists but the caller does not own it. Deliberately
    /// indistinguishable from `NotFound` in its rendered message.
    #[error("report not found: {0}")]
    Forbidden(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt report row: bad {0} value")]
    Corrupt(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A persisted report: specification plus the snapshot taken when it was
/// last computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub spec: ReportSpec,
    pub snapshot: ResultSet,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-view projection: spec filters and snapshot withheld.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub chart_type: ChartType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SQLite-backed report store.
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open or create the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS reports (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT,
                filters     TEXT NOT NULL,
                metrics     TEXT NOT NULL,
                group_by    TEXT NOT NULL,
                chart_type  TEXT NOT NULL,
                data        TEXT NOT NULL,
                created_by  TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reports_owner
                ON reports (created_by, updated_at);
            ",
        )?;
        Ok(())
    }

    /// Persist a freshly computed report and return it.
    pub fn create(
        &self,
        spec: &ReportSpec,
        snapshot: &ResultSet,
        owner: &str,
    ) -> StoreResult<Report> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        self.conn.execute(
            "INSERT INTO reports
                (id, name, description, filters, metrics, group_by, chart_type,
                 data, created_by, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                spec.name,
                spec.description,
                serde_json::to_string(&spec.filters)?,
                serde_json::to_string(&spec.metrics)?,
                spec.group_by.as_str(),
                spec.chart_type.as_str(),
                serde_json::to_string(snapshot)?,
                owner,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Report {
            id,
            spec: spec.clone(),
            snapshot: snapshot.clone(),
            created_by: owner.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace a report's specification and snapshot in one write.
    ///
    /// `created_by` and `created_at` never change; only `updated_at` is
    /// bumped. All-or-nothing: on any failure the stored row stands.
    pub fn recompute(
        &self,
        id: &str,
        spec: &ReportSpec,
        snapshot: &ResultSet,
        owner: &str,
    ) -> StoreResult<Report> {
        let created_at = self.check_owner(id, owner)?;
        let now = Utc::now();

        self.conn.execute(
            "UPDATE reports
             SET name = ?, description = ?, filters = ?, metrics = ?,
                 group_by = ?, chart_type = ?, data = ?, updated_at = ?
             WHERE id = ?",
            params![
                spec.name,
                spec.description,
                serde_json::to_string(&spec.filters)?,
                serde_json::to_string(&spec.metrics)?,
                spec.group_by.as_str(),
                spec.chart_type.as_str(),
                serde_json::to_string(snapshot)?,
                now.to_rfc3339(),
                id,
            ],
        )?;

        Ok(Report {
            id: id.to_string(),
            spec: spec.clone(),
            snapshot: snapshot.clone(),
            created_by: owner.to_string(),
            created_at,
            updated_at: now,
        })
    }

    /// Fetch a full report, ownership-checked.
    pub fn get(&self, id: &str, owner: &str) -> StoreResult<Report> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, name, description, filters, metrics, group_by,
                        chart_type, data, created_by, created_at, updated_at
                 FROM reports WHERE id = ?",
                params![id],
                |row| {
                    Ok(RawReport {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        filters: row.get(3)?,
                        metrics: row.get(4)?,
                        group_by: row.get(5)?,
                        chart_type: row.get(6)?,
                        data: row.get(7)?,
                        created_by: row.get(8)?,
                        created_at: row.get(9)?,
                        updated_at: row.get(10)?,
                    })
                },
            )
            .optional()?;

        let raw = raw.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if raw.created_by != owner {
            return Err(StoreError::Forbidden(id.to_string()));
        }
        raw.into_report()
    }

    /// List report summaries for an owner, most recently updated first.
    pub fn list_by_owner(&self, owner: &str) -> StoreResult<Vec<ReportSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, chart_type, created_at, updated_at
             FROM reports WHERE created_by = ?
             ORDER BY updated_at DESC, id",
        )?;

        let raw: Vec<(String, String, Option<String>, String, String, String)> = stmt
            .query_map(params![owner], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(id, name, description, chart_type, created_at, updated_at)| {
                Ok(ReportSummary {
                    id,
                    name,
                    description,
                    chart_type: ChartType::parse(&chart_type)
                        .ok_or(StoreError::Corrupt("chart_type"))?,
                    created_at: parse_timestamp(&created_at, "created_at")?,
                    updated_at: parse_timestamp(&updated_at, "updated_at")?,
                })
            })
            .collect()
    }

    /// Delete a report, ownership-checked. Deleting an absent id fails
    /// with `NotFound`, so a second delete of the same id is an error.
    pub fn delete(&self, id: &str, owner: &str) -> StoreResult<()> {
        self.check_owner(id, owner)?;
        self.conn
            .execute("DELETE FROM reports WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Resolve `NotFound` vs `Forbidden` for a write path and return the
    /// stored creation timestamp.
    fn check_owner(&self, id: &str, owner: &str) -> StoreResult<DateTime<Utc>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT created_by, created_at FROM reports WHERE id = ?",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (created_by, created_at) = row.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if created_by != owner {
            return Err(StoreError::Forbidden(id.to_string()));
        }
        parse_timestamp(&created_at, "created_at")
    }
}

struct RawReport {
    id: String,
    name: String,
    description: Option<String>,
    filters: String,
    metrics: String,
    group_by: String,
    chart_type: String,
    data: String,
    created_by: String,
    created_at: String,
    updated_at: String,
}

impl RawReport {
    fn into_report(self) -> StoreResult<Report> {
        let spec = ReportSpec {
            name: self.name,
            description: self.description,
            filters: serde_json::from_str(&self.filters)?,
            metrics: serde_json::from_str(&self.metrics)?,
            group_by: Grouping::parse(&self.group_by).ok_or(StoreError::Corrupt("group_by"))?,
            chart_type: ChartType::parse(&self.chart_type)
                .ok_or(StoreError::Corrupt("chart_type"))?,
        };
        Ok(Report {
            id: self.id,
            spec,
            snapshot: serde_json::from_str(&self.data)?,
            created_by: self.created_by,
            created_at: parse_timestamp(&self.created_at, "created_at")?,
            updated_at: parse_timestamp(&self.updated_at, "updated_at")?,
        })
    }
}

fn parse_timestamp(s: &str, column: &'static str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt(column))
}
