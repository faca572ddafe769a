//! Query builder - compile a specification into parameterized SQL.
//!
//! The builder is a pure function over `(filters, metrics, grouping)`:
//! identical inputs yield byte-identical SQL and the same parameter
//! order. Clause text only ever comes from the catalog's fixed tables;
//! every caller-supplied value is bound as a `?` parameter through
//! [`SqlWriter`], which appends (fragment, parameter) pairs and joins
//! them at the end. Nothing is string-interpolated into the query.

use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::ToSql;

use crate::catalog::{Grouping, Metric};
use crate::model::ReportFilters;

/// A value bound into the query at a `?` placeholder.
///
/// Dates are ISO-8601, uuids hyphenated lowercase, positions lowercase;
/// everything binds as TEXT, which is how the stats tables store these
/// columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Text(s) => Ok(ToSqlOutput::Owned(Value::Text(s.clone()))),
        }
    }
}

/// A finished query: SQL text plus positionally matched parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

// =============================================================================
// SqlWriter
// =============================================================================

/// Accumulates SQL fragments and bound parameters in lockstep.
#[derive(Debug, Default)]
#[must_use = "builders have no effect until used"]
pub struct SqlWriter {
    sql: String,
    params: Vec<SqlValue>,
    predicates: usize,
}

impl SqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixed fragment. Callers must only pass catalog-derived or
    /// literal text, never caller-supplied strings.
    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Append a single-value predicate. `fragment` must contain exactly
    /// one `?` placeholder.
    pub fn predicate(&mut self, fragment: &str, value: SqlValue) -> &mut Self {
        self.begin_predicate();
        self.sql.push_str(fragment);
        self.params.push(value);
        self
    }

    /// Append an `IN (?, ...)` predicate with one placeholder per value.
    /// Empty value lists must be filtered out by the caller beforehand.
    pub fn predicate_in(&mut self, column: &str, values: Vec<SqlValue>) -> &mut Self {
        debug_assert!(!values.is_empty());
        self.begin_predicate();
        self.sql.push_str(column);
        self.sql.push_str(" IN (");
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.sql.push('?');
            self.params.push(value);
        }
        self.sql.push(')');
        self
    }

    fn begin_predicate(&mut self) {
        if self.predicates == 0 {
            self.sql.push_str(" WHERE ");
        } else {
            self.sql.push_str(" AND ");
        }
        self.predicates += 1;
    }

    pub fn finish(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

// =============================================================================
// Report query
// =============================================================================

/// Fixed join graph: stat fact rows against the player, match and team
/// dimension tables.
const FROM_CLAUSE: &str = " FROM match_stats ms \
JOIN players p ON ms.player_id = p.id \
JOIN matches m ON ms.match_id = m.id \
JOIN teams t ON p.team_id = t.id";

/// Build the aggregation query for one report.
///
/// Repeated metric identifiers are de-duplicated preserving first-seen
/// order, so a metric contributes its aggregate columns exactly once.
/// Filter predicates are appended in a fixed field order (date-from,
/// date-to, teams, players, positions, competitions, season); absent
/// fields contribute neither text nor parameters.
pub fn build_report_query(
    filters: &ReportFilters,
    metrics: &[Metric],
    grouping: Grouping,
) -> BuiltQuery {
    let mut w = SqlWriter::new();

    w.push("SELECT ").push(grouping.select_columns());
    for metric in dedup_metrics(metrics) {
        for expr in metric.expand() {
            w.push(", ");
            w.push(expr.function.sql());
            w.push("(ms.");
            w.push(expr.source_column);
            w.push(") AS ");
            w.push(expr.output_alias);
        }
    }

    w.push(FROM_CLAUSE);

    if let Some((start, end)) = filters.date_range {
        w.predicate("m.match_date >= ?", SqlValue::Text(start.to_string()));
        w.predicate("m.match_date <= ?", SqlValue::Text(end.to_string()));
    }
    if !filters.team_ids.is_empty() {
        let ids = filters
            .team_ids
            .iter()
            .map(|id| SqlValue::Text(id.to_string()))
            .collect();
        w.predicate_in("p.team_id", ids);
    }
    if !filters.player_ids.is_empty() {
        let ids = filters
            .player_ids
            .iter()
            .map(|id| SqlValue::Text(id.to_string()))
            .collect();
        w.predicate_in("ms.player_id", ids);
    }
    if !filters.positions.is_empty() {
        let positions = filters
            .positions
            .iter()
            .map(|p| SqlValue::Text(p.as_str().to_string()))
            .collect();
        w.predicate_in("p.position", positions);
    }
    if !filters.competitions.is_empty() {
        let competitions = filters
            .competitions
            .iter()
            .map(|c| SqlValue::Text(c.clone()))
            .collect();
        w.predicate_in("m.competition", competitions);
    }
    if let Some(season) = &filters.season {
        w.predicate("m.season = ?", SqlValue::Text(season.clone()));
    }

    w.push(" GROUP BY ").push(grouping.group_by());
    w.push(" ORDER BY ").push(grouping.order_by());

    w.finish()
}

/// First-seen-order de-duplication of the metric list.
fn dedup_metrics(metrics: &[Metric]) -> Vec<Metric> {
    let mut seen = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        if !seen.contains(&metric) {
            seen.push(metric);
        }
    }
    seen
}
