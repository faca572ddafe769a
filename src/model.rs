//! Report specification types and validation.
//!
//! A `ReportSpec` is the declarative input to the engine: filters, an
//! ordered metric list, a grouping axis and a chart type. Specifications
//! arrive as camelCase JSON from the surrounding CRUD layer and are
//! validated here before any SQL is built.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Grouping, Metric};

/// Errors for a malformed or out-of-vocabulary specification.
///
/// All of these are recoverable: the caller fixes the specification and
/// resubmits.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("report name must be between 1 and 100 characters")]
    InvalidName,

    #[error("report description must be at most 500 characters")]
    DescriptionTooLong,

    #[error("at least one metric required")]
    NoMetrics,

    #[error("season must match YYYY-YYYY, got: {0}")]
    InvalidSeason(String),

    #[error("date range start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid report specification: {0}")]
    Malformed(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

static SEASON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{4}$").unwrap());

// =============================================================================
// Filters
// =============================================================================

/// Player position, stored lowercase in the stats tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }
}

/// Structured predicate set narrowing which stat rows contribute.
///
/// Every field is optional; an absent field contributes no predicate and
/// no bound parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFilters {
    /// Inclusive `[start, end]` window over the match date.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub team_ids: Vec<Uuid>,
    pub player_ids: Vec<Uuid>,
    pub positions: Vec<Position>,
    pub competitions: Vec<String>,
    /// Season label, e.g. `2024-2025`.
    pub season: Option<String>,
}

// =============================================================================
// Specification
// =============================================================================

/// How the dashboard renders the result. Never affects query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    Table,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Table => "table",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "bar" => ChartType::Bar,
            "line" => ChartType::Line,
            "pie" => ChartType::Pie,
            "scatter" => ChartType::Scatter,
            "table" => ChartType::Table,
            _ => return None,
        })
    }
}

/// A report specification: the full declarative input for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filters: ReportFilters,
    pub metrics: Vec<Metric>,
    pub group_by: Grouping,
    pub chart_type: ChartType,
}

impl ReportSpec {
    /// Parse a specification from JSON.
    ///
    /// Out-of-vocabulary identifiers (unknown metric, grouping or chart
    /// type) fail enum deserialization and surface as `Malformed`, which
    /// keeps unsupported identifiers out of the typed specification
    /// entirely.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Check shape constraints that the type system cannot enforce.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() || self.name.chars().count() > 100 {
            return Err(ValidationError::InvalidName);
        }
        if let Some(desc) = &self.description {
            if desc.chars().count() > 500 {
                return Err(ValidationError::DescriptionTooLong);
            }
        }
        if self.metrics.is_empty() {
            return Err(ValidationError::NoMetrics);
        }
        if let Some(season) = &self.filters.season {
            if !SEASON_RE.is_match(season) {
                return Err(ValidationError::InvalidSeason(season.clone()));
            }
        }
        if let Some((start, end)) = self.filters.date_range {
            if start > end {
                return Err(ValidationError::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }
}
