//! # Touchline
//!
//! An analytics engine for squad performance data: it turns a declarative
//! report specification into a parameterized aggregation query, executes
//! it against the stats tables, and persists the specification together
//! with a result snapshot.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        ReportSpec (filters, metrics, grouping)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model - validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Validated specification                     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [catalog + sql - query builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │          BuiltQuery (SQL text + parameters)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [exec - one round-trip]
//! ┌─────────────────────────────────────────────────────────┐
//! │              ResultSet (snapshot rows)                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [store - owner-scoped persistence]
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Report                              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is driven by [`service::ReportingService`]; each request
//! runs it straight through or fails fast at the first error.

pub mod catalog;
pub mod config;
pub mod exec;
pub mod model;
pub mod service;
pub mod sql;
pub mod store;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{AggFunc, AggregateExpr, Grouping, Metric};
    pub use crate::exec::{ExecError, QueryExecutor, ResultSet};
    pub use crate::model::{
        ChartType, Position, ReportFilters, ReportSpec, ValidationError,
    };
    pub use crate::service::{ReportError, ReportResult, ReportingService};
    pub use crate::sql::{build_report_query, BuiltQuery, SqlValue, SqlWriter};
    pub use crate::store::{Report, ReportStore, ReportSummary, StoreError};
}

pub use catalog::{Grouping, Metric};
pub use model::ReportSpec;
pub use service::ReportingService;
