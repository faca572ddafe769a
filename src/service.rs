//! Reporting service - the straight-line pipeline over the engine.
//!
//! ```text
//! spec → validate → build → execute → persist → Report
//! ```
//!
//! Each request runs to completion or fails at the first error; nothing
//! is retried. The query execution and the store write are deliberately
//! not wrapped in a cross-step transaction: a crash between the two
//! leaves the previous snapshot (if any) intact, which is the accepted
//! consistency point for recompute.

use crate::exec::{ExecError, QueryExecutor, ResultSet};
use crate::model::{ReportSpec, ValidationError};
use crate::sql::build_report_query;
use crate::store::{Report, ReportStore, ReportSummary, StoreError};

/// Errors surfaced by the reporting service.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Bad specification shape; the caller can correct and resubmit.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Missing report, ownership failure or persistence failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Data-source failure while computing the report. The message never
    /// includes the query text.
    #[error("{0}")]
    Execution(#[from] ExecError),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Orchestrates validation, query building, execution and persistence.
pub struct ReportingService {
    executor: QueryExecutor,
    store: ReportStore,
}

impl ReportingService {
    pub fn new(executor: QueryExecutor, store: ReportStore) -> Self {
        Self { executor, store }
    }

    /// Validate, compute and persist a new report for `owner`.
    pub fn create_report(&self, spec: &ReportSpec, owner: &str) -> ReportResult<Report> {
        let snapshot = self.compute(spec)?;
        Ok(self.store.create(spec, &snapshot, owner)?)
    }

    /// Recompute an existing report with a (possibly changed)
    /// specification, replacing its snapshot.
    pub fn recompute_report(
        &self,
        id: &str,
        spec: &ReportSpec,
        owner: &str,
    ) -> ReportResult<Report> {
        let snapshot = self.compute(spec)?;
        Ok(self.store.recompute(id, spec, &snapshot, owner)?)
    }

    pub fn get_report(&self, id: &str, owner: &str) -> ReportResult<Report> {
        Ok(self.store.get(id, owner)?)
    }

    pub fn list_reports(&self, owner: &str) -> ReportResult<Vec<ReportSummary>> {
        Ok(self.store.list_by_owner(owner)?)
    }

    pub fn delete_report(&self, id: &str, owner: &str) -> ReportResult<()> {
        Ok(self.store.delete(id, owner)?)
    }

    /// Shared validate → build → execute prefix of create and recompute.
    fn compute(&self, spec: &ReportSpec) -> ReportResult<ResultSet> {
        spec.validate()?;
        let query = build_report_query(&spec.filters, &spec.metrics, spec.group_by);
        Ok(self.executor.run(&query)?)
    }
}
