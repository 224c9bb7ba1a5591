//! The migration pipeline: read, map, aggregate, write.

pub mod aggregate;
pub mod dates;
pub mod mapper;
pub mod reader;
pub mod sprint;
pub mod writer;

use std::fmt::Write as _;

use anyhow::Result;

use crate::model::target::{IssueState, TargetIssueRecord};
use crate::providers::{IssueSource, IssueTarget};
use aggregate::{aggregate, Aggregate};
use mapper::FieldMapper;
use writer::{TargetWriter, WriteReport};

/// Mapped issues plus what must exist on GitHub before they can be created.
#[derive(Debug)]
pub struct Plan {
    pub issues: Vec<TargetIssueRecord>,
    pub aggregate: Aggregate,
}

/// Read and map everything. Any error here aborts the run.
pub async fn plan(
    source: &dyn IssueSource,
    mapper: &FieldMapper<'_>,
    jql: &str,
    page_size: usize,
) -> Result<Plan> {
    let source_issues = reader::read_all(source, jql, page_size).await?;
    tracing::info!(count = source_issues.len(), "Converting issues into GitHub format");

    let issues = source_issues
        .iter()
        .map(|issue| mapper.map_issue(issue))
        .collect::<Result<Vec<_>, _>>()?;
    let aggregate = aggregate(&issues);

    Ok(Plan { issues, aggregate })
}

/// Fails only when the repository itself cannot be reached; per-entity
/// failures are counted in the report.
pub async fn execute(target: &dyn IssueTarget, plan: &Plan) -> Result<WriteReport> {
    tracing::info!(target = target.name(), "Writing migration");
    TargetWriter::new(target)
        .write(&plan.aggregate, &plan.issues)
        .await
}

impl Plan {
    /// Human-readable preview for `--dry-run`.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Issues to migrate: {}", self.issues.len());
        let closed = self
            .issues
            .iter()
            .filter(|i| i.state == IssueState::Closed)
            .count();
        let _ = writeln!(out, "  open: {}, closed: {closed}", self.issues.len() - closed);

        let _ = writeln!(out, "Milestones: {}", self.aggregate.milestones.len());
        for m in &self.aggregate.milestones {
            let _ = writeln!(
                out,
                "  {} (due {})",
                m.name.as_deref().unwrap_or("<unnamed>"),
                m.due_date.as_deref().unwrap_or("none")
            );
        }

        let _ = writeln!(out, "Projects: {}", self.aggregate.projects.len());
        for p in &self.aggregate.projects {
            let _ = writeln!(out, "  {p}");
        }

        let _ = writeln!(out, "Columns per project: {}", self.aggregate.statuses.join(", "));
        out
    }
}
