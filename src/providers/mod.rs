pub mod github;
pub mod jira;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::source::{SourceComment, SourceIssue};
use crate::model::target::IssueState;

pub const USER_AGENT: &str = concat!("jira2gh/", env!("CARGO_PKG_VERSION"));

/// One page of a Jira search. `issues` come back without comments.
#[derive(Debug)]
pub struct SearchPage {
    pub total: usize,
    pub issues: Vec<SourceIssue>,
}

/// Read side of the migration.
#[async_trait]
pub trait IssueSource: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, jql: &str, start_at: usize, max_results: usize) -> Result<SearchPage>;
    async fn comments(&self, issue_key: &str) -> Result<Vec<SourceComment>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMilestone {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Global node id, used for project cards.
    pub id: u64,
    /// Per-repository number, used for edits and comments.
    pub number: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewIssue<'a> {
    pub title: &'a str,
    pub body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<&'a str>,
    pub labels: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueUpdate {
    pub state: IssueState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

/// Write side of the migration.
#[async_trait]
pub trait IssueTarget: Send + Sync {
    fn name(&self) -> &str;
    /// Fetch the destination repository. Fails on bad credentials or a missing repo.
    async fn check_repo(&self) -> Result<()>;
    async fn create_milestone(
        &self,
        title: &str,
        description: Option<&str>,
        due_on: Option<DateTime<Utc>>,
    ) -> Result<CreatedMilestone>;
    /// Returns the project id.
    async fn create_project(&self, name: &str, body: &str) -> Result<u64>;
    /// Returns the column id.
    async fn create_column(&self, project_id: u64, name: &str) -> Result<u64>;
    async fn create_issue(&self, issue: &NewIssue<'_>) -> Result<CreatedIssue>;
    async fn update_issue(&self, number: u64, update: &IssueUpdate) -> Result<()>;
    async fn create_card(&self, column_id: u64, issue_id: u64) -> Result<()>;
    async fn create_comment(&self, number: u64, body: &str) -> Result<()>;
}

#[cfg(test)]
pub mod tests;
