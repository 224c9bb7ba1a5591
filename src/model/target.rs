use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sprint recreated as a GitHub milestone. Identity is the whole tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

impl MilestoneRecord {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.due_date.is_none()
    }
}

/// A Jira issue reshaped for GitHub. Lives only for the duration of a run.
#[derive(Debug, Clone)]
pub struct TargetIssueRecord {
    pub jira_id: String,
    pub title: String,
    pub body: String,
    pub comments: Vec<String>,
    /// GitHub login, `None` when the Jira issue is unassigned.
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub project: String,
    pub milestone: Option<MilestoneRecord>,
    pub state: IssueState,
    /// Jira status name, reused as the board column name.
    pub status: String,
}
