use crate::error::MigrateError;
use crate::identity::IdentityMap;
use crate::model::source::{SourceComment, SourceIssue};
use crate::model::target::{IssueState, TargetIssueRecord};

use super::sprint::SprintDecoder;

pub fn provenance_line(jira_id: &str) -> String {
    format!("Migrated from Jira issue {jira_id}")
}

pub fn compose_body(jira_id: &str, description: Option<&str>) -> String {
    let marker = provenance_line(jira_id);
    match description {
        Some(desc) if !desc.is_empty() => format!("{marker}\n{desc}"),
        _ => marker,
    }
}

pub fn flatten_comment(comment: &SourceComment) -> String {
    format!(
        "Author: {}\nCreated: {}\n\n{}",
        comment.author, comment.created, comment.body
    )
}

pub fn resolve_state(issue: &SourceIssue) -> IssueState {
    if issue.is_done() {
        IssueState::Closed
    } else {
        IssueState::Open
    }
}

/// Converts Jira issues to GitHub-shaped records. Holds no state beyond its
/// injected lookups.
pub struct FieldMapper<'a> {
    identities: &'a IdentityMap,
    sprints: &'a dyn SprintDecoder,
}

impl<'a> FieldMapper<'a> {
    pub fn new(identities: &'a IdentityMap, sprints: &'a dyn SprintDecoder) -> Self {
        Self {
            identities,
            sprints,
        }
    }

    /// Fails only when the assignee has no GitHub counterpart.
    pub fn map_issue(&self, issue: &SourceIssue) -> Result<TargetIssueRecord, MigrateError> {
        let assignee = issue
            .assignee
            .as_ref()
            .map(|user| self.identities.resolve(user).map(String::from))
            .transpose()?;

        let milestone = issue
            .sprint
            .as_deref()
            .and_then(|raw| self.sprints.decode_sprint(raw));

        Ok(TargetIssueRecord {
            jira_id: issue.key.clone(),
            title: issue.summary.clone(),
            body: compose_body(&issue.key, issue.description.as_deref()),
            comments: issue.comments.iter().map(flatten_comment).collect(),
            assignee,
            labels: issue.labels.clone(),
            project: issue.project.name.clone(),
            milestone,
            state: resolve_state(issue),
            status: issue.status.clone(),
        })
    }
}
