use std::collections::HashMap;

use anyhow::Result;

use super::aggregate::Aggregate;
use super::dates::parse_due_date;
use crate::error::MigrateError;
use crate::model::target::{MilestoneRecord, TargetIssueRecord};
use crate::providers::{CreatedMilestone, IssueTarget, IssueUpdate, NewIssue};

/// Milestone title → milestone number, as created during this run.
pub type MilestoneIds = HashMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: u64,
    /// Columns in creation order as (name, column id).
    pub columns: Vec<(String, u64)>,
}

impl Board {
    fn column_for(&self, status: &str) -> Option<u64> {
        self.columns
            .iter()
            .find(|(name, _)| name == status)
            .map(|(_, id)| *id)
    }
}

/// Project name → board.
pub type Boards = HashMap<String, Board>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub milestones: usize,
    pub boards: usize,
    pub columns: usize,
    pub issues: usize,
    pub failures: usize,
}

/// Recreates the aggregate and issues on the target, milestones first, then
/// boards, then issues. A failing entity is logged and skipped.
pub struct TargetWriter<'a> {
    target: &'a dyn IssueTarget,
    report: WriteReport,
}

impl<'a> TargetWriter<'a> {
    pub fn new(target: &'a dyn IssueTarget) -> Self {
        Self {
            target,
            report: WriteReport::default(),
        }
    }

    /// Errors only if the repository check fails, before anything is written.
    pub async fn write(
        mut self,
        aggregate: &Aggregate,
        issues: &[TargetIssueRecord],
    ) -> Result<WriteReport> {
        self.target.check_repo().await?;
        tracing::info!(service = self.target.name(), "Repository reachable");

        let milestones = self.create_milestones(&aggregate.milestones).await;
        let boards = self
            .create_boards(&aggregate.projects, &aggregate.statuses)
            .await;
        self.create_issues(issues, &milestones, &boards).await;
        Ok(self.report)
    }

    pub async fn create_milestones(&mut self, milestones: &[MilestoneRecord]) -> MilestoneIds {
        tracing::info!(count = milestones.len(), "Creating GitHub milestones from Jira sprints");
        let mut ids = MilestoneIds::new();

        for milestone in milestones {
            match self.create_milestone(milestone).await {
                Ok(created) => {
                    tracing::info!(milestone = %created.title, number = created.number, "Created milestone");
                    ids.insert(created.title, created.number);
                    self.report.milestones += 1;
                }
                Err(e) => {
                    tracing::error!(
                        milestone = milestone.name.as_deref().unwrap_or_default(),
                        error = %e,
                        "Failed to create milestone"
                    );
                    self.report.failures += 1;
                }
            }
        }

        ids
    }

    async fn create_milestone(
        &self,
        milestone: &MilestoneRecord,
    ) -> Result<CreatedMilestone> {
        let name = milestone
            .name
            .as_deref()
            .ok_or(MigrateError::UnnamedMilestone)?;
        let due_on = milestone
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()?;
        self.target
            .create_milestone(name, milestone.description.as_deref(), due_on)
            .await
    }

    pub async fn create_boards(&mut self, projects: &[String], statuses: &[String]) -> Boards {
        tracing::info!(count = projects.len(), "Creating GitHub projects from Jira projects");
        let mut boards = Boards::new();

        for project in projects {
            let body = format!("Migrated from Jira project {project}.");
            let id = match self.target.create_project(project, &body).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!(project = %project, error = %e, "Failed to create project");
                    self.report.failures += 1;
                    continue;
                }
            };
            tracing::info!(project = %project, id, "Created project");
            self.report.boards += 1;

            let mut columns = Vec::with_capacity(statuses.len());
            for status in statuses {
                match self.target.create_column(id, status).await {
                    Ok(column_id) => {
                        tracing::info!(project = %project, column = %status, "Added column");
                        columns.push((status.clone(), column_id));
                        self.report.columns += 1;
                    }
                    Err(e) => {
                        tracing::error!(project = %project, column = %status, error = %e, "Failed to create column");
                        self.report.failures += 1;
                    }
                }
            }

            boards.insert(project.clone(), Board { id, columns });
        }

        boards
    }

    pub async fn create_issues(
        &mut self,
        issues: &[TargetIssueRecord],
        milestones: &MilestoneIds,
        boards: &Boards,
    ) {
        for issue in issues {
            tracing::info!(jira_id = %issue.jira_id, "Migrating issue");
            match self.migrate_issue(issue, milestones, boards).await {
                Ok(number) => {
                    tracing::info!(jira_id = %issue.jira_id, number, "Migrated issue");
                    self.report.issues += 1;
                }
                Err(e) => {
                    tracing::error!(jira_id = %issue.jira_id, error = %e, "Failed to migrate issue");
                    self.report.failures += 1;
                }
            }
        }
    }

    /// Steps run in order and stop at the first failure; nothing already
    /// created is rolled back.
    async fn migrate_issue(
        &self,
        issue: &TargetIssueRecord,
        milestones: &MilestoneIds,
        boards: &Boards,
    ) -> Result<u64> {
        let milestone = issue.milestone.as_ref().and_then(|m| {
            let number = m.name.as_ref().and_then(|name| milestones.get(name)).copied();
            if number.is_none() {
                tracing::error!(
                    jira_id = %issue.jira_id,
                    milestone = m.name.as_deref().unwrap_or_default(),
                    "Unable to resolve milestone, migrating without it"
                );
            }
            number
        });

        let created = self
            .target
            .create_issue(&NewIssue {
                title: &issue.title,
                body: &issue.body,
                assignee: issue.assignee.as_deref(),
                labels: &issue.labels,
            })
            .await?;

        self.target
            .update_issue(
                created.number,
                &IssueUpdate {
                    state: issue.state,
                    milestone,
                },
            )
            .await?;

        match boards.get(&issue.project) {
            Some(board) => {
                if let Some(column_id) = board.column_for(&issue.status) {
                    self.target.create_card(column_id, created.id).await?;
                    tracing::debug!(
                        jira_id = %issue.jira_id,
                        board = board.id,
                        column = %issue.status,
                        "Placed card"
                    );
                }
            }
            None => tracing::warn!(
                jira_id = %issue.jira_id,
                project = %issue.project,
                "No board for project, skipping card"
            ),
        }

        for comment in &issue.comments {
            self.target.create_comment(created.number, comment).await?;
        }

        Ok(created.number)
    }
}
