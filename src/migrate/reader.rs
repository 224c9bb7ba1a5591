use anyhow::{ensure, Result};

use crate::model::source::SourceIssue;
use crate::providers::IssueSource;

/// Fetch every issue matching `jql`, each with its full comment thread.
///
/// A one-result probe gives the total, then pages are requested at a fixed
/// stride of `page_size` until the offset passes it. A short final page is
/// not special-cased; the search is stateless per offset so the worst case
/// is one request that adds nothing.
pub async fn read_all(
    source: &dyn IssueSource,
    jql: &str,
    page_size: usize,
) -> Result<Vec<SourceIssue>> {
    ensure!(page_size > 0, "Page size must be at least 1");

    let total = source.search(jql, 0, 1).await?.total;
    tracing::info!(total, source = source.name(), "Reading issues");

    let mut issues = Vec::with_capacity(total);
    let mut start_at = 0;
    while start_at < total {
        let page = source.search(jql, start_at, page_size).await?;
        tracing::debug!(start_at, returned = page.issues.len(), "Fetched page");
        for mut issue in page.issues {
            issue.comments = source.comments(&issue.key).await?;
            tracing::debug!(
                jira_id = %issue.key,
                project = %issue.project.key,
                comments = issue.comments.len(),
                "Fetched issue"
            );
            issues.push(issue);
        }
        start_at += page_size;
    }

    Ok(issues)
}
