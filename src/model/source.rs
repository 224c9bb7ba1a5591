/// A Jira issue as read from the search API, with its comment thread attached.
#[derive(Debug, Clone)]
pub struct SourceIssue {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub comments: Vec<SourceComment>,
    pub status: String,
    /// Status category key, e.g. `new`, `indeterminate`, `done`.
    pub status_category: String,
    pub assignee: Option<SourceUser>,
    pub labels: Vec<String>,
    pub project: SourceProject,
    /// Raw sprint field value, still encoded.
    pub sprint: Option<String>,
}

impl SourceIssue {
    pub fn is_done(&self) -> bool {
        self.status_category == "done"
    }
}

#[derive(Debug, Clone)]
pub struct SourceComment {
    pub author: String,
    pub created: String,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct SourceUser {
    pub account_id: Option<String>,
    /// Legacy user key / username (Jira Server and older Cloud sites).
    pub key: Option<String>,
    pub email: Option<String>,
    pub display_name: String,
}

impl SourceUser {
    /// Identities to try against the identity map, most specific first.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        [&self.account_id, &self.key, &self.email]
            .into_iter()
            .filter_map(|id| id.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct SourceProject {
    pub key: String,
    pub name: String,
}
