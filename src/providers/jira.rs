use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{IssueSource, SearchPage, USER_AGENT};
use crate::error::MigrateError;
use crate::model::source::{SourceComment, SourceIssue, SourceProject, SourceUser};
use crate::util::adf::to_plain_text;

const COMMENT_PAGE_SIZE: usize = 100;

pub struct JiraClient {
    base_url: String,
    auth_header: String,
    sprint_field: String,
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(server: &str, username: &str, api_token: &str, sprint_field: String) -> Result<Self> {
        let creds = format!("{username}:{api_token}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build Jira HTTP client")?;
        Ok(Self {
            base_url: server.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {encoded}"),
            sprint_field,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Jira {what} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MigrateError::api("Jira", status, message).into());
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse Jira {what} response"))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    total: usize,
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    summary: Option<String>,
    description: Option<Value>,
    status: Option<StatusField>,
    assignee: Option<UserField>,
    #[serde(default)]
    labels: Vec<String>,
    project: Option<ProjectField>,
    /// Custom fields, the sprint field among them.
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusField {
    name: String,
    status_category: Option<StatusCategoryField>,
}

#[derive(Deserialize)]
struct StatusCategoryField {
    key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserField {
    account_id: Option<String>,
    key: Option<String>,
    name: Option<String>,
    email_address: Option<String>,
    display_name: Option<String>,
}

impl From<UserField> for SourceUser {
    fn from(user: UserField) -> Self {
        let display_name = user
            .display_name
            .clone()
            .or_else(|| user.name.clone())
            .or_else(|| user.account_id.clone())
            .unwrap_or_default();
        SourceUser {
            account_id: user.account_id,
            key: user.key.or(user.name),
            email: user.email_address,
            display_name,
        }
    }
}

#[derive(Deserialize)]
struct ProjectField {
    key: String,
    name: String,
}

#[derive(Deserialize)]
struct CommentsResponse {
    total: usize,
    #[serde(default)]
    comments: Vec<JiraComment>,
}

#[derive(Deserialize)]
struct JiraComment {
    author: Option<UserField>,
    created: Option<String>,
    body: Option<Value>,
}

/// Pull the sprint descriptor out of the raw custom field value.
///
/// Legacy sites return a list of GreenHopper-encoded strings, newer Cloud
/// sites a list of objects. Only the first sprint is used.
fn sprint_descriptor(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(sprint_descriptor),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

impl JiraIssue {
    fn into_source(self, sprint_field: &str) -> SourceIssue {
        let JiraIssue { key, mut fields } = self;
        let sprint = fields.extra.get(sprint_field).and_then(sprint_descriptor);
        let (status, status_category) = match fields.status.take() {
            Some(s) => (
                s.name,
                s.status_category.map(|c| c.key).unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };
        let project = fields
            .project
            .take()
            .map(|p| SourceProject {
                key: p.key,
                name: p.name,
            })
            .unwrap_or_else(|| SourceProject {
                key: String::new(),
                name: String::new(),
            });

        SourceIssue {
            key,
            summary: fields.summary.take().unwrap_or_default(),
            description: fields.description.as_ref().and_then(to_plain_text),
            comments: Vec::new(),
            status,
            status_category,
            assignee: fields.assignee.take().map(SourceUser::from),
            labels: fields.labels,
            project,
            sprint,
        }
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    fn name(&self) -> &str {
        "Jira"
    }

    async fn search(&self, jql: &str, start_at: usize, max_results: usize) -> Result<SearchPage> {
        let fields = format!(
            "summary,description,status,assignee,labels,project,{}",
            self.sprint_field
        );
        let query = [
            ("jql", jql.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
            ("fields", fields),
        ];
        let resp: SearchResponse = self.get_json("/rest/api/2/search", &query, "search").await?;

        Ok(SearchPage {
            total: resp.total,
            issues: resp
                .issues
                .into_iter()
                .map(|issue| issue.into_source(&self.sprint_field))
                .collect(),
        })
    }

    async fn comments(&self, issue_key: &str) -> Result<Vec<SourceComment>> {
        let path = format!(
            "/rest/api/2/issue/{}/comment",
            urlencoding::encode(issue_key)
        );
        let mut comments = Vec::new();
        let mut start_at = 0;
        loop {
            let query = [
                ("startAt", start_at.to_string()),
                ("maxResults", COMMENT_PAGE_SIZE.to_string()),
            ];
            let resp: CommentsResponse = self.get_json(&path, &query, "comment").await?;
            comments.extend(resp.comments.into_iter().map(|c| SourceComment {
                author: c
                    .author
                    .map(|a| SourceUser::from(a).display_name)
                    .unwrap_or_default(),
                created: c.created.unwrap_or_default(),
                body: c.body.as_ref().and_then(to_plain_text).unwrap_or_default(),
            }));
            start_at += COMMENT_PAGE_SIZE;
            if start_at >= resp.total {
                break;
            }
        }
        Ok(comments)
    }
}
