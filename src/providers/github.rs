use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CreatedIssue, CreatedMilestone, IssueTarget, IssueUpdate, NewIssue, USER_AGENT};
use crate::error::MigrateError;

const API_URL: &str = "https://api.github.com";

pub struct GitHubClient {
    base_url: String,
    owner: String,
    repo: String,
    auth_header: String,
    client: reqwest::Client,
}

/// Split `owner/name` into its two parts.
pub fn parse_repo(full_name: &str) -> Result<(String, String), MigrateError> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(MigrateError::InvalidRepo(full_name.to_string())),
    }
}

impl GitHubClient {
    pub fn new(full_name: &str, token: &str) -> Result<Self> {
        Self::with_base_url(API_URL, full_name, token)
    }

    pub fn with_base_url(base_url: &str, full_name: &str, token: &str) -> Result<Self> {
        let (owner, repo) = parse_repo(full_name)?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build GitHub HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            owner,
            repo,
            auth_header: format!("Bearer {token}"),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn repo_path(&self, rest: &str) -> String {
        format!(
            "/repos/{}/{}{rest}",
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo)
        )
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<reqwest::Response> {
        let resp = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .with_context(|| format!("GitHub {what} request failed"))?;
        Self::ensure_success(resp).await
    }

    async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MigrateError::api("GitHub", status, message).into());
        }
        Ok(resp)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<T> {
        self.send(method, path, body, what)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse GitHub {what} response"))
    }
}

#[derive(Serialize)]
struct NewMilestone<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_on: Option<String>,
}

#[derive(Deserialize)]
struct GhMilestone {
    number: u64,
    title: String,
}

#[derive(Serialize)]
struct NewProject<'a> {
    name: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct NewColumn<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct NewCard {
    content_id: u64,
    content_type: &'static str,
}

#[derive(Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

/// Projects and columns only need their id.
#[derive(Deserialize)]
struct GhObject {
    id: u64,
}

#[derive(Deserialize)]
struct GhIssue {
    id: u64,
    number: u64,
}

#[async_trait]
impl IssueTarget for GitHubClient {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn check_repo(&self) -> Result<()> {
        let resp = self
            .request(Method::GET, &self.repo_path(""))
            .send()
            .await
            .context("GitHub repository request failed")?;
        Self::ensure_success(resp).await?;
        Ok(())
    }

    async fn create_milestone(
        &self,
        title: &str,
        description: Option<&str>,
        due_on: Option<DateTime<Utc>>,
    ) -> Result<CreatedMilestone> {
        let body = NewMilestone {
            title,
            description,
            due_on: due_on.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
        };
        let milestone: GhMilestone = self
            .send_json(Method::POST, &self.repo_path("/milestones"), &body, "milestone")
            .await?;
        Ok(CreatedMilestone {
            number: milestone.number,
            title: milestone.title,
        })
    }

    async fn create_project(&self, name: &str, body: &str) -> Result<u64> {
        let project: GhObject = self
            .send_json(
                Method::POST,
                &self.repo_path("/projects"),
                &NewProject { name, body },
                "project",
            )
            .await?;
        Ok(project.id)
    }

    async fn create_column(&self, project_id: u64, name: &str) -> Result<u64> {
        let column: GhObject = self
            .send_json(
                Method::POST,
                &format!("/projects/{project_id}/columns"),
                &NewColumn { name },
                "column",
            )
            .await?;
        Ok(column.id)
    }

    async fn create_issue(&self, issue: &NewIssue<'_>) -> Result<CreatedIssue> {
        let created: GhIssue = self
            .send_json(Method::POST, &self.repo_path("/issues"), issue, "issue")
            .await?;
        Ok(CreatedIssue {
            id: created.id,
            number: created.number,
        })
    }

    async fn update_issue(&self, number: u64, update: &IssueUpdate) -> Result<()> {
        self.send(
            Method::PATCH,
            &self.repo_path(&format!("/issues/{number}")),
            update,
            "issue update",
        )
        .await?;
        Ok(())
    }

    async fn create_card(&self, column_id: u64, issue_id: u64) -> Result<()> {
        let card = NewCard {
            content_id: issue_id,
            content_type: "Issue",
        };
        self.send(
            Method::POST,
            &format!("/projects/columns/{column_id}/cards"),
            &card,
            "card",
        )
        .await?;
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        self.send(
            Method::POST,
            &self.repo_path(&format!("/issues/{number}/comments")),
            &NewComment { body },
            "comment",
        )
        .await?;
        Ok(())
    }
}
