use base64::Engine;
use chrono::TimeZone;
use mockito::{Matcher, Server};
use serde_json::json;

use super::github::GitHubClient;
use super::jira::JiraClient;
use super::{IssueSource, IssueTarget, IssueUpdate, NewIssue};
use crate::error::MigrateError;
use crate::model::target::IssueState;

fn jira_client(server: &Server) -> JiraClient {
    JiraClient::new(
        &server.url(),
        "me@example.com",
        "jira-token",
        "customfield_10020".into(),
    )
    .unwrap()
}

fn github_client(server: &Server) -> GitHubClient {
    GitHubClient::with_base_url(&server.url(), "octo-org/tracker", "gh-token").unwrap()
}

fn api_status(err: &anyhow::Error) -> Option<u16> {
    match err.downcast_ref::<MigrateError>() {
        Some(MigrateError::Api { status, .. }) => Some(*status),
        _ => None,
    }
}

#[tokio::test]
async fn jira_search_sends_paging_and_auth() {
    let mut server = Server::new_async().await;
    let expected_auth = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("me@example.com:jira-token")
    );
    let mock = server
        .mock("GET", "/rest/api/2/search")
        .match_header("authorization", expected_auth.as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("jql".into(), "project = PROJ".into()),
            Matcher::UrlEncoded("startAt".into(), "2".into()),
            Matcher::UrlEncoded("maxResults".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "startAt": 2,
                "maxResults": 2,
                "total": 3,
                "issues": [{
                    "key": "PROJ-3",
                    "fields": {
                        "summary": "Third",
                        "description": null,
                        "status": {"name": "Done", "statusCategory": {"key": "done"}},
                        "assignee": null,
                        "labels": [],
                        "project": {"key": "PROJ", "name": "Project X"},
                        "customfield_10020": null
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = jira_client(&server)
        .search("project = PROJ", 2, 2)
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.issues.len(), 1);
    let issue = &page.issues[0];
    assert_eq!(issue.key, "PROJ-3");
    assert!(issue.is_done());
    assert_eq!(issue.description, None);
    assert_eq!(issue.sprint, None);
    assert!(issue.comments.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn jira_auth_failure_is_an_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rest/api/2/search")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = jira_client(&server).search("", 0, 1).await.unwrap_err();
    assert_eq!(api_status(&err), Some(401));
    assert!(err.to_string().contains("Jira API returned 401"));
}

#[tokio::test]
async fn jira_comments_are_flattened_to_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/api/2/issue/PROJ-1/comment")
        .match_query(Matcher::UrlEncoded("startAt".into(), "0".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "startAt": 0,
                "maxResults": 100,
                "total": 2,
                "comments": [
                    {
                        "author": {"accountId": "a1", "displayName": "Ada"},
                        "created": "2020-01-02T03:04:05.000+0000",
                        "body": "Plain body"
                    },
                    {
                        "author": {"accountId": "g1", "displayName": "Grace"},
                        "created": "2020-01-03T00:00:00.000+0000",
                        "body": {"type": "doc", "version": 1, "content": [
                            {"type": "paragraph", "content": [{"type": "text", "text": "Rich body"}]}
                        ]}
                    }
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let comments = jira_client(&server).comments("PROJ-1").await.unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].author, "Ada");
    assert_eq!(comments[0].created, "2020-01-02T03:04:05.000+0000");
    assert_eq!(comments[0].body, "Plain body");
    assert_eq!(comments[1].author, "Grace");
    assert_eq!(comments[1].body, "Rich body");
    mock.assert_async().await;
}

#[tokio::test]
async fn github_create_issue_posts_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/octo-org/tracker/issues")
        .match_header("authorization", "Bearer gh-token")
        .match_header("user-agent", Matcher::Regex("^jira2gh/".into()))
        .match_body(Matcher::Json(json!({
            "title": "Crash on save",
            "body": "Migrated from Jira issue PROJ-7",
            "assignee": "octocat",
            "labels": ["bug"]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 9001, "number": 42, "title": "Crash on save"}).to_string())
        .create_async()
        .await;

    let labels = vec!["bug".to_string()];
    let created = github_client(&server)
        .create_issue(&NewIssue {
            title: "Crash on save",
            body: "Migrated from Jira issue PROJ-7",
            assignee: Some("octocat"),
            labels: &labels,
        })
        .await
        .unwrap();

    assert_eq!(created.id, 9001);
    assert_eq!(created.number, 42);
    mock.assert_async().await;
}

#[tokio::test]
async fn github_unassigned_issue_omits_assignee() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/octo-org/tracker/issues")
        .match_body(Matcher::Json(json!({
            "title": "T",
            "body": "B",
            "labels": []
        })))
        .with_status(201)
        .with_body(json!({"id": 1, "number": 1}).to_string())
        .create_async()
        .await;

    github_client(&server)
        .create_issue(&NewIssue {
            title: "T",
            body: "B",
            assignee: None,
            labels: &[],
        })
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn github_milestone_sends_due_on() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/octo-org/tracker/milestones")
        .match_body(Matcher::Json(json!({
            "title": "Sprint 1",
            "description": "Ship it",
            "due_on": "2020-01-15T00:00:00Z"
        })))
        .with_status(201)
        .with_body(json!({"number": 3, "title": "Sprint 1"}).to_string())
        .create_async()
        .await;

    let due = chrono::Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap();
    let created = github_client(&server)
        .create_milestone("Sprint 1", Some("Ship it"), Some(due))
        .await
        .unwrap();

    assert_eq!(created.number, 3);
    assert_eq!(created.title, "Sprint 1");
    mock.assert_async().await;
}

#[tokio::test]
async fn github_update_sets_state_and_milestone() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/repos/octo-org/tracker/issues/42")
        .match_body(Matcher::Json(json!({"state": "closed", "milestone": 3})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    github_client(&server)
        .update_issue(
            42,
            &IssueUpdate {
                state: IssueState::Closed,
                milestone: Some(3),
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn github_board_calls_use_project_endpoints() {
    let mut server = Server::new_async().await;
    let project = server
        .mock("POST", "/repos/octo-org/tracker/projects")
        .match_body(Matcher::Json(json!({
            "name": "Project X",
            "body": "Migrated from Jira project Project X."
        })))
        .with_status(201)
        .with_body(json!({"id": 77}).to_string())
        .create_async()
        .await;
    let column = server
        .mock("POST", "/projects/77/columns")
        .match_body(Matcher::Json(json!({"name": "In Progress"})))
        .with_status(201)
        .with_body(json!({"id": 501}).to_string())
        .create_async()
        .await;
    let card = server
        .mock("POST", "/projects/columns/501/cards")
        .match_body(Matcher::Json(json!({"content_id": 9001, "content_type": "Issue"})))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let github = github_client(&server);
    let project_id = github
        .create_project("Project X", "Migrated from Jira project Project X.")
        .await
        .unwrap();
    let column_id = github.create_column(project_id, "In Progress").await.unwrap();
    github.create_card(column_id, 9001).await.unwrap();

    assert_eq!(project_id, 77);
    assert_eq!(column_id, 501);
    project.assert_async().await;
    column.assert_async().await;
    card.assert_async().await;
}

#[tokio::test]
async fn github_comment_posts_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/octo-org/tracker/issues/42/comments")
        .match_body(Matcher::Json(json!({"body": "Author: Ada\nCreated: now\n\nHi"})))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    github_client(&server)
        .create_comment(42, "Author: Ada\nCreated: now\n\nHi")
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn github_validation_error_is_an_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/repos/octo-org/tracker/milestones")
        .with_status(422)
        .with_body(r#"{"message":"Validation Failed"}"#)
        .create_async()
        .await;

    let err = github_client(&server)
        .create_milestone("Sprint 1", None, None)
        .await
        .unwrap_err();
    assert_eq!(api_status(&err), Some(422));
    assert!(err.to_string().contains("Validation Failed"));
}

#[tokio::test]
async fn github_repo_check_succeeds() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octo-org/tracker")
        .match_header("authorization", "Bearer gh-token")
        .with_status(200)
        .with_body(json!({"id": 1, "full_name": "octo-org/tracker"}).to_string())
        .create_async()
        .await;

    github_client(&server).check_repo().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn github_bad_credentials_fail_repo_check() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo-org/tracker")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create_async()
        .await;

    let err = github_client(&server).check_repo().await.unwrap_err();
    assert_eq!(api_status(&err), Some(401));
    assert!(err.to_string().contains("Bad credentials"));
}

#[tokio::test]
async fn github_bad_credentials_stop_the_write() {
    use crate::migrate::aggregate::tests::make_record;
    use crate::migrate::{aggregate::aggregate, execute, Plan};

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo-org/tracker")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create_async()
        .await;
    let writes = server
        .mock("POST", Matcher::Any)
        .with_status(401)
        .expect(0)
        .create_async()
        .await;

    let issues = vec![make_record("P-1", "Alpha", "To Do")];
    let plan = Plan {
        aggregate: aggregate(&issues),
        issues,
    };
    let err = execute(&github_client(&server), &plan).await.unwrap_err();
    assert_eq!(api_status(&err), Some(401));
    writes.assert_async().await;
}
