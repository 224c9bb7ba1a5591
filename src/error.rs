use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("No GitHub user mapped for Jira user {0}")]
    UnmappedUser(String),

    #[error("Unrecognised due date {0:?}")]
    InvalidDueDate(String),

    #[error("Invalid GitHub repository {0:?}, expected owner/name")]
    InvalidRepo(String),

    #[error("Milestone has no name")]
    UnnamedMilestone,

    #[error("{service} API returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },
}

impl MigrateError {
    pub fn api(service: &'static str, status: reqwest::StatusCode, message: String) -> Self {
        Self::Api {
            service,
            status: status.as_u16(),
            message,
        }
    }
}
