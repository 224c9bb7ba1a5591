use clap::Parser;
use std::path::PathBuf;

/// Migrate Jira Cloud issues to GitHub Issues.
///
/// Sprints become milestones, Jira projects become GitHub project boards with
/// one column per status, and every issue is recreated with its comments.
#[derive(Debug, Parser)]
#[command(name = "jira2gh", version, about)]
pub struct Args {
    /// Address of the Jira server, e.g. https://example.atlassian.net
    #[arg(long, env = "JIRA_SERVER")]
    pub jira_server: String,

    /// Jira login (usually an email address)
    #[arg(long, env = "JIRA_USERNAME")]
    pub jira_username: String,

    /// API token generated for the Jira login
    #[arg(long, env = "JIRA_TOKEN", hide_env_values = true)]
    pub jira_token: String,

    /// JQL selecting the issues to migrate; empty means all issues
    #[arg(long, env = "JIRA_SEARCH", default_value = "")]
    pub jira_search: String,

    /// Repository receiving the issues, as owner/name
    #[arg(long, env = "GITHUB_REPO")]
    pub github_repo: String,

    /// GitHub access token with repo scope
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// TOML file mapping Jira users to GitHub logins [default: ~/.jira2gh/users.toml]
    #[arg(long)]
    pub user_map: Option<PathBuf>,

    /// Issues requested per search page
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Custom field holding the sprint
    #[arg(long, default_value = "customfield_10020")]
    pub sprint_field: String,

    /// Read and convert everything, print a summary, write nothing to GitHub
    #[arg(long)]
    pub dry_run: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
