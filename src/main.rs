mod cli;
mod config;
mod error;
mod identity;
mod migrate;
mod model;
mod providers;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Args;
use migrate::mapper::FieldMapper;
use migrate::sprint::AutoSprintDecoder;
use providers::github::GitHubClient;
use providers::jira::JiraClient;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// One request at a time, start to finish.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let identities = config::load_identity_map(args.user_map.as_deref())?;
    if identities.is_empty() {
        tracing::warn!("User map is empty, any assigned issue will stop the run");
    } else {
        tracing::debug!(users = identities.len(), "Loaded user map");
    }

    // Validate the repository up front so a typo fails before any Jira traffic.
    let github = GitHubClient::new(&args.github_repo, &args.github_token)?;

    tracing::info!(
        server = %args.jira_server,
        user = %args.jira_username,
        "Connecting to Jira"
    );
    let jira = JiraClient::new(
        &args.jira_server,
        &args.jira_username,
        &args.jira_token,
        args.sprint_field.clone(),
    )?;

    let decoder = AutoSprintDecoder;
    let mapper = FieldMapper::new(&identities, &decoder);
    let plan = migrate::plan(&jira, &mapper, &args.jira_search, args.page_size as usize).await?;

    if args.dry_run {
        print!("{}", plan.summary());
        tracing::info!("Dry run, nothing written to GitHub");
        return Ok(());
    }

    let report = migrate::execute(&github, &plan).await?;
    tracing::info!(
        milestones = report.milestones,
        boards = report.boards,
        columns = report.columns,
        issues = report.issues,
        failures = report.failures,
        "Migration from Jira to GitHub Issues complete"
    );

    Ok(())
}
