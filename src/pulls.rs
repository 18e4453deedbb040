//! Recreate the open pull requests of a repository on its copy
use log::{info, warn};

use crate::{
    errors::TransferError,
    platform::Platform,
    utils::{NewPullRequest, PullRequest, PullRequestState, RepositoryIdentity},
};

/// Outcome of a replication: every open pull request ends up in one of the two lists
#[derive(Debug, Default)]
pub struct ReplicationReport {
    /// Titles of the created pull requests
    pub created: Vec<String>,

    /// Titles of the pull requests that couldn't be created, with the reason
    pub failed: Vec<(String, TransferError)>,
}

impl ReplicationReport {
    /// Number of pull requests that were considered
    pub fn total(&self) -> usize {
        self.created.len() + self.failed.len()
    }
}

/// Build the creation request of the copy of `pull`, heads being taken from `destination_org`
pub fn replica_of(pull: &PullRequest, destination_org: &str) -> NewPullRequest {
    NewPullRequest {
        title: pull.title.clone(),
        body: pull.body.clone(),
        head: format!("{destination_org}:{}", pull.head),
        base: pull.base.clone(),
    }
}

/// Copy the open pull requests of `source` to `destination`.
///
/// A pull request that can't be created is logged and skipped. Only the listing of the
/// source pull requests is fatal.
/// # Errors
/// Error if the open pull requests of `source` can't be listed
pub async fn replicate_pull_requests(
    platform: &dyn Platform,
    source: &RepositoryIdentity,
    destination: &RepositoryIdentity,
) -> Result<ReplicationReport, TransferError> {
    let pulls = platform
        .get_open_pull_requests(&source.owner, &source.name)
        .await?;
    let mut report = ReplicationReport::default();
    for pull in pulls
        .iter()
        .filter(|pull| pull.state == PullRequestState::Open)
    {
        let replica = replica_of(pull, &destination.owner);
        match platform
            .create_pull_request(&destination.owner, &destination.name, replica)
            .await
        {
            Ok(_) => {
                info!("Created pull request '{}' on {destination}", pull.title);
                report.created.push(pull.title.clone());
            }
            Err(e) => {
                warn!("Could not create pull request '{}': {e}", pull.title);
                report.failed.push((pull.title.clone(), e));
            }
        }
    }
    Ok(report)
}
