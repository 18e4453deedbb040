//! Single-call operations on the repositories of an organization
use log::{debug, info};

use crate::{
    errors::TransferError,
    platform::Platform,
    utils::{Prompt, Repo},
};

/// How a command that may ask for confirmation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The operation was carried out
    Completed,

    /// The operator declined
    Declined,
}

/// Get every repository of `org`
/// # Errors
/// Error if the organization or its repositories can't be fetched
pub async fn list_repos(platform: &dyn Platform, org: &str) -> Result<Vec<Repo>, TransferError> {
    platform.get_organization(org).await?;
    let repos = platform.get_all_repos(org).await?;
    debug!("{} repositories in {org}", repos.len());
    Ok(repos)
}

/// Delete `org/name`, asking first unless `force` is set
/// # Errors
/// Error if the repository doesn't exist or can't be deleted
pub async fn delete_repo(
    platform: &dyn Platform,
    org: &str,
    name: &str,
    force: bool,
    prompt: &mut dyn Prompt,
) -> Result<CommandOutcome, TransferError> {
    let repo = platform.get_repo(org, name).await?;
    if !force {
        let question = format!("Are you sure you want to delete {}? (y/N):", repo.name);
        if !prompt.confirm(&question)? {
            return Ok(CommandOutcome::Declined);
        }
    }
    platform.delete_repo(&repo.owner, &repo.name).await?;
    info!("Deleted {}", repo.identity());
    Ok(CommandOutcome::Completed)
}

/// Make `owner/name` public or private and return the repository as it is now.
///
/// Nothing is sent when the repository already has the requested visibility.
/// # Errors
/// Error if the repository doesn't exist or can't be edited
pub async fn set_visibility(
    platform: &dyn Platform,
    owner: &str,
    name: &str,
    public: bool,
) -> Result<Repo, TransferError> {
    let private = !public;
    let repo = platform.get_repo(owner, name).await?;
    if repo.private == private {
        debug!("{} is already {}", repo.identity(), repo.visibility());
        return Ok(repo);
    }
    let repo = platform.set_visibility(owner, name, private).await?;
    info!("{} is now {}", repo.identity(), repo.visibility());
    Ok(repo)
}
