//! Forge API seen from the transfer workflow
use std::{future::Future, pin::Pin};

use crate::{
    errors::TransferError,
    utils::{NewPullRequest, Organization, PullRequest, Repo},
};

/// Future returned by every [`Platform`] call
pub type PlatformFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransferError>> + Send + 'a>>;

/// Operations the tool needs from a forge
pub trait Platform: Sync + Send {
    /// Get an organization
    fn get_organization(&self, org: &str) -> PlatformFuture<'_, Organization>;

    /// Create a repository in an organization
    fn create_repo(&self, org: &str, name: &str, private: bool) -> PlatformFuture<'_, Repo>;

    /// Get a repository, failing with `RepoNotFound` when it doesn't exist
    fn get_repo(&self, owner: &str, name: &str) -> PlatformFuture<'_, Repo>;

    /// Get every repository of an organization, across all pages
    fn get_all_repos(&self, org: &str) -> PlatformFuture<'_, Vec<Repo>>;

    /// Set the visibility of a repository
    fn set_visibility(&self, owner: &str, name: &str, private: bool)
        -> PlatformFuture<'_, Repo>;

    /// Delete a repository
    fn delete_repo(&self, owner: &str, name: &str) -> PlatformFuture<'_, ()>;

    /// Get the open pull requests of a repository, across all pages
    fn get_open_pull_requests(
        &self,
        owner: &str,
        name: &str,
    ) -> PlatformFuture<'_, Vec<PullRequest>>;

    /// Create a pull request
    fn create_pull_request(
        &self,
        owner: &str,
        name: &str,
        pull_request: NewPullRequest,
    ) -> PlatformFuture<'_, PullRequest>;
}
