//! Github payloads and conversion to the shared records
use crate::utils::{Organization, PullRequest, PullRequestState, Repo};
use serde::{Deserialize, Serialize};

/// Github account (user or organization) as embedded in other payloads
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct OwnerGithub {
    /// Account login
    pub login: String,
}

/// Github Repo
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct RepoGithub {
    /// Repository ID
    pub id: u64,

    /// Repository name
    pub name: String,

    /// Repository owner
    pub owner: OwnerGithub,

    /// Repository private status
    pub private: bool,

    /// Repository URL
    pub html_url: String,

    /// Repository SSH URL
    pub ssh_url: String,
}

impl From<RepoGithub> for Repo {
    fn from(repo: RepoGithub) -> Self {
        Repo {
            owner: repo.owner.login,
            name: repo.name,
            html_url: repo.html_url,
            ssh_url: repo.ssh_url,
            private: repo.private,
        }
    }
}

impl From<OwnerGithub> for Organization {
    fn from(org: OwnerGithub) -> Self {
        Organization { login: org.login }
    }
}

/// Body of the repository creation request
#[derive(Serialize, Debug, Clone)]
pub struct RepoCreationGithub<'a> {
    /// Repository name
    pub name: &'a str,

    /// Repository private status
    pub private: bool,
}

/// Body of the repository edition request
#[derive(Serialize, Debug, Clone)]
pub struct RepoEditionGithub {
    /// Repository private status
    pub private: bool,
}

/// Branch side of a Github pull request
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct BranchGithub {
    /// Branch name
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Github pull request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PullGithub {
    /// Pull request number
    pub number: u64,

    /// Pull request title
    pub title: String,

    /// Pull request body
    pub body: Option<String>,

    /// Pull request state
    pub state: PullRequestState,

    /// Source branch
    pub head: BranchGithub,

    /// Target branch
    pub base: BranchGithub,
}

impl From<PullGithub> for PullRequest {
    fn from(pull: PullGithub) -> Self {
        PullRequest {
            title: pull.title,
            body: pull.body,
            head: pull.head.git_ref,
            base: pull.base.git_ref,
            state: pull.state,
        }
    }
}
