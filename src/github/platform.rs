//! Github Platform
use super::{GITHUB_API_HEADER, GITHUB_API_VERSION, PER_PAGE};
use crate::{
    errors::{TransferError, TransferErrorKind},
    github::repo::{OwnerGithub, PullGithub, RepoCreationGithub, RepoEditionGithub, RepoGithub},
    platform::{Platform, PlatformFuture},
    utils::{NewPullRequest, Organization, PullRequest, Repo},
};
use log::debug;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
    Method, RequestBuilder, Response, StatusCode,
};
use std::time::Duration;
use url::Url;
use urlencoding::encode;

/// Github Platform
#[derive(Debug, Clone)]
pub struct GithubPlatform {
    /// Github token
    token: String,

    /// Base URL of the API, always ending with a slash
    api_url: Url,

    /// Reqwest client
    client: reqwest::Client,
}

impl GithubPlatform {
    /// Create a new GithubPlatform
    /// # Errors
    /// Error if the HTTP client can't be built
    pub fn new(token: String, api_url: Url, timeout: Duration) -> Result<Self, TransferError> {
        let mut api_url = api_url;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            token,
            api_url,
            client,
        })
    }

    /// Build an authenticated request to an API path
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, TransferError> {
        let url = self.api_url.join(path)?;
        debug!("{method} {url}");
        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, env!("CARGO_PKG_NAME"))
            .header(GITHUB_API_HEADER, GITHUB_API_VERSION))
    }

    /// Fetch every page of a listing until an empty page is returned
    async fn get_all_pages<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        kind: TransferErrorKind,
    ) -> Result<Vec<T>, TransferError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut page: usize = 1;
        let mut all_items = vec![];
        loop {
            let page_str = page.to_string();
            let response = self
                .request(Method::GET, path)?
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page_str.as_str())])
                .send()
                .await?;
            let response = check_status(response, kind.clone()).await?;
            let text = response.text().await?;
            let items: Vec<T> = serde_json::from_str(&text)?;
            debug!("Requested {path} (page {page}): {}", items.len());
            if items.is_empty() {
                break;
            }
            all_items.extend(items);
            page += 1;
        }
        Ok(all_items)
    }
}

/// Path of a repository
fn repo_path(owner: &str, name: &str) -> String {
    format!("repos/{}/{}", encode(owner), encode(name))
}

/// Turn a non-success response into an error of the given kind, 404 being `RepoNotFound`
/// when `kind` targets a single repository
async fn check_status(
    response: Response,
    kind: TransferErrorKind,
) -> Result<Response, TransferError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    let kind = match kind {
        TransferErrorKind::GetRepo
        | TransferErrorKind::RepoEdition
        | TransferErrorKind::RepoDeletion
            if status == StatusCode::NOT_FOUND =>
        {
            TransferErrorKind::RepoNotFound
        }
        kind => kind,
    };
    Err(TransferError::new(kind).with_text(&format!("{status} - {text}")))
}

impl Platform for GithubPlatform {
    fn get_organization(&self, org: &str) -> PlatformFuture<'_, Organization> {
        let path = format!("orgs/{}", encode(org));
        Box::pin(async move {
            let response = self.request(Method::GET, &path)?.send().await?;
            let response = check_status(response, TransferErrorKind::GetOrganization).await?;
            let text = response.text().await?;
            let org: OwnerGithub = serde_json::from_str(&text)?;
            Ok(org.into())
        })
    }

    fn create_repo(&self, org: &str, name: &str, private: bool) -> PlatformFuture<'_, Repo> {
        let path = format!("orgs/{}/repos", encode(org));
        let name = name.to_string();
        Box::pin(async move {
            let body = RepoCreationGithub {
                name: &name,
                private,
            };
            let response = self
                .request(Method::POST, &path)?
                .json(&body)
                .send()
                .await?;
            let response = check_status(response, TransferErrorKind::RepoCreation).await?;
            let text = response.text().await?;
            let repo: RepoGithub = serde_json::from_str(&text)?;
            Ok(repo.into())
        })
    }

    fn get_repo(&self, owner: &str, name: &str) -> PlatformFuture<'_, Repo> {
        let path = repo_path(owner, name);
        Box::pin(async move {
            let response = self.request(Method::GET, &path)?.send().await?;
            let response = check_status(response, TransferErrorKind::GetRepo).await?;
            let text = response.text().await?;
            let repo: RepoGithub = serde_json::from_str(&text)?;
            Ok(repo.into())
        })
    }

    fn get_all_repos(&self, org: &str) -> PlatformFuture<'_, Vec<Repo>> {
        let path = format!("orgs/{}/repos", encode(org));
        Box::pin(async move {
            let repos: Vec<RepoGithub> = self
                .get_all_pages(&path, &[("type", "all")], TransferErrorKind::GetAllRepos)
                .await?;
            Ok(repos.into_iter().map(Repo::from).collect())
        })
    }

    fn set_visibility(
        &self,
        owner: &str,
        name: &str,
        private: bool,
    ) -> PlatformFuture<'_, Repo> {
        let path = repo_path(owner, name);
        Box::pin(async move {
            let response = self
                .request(Method::PATCH, &path)?
                .json(&RepoEditionGithub { private })
                .send()
                .await?;
            let response = check_status(response, TransferErrorKind::RepoEdition).await?;
            let text = response.text().await?;
            let repo: RepoGithub = serde_json::from_str(&text)?;
            Ok(repo.into())
        })
    }

    fn delete_repo(&self, owner: &str, name: &str) -> PlatformFuture<'_, ()> {
        let path = repo_path(owner, name);
        Box::pin(async move {
            let response = self.request(Method::DELETE, &path)?.send().await?;
            check_status(response, TransferErrorKind::RepoDeletion).await?;
            Ok(())
        })
    }

    fn get_open_pull_requests(
        &self,
        owner: &str,
        name: &str,
    ) -> PlatformFuture<'_, Vec<PullRequest>> {
        let path = format!("{}/pulls", repo_path(owner, name));
        Box::pin(async move {
            let pulls: Vec<PullGithub> = self
                .get_all_pages(&path, &[("state", "open")], TransferErrorKind::GetPullRequests)
                .await?;
            Ok(pulls.into_iter().map(PullRequest::from).collect())
        })
    }

    fn create_pull_request(
        &self,
        owner: &str,
        name: &str,
        pull_request: NewPullRequest,
    ) -> PlatformFuture<'_, PullRequest> {
        let path = format!("{}/pulls", repo_path(owner, name));
        Box::pin(async move {
            let response = self
                .request(Method::POST, &path)?
                .json(&pull_request)
                .send()
                .await?;
            let response =
                check_status(response, TransferErrorKind::PullRequestCreation).await?;
            let text = response.text().await?;
            let pull: PullGithub = serde_json::from_str(&text)?;
            Ok(pull.into())
        })
    }
}
