//! In-memory forge backed by local repositories
#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Mutex,
};

use repo_transfer::{
    platform::{Platform, PlatformFuture},
    utils::{NewPullRequest, Organization, PullRequest, PullRequestState, Repo},
    TransferError, TransferErrorKind,
};

/// Key of a repository: owner and name
type Key = (String, String);

pub struct FakeForge {
    /// Directory holding the repositories
    root: PathBuf,

    /// Known organizations
    orgs: HashSet<String>,

    /// Repositories by owner and name
    repos: Mutex<HashMap<Key, Repo>>,

    /// Pull requests listed for each repository
    pulls: Mutex<HashMap<Key, Vec<PullRequest>>>,

    /// Pull requests created through the API
    pub created_pulls: Mutex<Vec<(Key, NewPullRequest)>>,

    /// Number of visibility edits sent
    pub visibility_edits: Mutex<usize>,

    /// Make every name look taken
    pub all_names_taken: bool,

    /// Hand out push URLs that don't exist
    pub broken_push_url: bool,

    /// Refuse every repository creation
    pub fail_create: bool,

    /// Fail when listing pull requests
    pub fail_pull_listing: bool,
}

impl FakeForge {
    pub fn new(root: &Path, orgs: &[&str]) -> Self {
        Self {
            root: root.to_path_buf(),
            orgs: orgs.iter().map(|o| o.to_string()).collect(),
            repos: Mutex::new(HashMap::new()),
            pulls: Mutex::new(HashMap::new()),
            created_pulls: Mutex::new(vec![]),
            visibility_edits: Mutex::new(0),
            all_names_taken: false,
            broken_push_url: false,
            fail_create: false,
            fail_pull_listing: false,
        }
    }

    /// Register a repository without creating anything on disk
    pub fn insert_repo(&self, owner: &str, name: &str, ssh_url: &str, private: bool) {
        self.repos.lock().unwrap().insert(
            (owner.to_string(), name.to_string()),
            Repo {
                owner: owner.to_string(),
                name: name.to_string(),
                html_url: format!("https://forge.test/{owner}/{name}"),
                ssh_url: ssh_url.to_string(),
                private,
            },
        );
    }

    /// Create a working repository with one commit per branch, and register it
    pub fn seed_source(&self, owner: &str, name: &str, branches: &[&str], tags: &[&str]) -> PathBuf {
        let path = self.root.join(owner).join(name);
        let repo = git2::Repository::init(&path).unwrap();
        let sig = git2::Signature::now("Source", "source@example.com").unwrap();
        let mut parent: Option<git2::Oid> = None;
        for (idx, branch) in branches.iter().enumerate() {
            let blob = repo
                .blob(format!("content of {branch}\n").as_bytes())
                .unwrap();
            let mut builder = repo.treebuilder(None).unwrap();
            builder
                .insert(format!("file{idx}.txt"), blob, 0o100644)
                .unwrap();
            let tree = repo.find_tree(builder.write().unwrap()).unwrap();
            let parents: Vec<git2::Commit<'_>> = parent
                .map(|oid| repo.find_commit(oid).unwrap())
                .into_iter()
                .collect();
            let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
            let oid = repo
                .commit(
                    Some(format!("refs/heads/{branch}").as_str()),
                    &sig,
                    &sig,
                    &format!("commit on {branch}"),
                    &tree,
                    &parent_refs,
                )
                .unwrap();
            parent = Some(oid);
        }
        if let (Some(first), Some(oid)) = (branches.first(), parent) {
            repo.set_head(&format!("refs/heads/{first}")).unwrap();
            for tag in tags {
                repo.reference(&format!("refs/tags/{tag}"), oid, false, "tag")
                    .unwrap();
            }
        }
        self.insert_repo(owner, name, &path.to_string_lossy(), true);
        path
    }

    pub fn add_pull(&self, owner: &str, name: &str, title: &str, head: &str, base: &str) {
        self.add_pull_with_state(owner, name, title, head, base, PullRequestState::Open);
    }

    pub fn add_pull_with_state(
        &self,
        owner: &str,
        name: &str,
        title: &str,
        head: &str,
        base: &str,
        state: PullRequestState,
    ) {
        self.pulls
            .lock()
            .unwrap()
            .entry((owner.to_string(), name.to_string()))
            .or_default()
            .push(PullRequest {
                title: title.to_string(),
                body: Some(format!("{title} body")),
                head: head.to_string(),
                base: base.to_string(),
                state,
            });
    }

    pub fn repo(&self, owner: &str, name: &str) -> Option<Repo> {
        self.repos
            .lock()
            .unwrap()
            .get(&(owner.to_string(), name.to_string()))
            .cloned()
    }

    pub fn repos_of(&self, owner: &str) -> Vec<Repo> {
        let mut repos: Vec<Repo> = self
            .repos
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        repos.sort_by(|a, b| a.name.cmp(&b.name));
        repos
    }

    fn not_found(owner: &str, name: &str) -> TransferError {
        TransferError::new(TransferErrorKind::RepoNotFound)
            .with_text(&format!("404 - {owner}/{name}"))
    }
}

/// Every ref of the repository at `path`, with its target
pub fn ref_set(path: &Path) -> BTreeMap<String, git2::Oid> {
    let repo = git2::Repository::open(path).unwrap();
    let mut refs = BTreeMap::new();
    for reference in repo.references().unwrap() {
        let reference = reference.unwrap();
        let name = reference.name().unwrap().to_string();
        let target = reference.peel_to_commit().unwrap().id();
        refs.insert(name, target);
    }
    refs
}

impl Platform for FakeForge {
    fn get_organization(&self, org: &str) -> PlatformFuture<'_, Organization> {
        let org = org.to_string();
        Box::pin(async move {
            if self.orgs.contains(&org) {
                Ok(Organization { login: org })
            } else {
                Err(TransferError::new(TransferErrorKind::GetOrganization)
                    .with_text(&format!("404 - {org}")))
            }
        })
    }

    fn create_repo(&self, org: &str, name: &str, private: bool) -> PlatformFuture<'_, Repo> {
        let (org, name) = (org.to_string(), name.to_string());
        Box::pin(async move {
            if self.fail_create {
                return Err(TransferError::new(TransferErrorKind::RepoCreation)
                    .with_text("403 - Resource not accessible by integration"));
            }
            if self.repo(&org, &name).is_some() {
                return Err(TransferError::new(TransferErrorKind::RepoCreation)
                    .with_text("422 - name already exists on this account"));
            }
            let path = self.root.join(&org).join(format!("{name}.git"));
            git2::Repository::init_bare(&path)?;
            let ssh_url = if self.broken_push_url {
                self.root.join("nowhere").join("missing.git")
            } else {
                path
            };
            self.insert_repo(&org, &name, &ssh_url.to_string_lossy(), private);
            self.repo(&org, &name)
                .ok_or_else(|| Self::not_found(&org, &name))
        })
    }

    fn get_repo(&self, owner: &str, name: &str) -> PlatformFuture<'_, Repo> {
        let (owner, name) = (owner.to_string(), name.to_string());
        Box::pin(async move {
            if self.all_names_taken {
                return Ok(Repo {
                    owner: owner.clone(),
                    name: name.clone(),
                    ..Default::default()
                });
            }
            self.repo(&owner, &name)
                .ok_or_else(|| Self::not_found(&owner, &name))
        })
    }

    fn get_all_repos(&self, org: &str) -> PlatformFuture<'_, Vec<Repo>> {
        let org = org.to_string();
        Box::pin(async move { Ok(self.repos_of(&org)) })
    }

    fn set_visibility(
        &self,
        owner: &str,
        name: &str,
        private: bool,
    ) -> PlatformFuture<'_, Repo> {
        let key = (owner.to_string(), name.to_string());
        Box::pin(async move {
            *self.visibility_edits.lock().unwrap() += 1;
            let mut repos = self.repos.lock().unwrap();
            match repos.get_mut(&key) {
                Some(repo) => {
                    repo.private = private;
                    Ok(repo.clone())
                }
                None => Err(Self::not_found(&key.0, &key.1)),
            }
        })
    }

    fn delete_repo(&self, owner: &str, name: &str) -> PlatformFuture<'_, ()> {
        let key = (owner.to_string(), name.to_string());
        Box::pin(async move {
            match self.repos.lock().unwrap().remove(&key) {
                Some(_) => Ok(()),
                None => Err(Self::not_found(&key.0, &key.1)),
            }
        })
    }

    fn get_open_pull_requests(
        &self,
        owner: &str,
        name: &str,
    ) -> PlatformFuture<'_, Vec<PullRequest>> {
        let key = (owner.to_string(), name.to_string());
        Box::pin(async move {
            if self.fail_pull_listing {
                return Err(TransferError::new(TransferErrorKind::GetPullRequests)
                    .with_text("502 - Bad Gateway"));
            }
            Ok(self
                .pulls
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn create_pull_request(
        &self,
        owner: &str,
        name: &str,
        pull_request: NewPullRequest,
    ) -> PlatformFuture<'_, PullRequest> {
        let key = (owner.to_string(), name.to_string());
        Box::pin(async move {
            let repo = self
                .repo(&key.0, &key.1)
                .ok_or_else(|| Self::not_found(&key.0, &key.1))?;
            let (head_owner, branch) = pull_request
                .head
                .split_once(':')
                .unwrap_or(("", pull_request.head.as_str()));
            let mirrored = match git2::Repository::open_bare(&repo.ssh_url) {
                Ok(mirror) => {
                    let found = mirror.find_reference(&format!("refs/heads/{branch}")).is_ok();
                    found
                }
                Err(_) => false,
            };
            if head_owner != key.0 || !mirrored {
                return Err(TransferError::new(TransferErrorKind::PullRequestCreation)
                    .with_text(&format!("422 - head {} is invalid", pull_request.head)));
            }
            let created = PullRequest {
                title: pull_request.title.clone(),
                body: pull_request.body.clone(),
                head: branch.to_string(),
                base: pull_request.base.clone(),
                state: PullRequestState::Open,
            };
            self.created_pulls.lock().unwrap().push((key, pull_request));
            Ok(created)
        })
    }
}
