//! Copy a repository, history and open pull requests, to another organization
use std::path::PathBuf;

use log::{debug, info};

use crate::{
    commands::set_visibility,
    errors::{TransferError, TransferErrorKind},
    git::{GitRunner, MirrorWorkspace},
    platform::Platform,
    pulls::{replicate_pull_requests, ReplicationReport},
    utils::{destination_name, Prompt, Repo, RepositoryIdentity},
};

/// What to copy and where
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// Repository to copy
    pub source: RepositoryIdentity,

    /// Organization receiving the copy
    pub destination_org: String,

    /// Make the copy public once done
    pub public: bool,

    /// Ask the operator before copying
    pub confirm: bool,
}

/// Everything needed to run a copy
pub struct CopyContext<'a> {
    /// Forge API
    pub platform: &'a dyn Platform,

    /// Git subprocess runner
    pub git: &'a GitRunner,

    /// Directory receiving the mirror workspace
    pub workspace_root: PathBuf,

    /// How many destination names to try before giving up
    pub name_attempts: usize,
}

/// Result of a completed copy
#[derive(Debug)]
pub struct CopyReport {
    /// The new repository
    pub destination: Repo,

    /// Refs pushed to the new repository
    pub refs: Vec<String>,

    /// Pull requests recreated on the new repository
    pub pull_requests: ReplicationReport,
}

/// How a copy ended
#[derive(Debug)]
pub enum CopyOutcome {
    /// The operator declined
    Declined,

    /// The repository was copied
    Copied(CopyReport),
}

/// Find a destination name that doesn't exist yet in `org`
/// # Errors
/// Error if the forge can't be queried or every attempt hit an existing repository
pub async fn reserve_destination_name(
    platform: &dyn Platform,
    org: &str,
    source_name: &str,
    attempts: usize,
) -> Result<String, TransferError> {
    for _ in 0..attempts {
        let candidate = destination_name(source_name);
        match platform.get_repo(org, &candidate).await {
            Err(e) if e.is_not_found() => return Ok(candidate),
            Err(e) => return Err(e),
            Ok(_) => debug!("{org}/{candidate} already exists, trying another name"),
        }
    }
    Err(TransferError::new(TransferErrorKind::NameExhausted).with_text(&format!(
        "{attempts} names tried for {source_name} in {org}"
    )))
}

/// Copy a repository: mirror its history into a new private repository, recreate its open
/// pull requests, then optionally make it public.
///
/// The mirror workspace is removed whatever happens.
/// # Errors
/// Error if any step but the creation of a single pull request fails
pub async fn copy_repo(
    context: &CopyContext<'_>,
    request: &CopyRequest,
    prompt: &mut dyn Prompt,
) -> Result<CopyOutcome, TransferError> {
    let source = &request.source;
    let org = request.destination_org.as_str();
    if request.confirm {
        let question = format!(
            "Are you sure you want to copy repo named {} to {org}? (y/N):",
            source.name
        );
        if !prompt.confirm(&question)? {
            return Ok(CopyOutcome::Declined);
        }
    }
    let platform = context.platform;
    platform.get_organization(org).await?;
    let source_repo = platform.get_repo(&source.owner, &source.name).await?;
    let new_name =
        reserve_destination_name(platform, org, &source.name, context.name_attempts).await?;
    info!("Copying {source} to {org}/{new_name}");

    let workspace = MirrorWorkspace::acquire(&context.workspace_root, &source.name)?;
    info!("Cloning {}", source_repo.ssh_url);
    context
        .git
        .clone_mirror(&source_repo.ssh_url, &workspace)
        .await?;
    workspace.prune_hidden_refs()?;
    let refs = workspace.refs()?;

    let destination = platform.create_repo(org, &new_name, true).await?;
    info!("Created {}", destination.html_url);
    context
        .git
        .set_origin(&destination.ssh_url, &workspace)
        .await?;
    info!("Pushing {} refs to {}", refs.len(), destination.ssh_url);
    context.git.push_mirror(&workspace).await?;
    drop(workspace);

    let pull_requests =
        replicate_pull_requests(platform, source, &destination.identity()).await?;
    let destination = if request.public {
        set_visibility(platform, &destination.owner, &destination.name, true).await?
    } else {
        destination
    };
    Ok(CopyOutcome::Copied(CopyReport {
        destination,
        refs,
        pull_requests,
    }))
}
