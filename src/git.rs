//! Git subprocesses and the local mirror workspace
use std::{
    fs::remove_dir_all,
    path::{Path, PathBuf},
    process::Stdio,
};

use log::{debug, info, warn};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::errors::{TransferError, TransferErrorKind};

/// Suffix of the mirror workspace directory
pub const MIRROR_SUFFIX: &str = ".git";

/// Refs managed by the forge itself, refused on push
pub const HIDDEN_REF_PREFIXES: [&str; 1] = ["refs/pull/"];

/// Runs git commands, checking their exit status
#[derive(Debug, Clone)]
pub struct GitRunner {
    /// Git executable
    program: String,

    /// Maximum duration of one command
    timeout: Duration,
}

impl GitRunner {
    /// Create a runner using the `git` found in `PATH`
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
        }
    }

    /// Run git with `args` inside `cwd`
    /// # Errors
    /// Error if git can't be spawned, exits with a non-zero status or times out
    pub async fn run(&self, args: &[&str], cwd: &Path) -> Result<String, TransferError> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        debug!("Running `{command_line}` in {}", cwd.display());
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(TransferError::new_with_source(
                    &format!("Unable to run `{command_line}`"),
                    e,
                ))
            }
            Err(_) => {
                return Err(TransferError::new(TransferErrorKind::Timeout {
                    command: command_line,
                }))
            }
        };
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransferError::new(TransferErrorKind::GitCommand {
                command: command_line,
                code: output.status.code(),
            })
            .with_text(stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Bare clone of every ref of `url` into the workspace
    /// # Errors
    /// Error if the clone fails
    pub async fn clone_mirror(
        &self,
        url: &str,
        workspace: &MirrorWorkspace,
    ) -> Result<(), TransferError> {
        self.run(
            &["clone", "--mirror", url, workspace.dir_name()],
            workspace.parent(),
        )
        .await?;
        Ok(())
    }

    /// Point the `origin` remote of the workspace to `url`
    /// # Errors
    /// Error if the remote can't be changed
    pub async fn set_origin(
        &self,
        url: &str,
        workspace: &MirrorWorkspace,
    ) -> Result<(), TransferError> {
        self.run(&["remote", "set-url", "origin", url], workspace.path())
            .await?;
        Ok(())
    }

    /// Push every ref of the workspace to `origin` with mirror semantics
    /// # Errors
    /// Error if the push fails
    pub async fn push_mirror(&self, workspace: &MirrorWorkspace) -> Result<(), TransferError> {
        self.run(&["push", "--mirror"], workspace.path()).await?;
        Ok(())
    }
}

/// Directory holding the bare mirror of the source repository.
///
/// Acquiring removes any stale directory with the same name, dropping removes the directory.
#[derive(Debug)]
pub struct MirrorWorkspace {
    /// Directory containing the workspace
    parent: PathBuf,

    /// Name of the workspace directory
    dir_name: String,

    /// Workspace directory
    path: PathBuf,
}

impl MirrorWorkspace {
    /// Reserve `<root>/<repo_name>.git`, removing what was left there
    /// # Errors
    /// Error if `repo_name` isn't a single path component or the stale directory can't be removed
    pub fn acquire(root: &Path, repo_name: &str) -> Result<Self, TransferError> {
        if repo_name.is_empty()
            || repo_name == "."
            || repo_name == ".."
            || repo_name.contains(['/', '\\'])
        {
            return Err(TransferError::new(TransferErrorKind::Config)
                .with_text(&format!("Invalid repository name {repo_name:?}")));
        }
        let dir_name = format!("{repo_name}{MIRROR_SUFFIX}");
        let path = root.join(&dir_name);
        if path.exists() {
            info!("Removing stale workspace {}", path.display());
            remove_dir_all(&path).map_err(|e| {
                TransferError::new_with_source("Unable to remove stale workspace", e)
            })?;
        }
        Ok(Self {
            parent: root.to_path_buf(),
            dir_name,
            path,
        })
    }

    /// Workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the workspace
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// Name of the workspace directory inside its parent
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// Names of every ref in the mirror
    /// # Errors
    /// Error if the mirror can't be opened
    pub fn refs(&self) -> Result<Vec<String>, TransferError> {
        let repo = git2::Repository::open_bare(&self.path)?;
        let mut names = vec![];
        for reference in repo.references()? {
            if let Some(name) = reference?.name() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete refs owned by the forge so the mirror push doesn't get rejected
    /// # Errors
    /// Error if the mirror can't be opened or a ref can't be deleted
    pub fn prune_hidden_refs(&self) -> Result<usize, TransferError> {
        let repo = git2::Repository::open_bare(&self.path)?;
        let mut hidden = vec![];
        for reference in repo.references()? {
            if let Some(name) = reference?.name() {
                if HIDDEN_REF_PREFIXES.iter().any(|p| name.starts_with(p)) {
                    hidden.push(name.to_string());
                }
            }
        }
        for name in &hidden {
            repo.find_reference(name)?.delete()?;
        }
        let pruned = hidden.len();
        if pruned > 0 {
            debug!("Pruned {pruned} hidden refs from {}", self.path.display());
        }
        Ok(pruned)
    }
}

impl Drop for MirrorWorkspace {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        info!("Cleaning up {}", self.path.display());
        if let Err(e) = remove_dir_all(&self.path) {
            warn!("Unable to remove {}: {e}", self.path.display());
        }
    }
}
