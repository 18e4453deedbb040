//! Error handling for the repo-transfer crate.
use std::{error::Error as StdError, fmt};

/// Error type for the repo-transfer crate.
#[derive(Debug)]
pub struct TransferError {
    /// Inner error.
    inner: Box<Inner>,
}

impl TransferError {
    /// Create a new error.
    pub fn new(kind: TransferErrorKind) -> Self {
        Self {
            inner: Box::new(Inner { kind, source: None }),
        }
    }

    /// Create a new error wrapping a source error.
    pub(crate) fn new_with_source<E>(text: &str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::new(TransferErrorKind::Io).with_source(TextError {
            text: text.to_string(),
            source: source.into(),
        })
    }

    /// Attach a text as the source of the error.
    pub fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Attach a source error.
    pub(crate) fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.inner.source = Some(source.into());
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> &TransferErrorKind {
        &self.inner.kind
    }

    /// Whether the forge reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.inner.kind, TransferErrorKind::RepoNotFound)
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the repo-transfer crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: TransferErrorKind,

    /// Source error.
    source: Option<BoxError>,
}

/// Context text wrapped around a lower level error.
#[derive(Debug)]
struct TextError {
    /// What was being done.
    text: String,

    /// Underlying error.
    source: BoxError,
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.text, self.source)
    }
}

impl StdError for TextError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source)
    }
}

/// Kind of [`TransferError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferErrorKind {
    /// Missing or invalid configuration.
    Config,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Local filesystem or process error.
    Io,

    /// Error related to git2.
    Git2,

    /// Organization lookup failed.
    GetOrganization,

    /// Repository lookup failed.
    GetRepo,

    /// Repository does not exist.
    RepoNotFound,

    /// Repository creation failed.
    RepoCreation,

    /// Repository edition failed.
    RepoEdition,

    /// Repository deletion failed.
    RepoDeletion,

    /// Repository listing failed.
    GetAllRepos,

    /// Pull request listing failed.
    GetPullRequests,

    /// Pull request creation failed.
    PullRequestCreation,

    /// A git command exited with a non-zero status.
    GitCommand {
        /// Command line that was run.
        command: String,

        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },

    /// A git command did not finish in time.
    Timeout {
        /// Command line that was run.
        command: String,
    },

    /// Every generated destination name was already taken.
    NameExhausted,
}

impl fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferErrorKind::Config => write!(f, "Configuration error"),
            TransferErrorKind::Reqwest => write!(f, "HTTP error"),
            TransferErrorKind::Serde => write!(f, "Invalid JSON"),
            TransferErrorKind::Io => write!(f, "IO error"),
            TransferErrorKind::Git2 => write!(f, "Git error"),
            TransferErrorKind::GetOrganization => write!(f, "Unable to get organization"),
            TransferErrorKind::GetRepo => write!(f, "Unable to get repository"),
            TransferErrorKind::RepoNotFound => write!(f, "Repository not found"),
            TransferErrorKind::RepoCreation => write!(f, "Unable to create repository"),
            TransferErrorKind::RepoEdition => write!(f, "Unable to edit repository"),
            TransferErrorKind::RepoDeletion => write!(f, "Unable to delete repository"),
            TransferErrorKind::GetAllRepos => write!(f, "Unable to list repositories"),
            TransferErrorKind::GetPullRequests => write!(f, "Unable to list pull requests"),
            TransferErrorKind::PullRequestCreation => write!(f, "Unable to create pull request"),
            TransferErrorKind::GitCommand {
                command,
                code: Some(code),
            } => write!(f, "`{command}` exited with status {code}"),
            TransferErrorKind::GitCommand {
                command,
                code: None,
            } => write!(f, "`{command}` was terminated by a signal"),
            TransferErrorKind::Timeout { command } => write!(f, "`{command}` timed out"),
            TransferErrorKind::NameExhausted => {
                write!(f, "Unable to find a free destination name")
            }
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.source {
            Some(source) => write!(f, "{}: {}", self.inner.kind, source),
            None => write!(f, "{}", self.inner.kind),
        }
    }
}

impl StdError for TransferError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<&str> for TransferError {
    fn from(text: &str) -> Self {
        Self::new(TransferErrorKind::Config).with_text(text)
    }
}

impl From<String> for TransferError {
    fn from(text: String) -> Self {
        Self::new(TransferErrorKind::Config).with_text(&text)
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(TransferErrorKind::Reqwest).with_source(e)
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(TransferErrorKind::Serde).with_source(e)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(e: std::io::Error) -> Self {
        Self::new(TransferErrorKind::Io).with_source(e)
    }
}

impl From<git2::Error> for TransferError {
    fn from(e: git2::Error) -> Self {
        Self::new(TransferErrorKind::Git2).with_source(e)
    }
}

impl From<toml::de::Error> for TransferError {
    fn from(e: toml::de::Error) -> Self {
        Self::new(TransferErrorKind::Config).with_source(e)
    }
}

impl From<url::ParseError> for TransferError {
    fn from(e: url::ParseError) -> Self {
        Self::new(TransferErrorKind::Config).with_source(e)
    }
}
