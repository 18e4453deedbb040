//! Utility functions and shared records
use std::fmt;

use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::errors::TransferError;

/// Length of the random suffix appended to destination names
pub const SUFFIX_LEN: usize = 6;

/// Repository information
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Repo {
    /// Owner (user or organization) of the repository
    pub owner: String,

    /// Name of the repository
    pub name: String,

    /// Web URL of the repository
    pub html_url: String,

    /// URL used to clone from and push to the repository
    pub ssh_url: String,

    /// Whether the repository is private
    pub private: bool,
}

impl Repo {
    /// Identity of the repository
    pub fn identity(&self) -> RepositoryIdentity {
        RepositoryIdentity::new(&self.owner, &self.name)
    }

    /// Visibility label of the repository
    pub fn visibility(&self) -> &'static str {
        if self.private {
            "private"
        } else {
            "public"
        }
    }
}

/// Organization information
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct Organization {
    /// Login of the organization
    pub login: String,
}

/// Owner and name of a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentity {
    /// Owner (user or organization)
    pub owner: String,

    /// Repository name
    pub name: String,
}

impl RepositoryIdentity {
    /// Create a new identity
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// State of a pull request
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// Still open
    Open,

    /// Closed or merged
    Closed,
}

/// A pull request read from a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Title
    pub title: String,

    /// Description, if any
    pub body: Option<String>,

    /// Branch the changes come from
    pub head: String,

    /// Branch the changes should be merged into
    pub base: String,

    /// State
    pub state: PullRequestState,
}

/// Payload to create a pull request
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Title
    pub title: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Head reference, qualified as `owner:branch`
    pub head: String,

    /// Base branch
    pub base: String,
}

/// Build a destination name: the source name, a dash and a random alphanumeric suffix
pub fn destination_name(source_name: &str) -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{source_name}-{suffix}")
}

/// Yes/no question asked to the operator
pub trait Prompt {
    /// Ask the question, `true` means yes
    /// # Errors
    /// Error if the answer can't be read
    fn confirm(&mut self, question: &str) -> Result<bool, TransferError>;
}

impl<F> Prompt for F
where
    F: FnMut(&str) -> Result<bool, TransferError>,
{
    fn confirm(&mut self, question: &str) -> Result<bool, TransferError> {
        self(question)
    }
}

/// Prompt reading answers from the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool, TransferError> {
        yes_no_input(question)
    }
}

/// Get input from the user
pub(crate) fn input() -> Result<String, TransferError> {
    use std::io::{stdin, stdout, Write};
    let mut s = String::new();
    let _ = stdout().flush();
    stdin()
        .read_line(&mut s)
        .map_err(|e| TransferError::new_with_source("Did not enter a correct string", e))?;
    if let Some('\n') = s.chars().next_back() {
        s.pop();
    }
    if let Some('\r') = s.chars().next_back() {
        s.pop();
    }
    Ok(s)
}

/// Get a yes/no input from the user, anything but yes is a no
pub(crate) fn yes_no_input<S: AsRef<str>>(msg: S) -> Result<bool, TransferError> {
    print!("{} ", msg.as_ref());
    Ok(is_yes(&input()?))
}

/// Whether an answer means yes
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
