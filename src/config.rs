//! Configuration handling
use std::{
    fmt,
    fs::read_to_string,
    path::{Path, PathBuf},
    time::Duration,
};

use home::home_dir;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    cli::TransferCli,
    errors::{TransferError, TransferErrorKind},
    git::GitRunner,
    github::{GithubPlatform, GITHUB_API_URL},
};

/// Environment variable holding the access token
pub const TOKEN_ENV_VAR: &str = "GITHUB_PAT";

/// Access token, never printed
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a token, refusing empty values
    /// # Errors
    /// Error if the token is empty
    pub fn new(token: impl Into<String>) -> Result<Self, TransferError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TransferError::new(TransferErrorKind::Config)
                .with_text(&format!("{TOKEN_ENV_VAR} is empty")));
        }
        Ok(Self(token))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(***)")
    }
}

/// Settings read from the configuration file
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ConfigData {
    /// Owner of the repositories to copy
    pub source_org: String,

    /// Repository copied without confirmation
    pub default_source_repo: String,

    /// Organization receiving the copies
    pub target_org: String,

    /// Base URL of the forge API
    pub api_url: String,

    /// Directory receiving the mirror workspace, the system temp dir when unset
    pub workspace_dir: Option<PathBuf>,

    /// Maximum duration of one git command
    pub git_timeout_secs: u64,

    /// Maximum duration of one API call
    pub http_timeout_secs: u64,

    /// How many destination names to try before giving up
    pub name_attempts: usize,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            source_org: "fl97inc".to_string(),
            default_source_repo: "inventory-management-exercise".to_string(),
            target_org: "lila-hiring".to_string(),
            api_url: GITHUB_API_URL.to_string(),
            workspace_dir: None,
            git_timeout_secs: 600,
            http_timeout_secs: 30,
            name_attempts: 5,
        }
    }
}

impl ConfigData {
    /// Read settings from `path`, defaults being used when the file doesn't exist
    /// # Errors
    /// Error if the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, TransferError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = read_to_string(path)
            .map_err(|e| TransferError::new(TransferErrorKind::Config).with_source(e))?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Configuration data
#[derive(Clone, Debug)]
pub struct TransferConfig {
    /// actual configuration data
    pub config_data: ConfigData,

    /// Access token
    token: Token,
}

impl TransferConfig {
    /// Load the configuration: `.env`, token from the environment, then the settings file
    /// # Errors
    /// Error if the token is missing or the settings file is invalid
    pub fn try_new(cli_args: &TransferCli) -> Result<Self, TransferError> {
        dotenv::dotenv().ok();
        let token = std::env::var(TOKEN_ENV_VAR).map_err(|e| {
            TransferError::new(TransferErrorKind::Config)
                .with_text(&format!("{TOKEN_ENV_VAR} is not set: {e}"))
        })?;
        let config_path = Self::resolve_path(cli_args)?;
        let config_data = ConfigData::load(&config_path)?;
        Self::from_parts(config_data, Token::new(token)?)
    }

    /// Assemble a configuration, checking the API URL
    /// # Errors
    /// Error if the API URL is invalid
    pub fn from_parts(config_data: ConfigData, token: Token) -> Result<Self, TransferError> {
        Url::parse(&config_data.api_url)?;
        Ok(Self { config_data, token })
    }

    /// Path given with `--config`, or the default one
    /// # Errors
    /// Error if the home directory can't be found
    pub fn resolve_path(cli_args: &TransferCli) -> Result<PathBuf, TransferError> {
        match &cli_args.config {
            Some(path) => Ok(path.clone()),
            None => Self::get_config_path(),
        }
    }

    /// Get the path to the config file
    /// # Errors
    /// Error if the home directory can't be found
    pub fn get_config_path() -> Result<PathBuf, TransferError> {
        let home_dir = match home_dir() {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Err("Unable to get your home dir! home::home_dir() isn't working".into()),
        };
        Ok(home_dir
            .join(".config")
            .join(concat!(".", env!("CARGO_PKG_NAME")))
            .join("config.toml"))
    }

    /// Directory receiving the mirror workspace
    pub fn workspace_root(&self) -> PathBuf {
        self.config_data
            .workspace_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Build the forge client
    /// # Errors
    /// Error if the API URL is invalid or the client can't be built
    pub fn platform(&self) -> Result<GithubPlatform, TransferError> {
        GithubPlatform::new(
            self.token.0.clone(),
            Url::parse(&self.config_data.api_url)?,
            Duration::from_secs(self.config_data.http_timeout_secs),
        )
    }

    /// Build the git runner
    pub fn git_runner(&self) -> GitRunner {
        GitRunner::new(Duration::from_secs(self.config_data.git_timeout_secs))
    }
}
