//! GitHub API module.
pub(crate) mod platform;
pub(crate) mod repo;

pub use platform::GithubPlatform;

/// GitHub API URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub API Header
const GITHUB_API_HEADER: &str = "X-GitHub-Api-Version";

/// GitHub API Version
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Page size used for listings
const PER_PAGE: &str = "100";
