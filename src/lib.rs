//! # repo-transfer
//!
//! Copy a repository, with its full history and its open pull requests, from one
//! organization to another. Also lists, deletes and changes the visibility of the
//! repositories of an organization.
//!
//! ## Usage
//!
//! ```txt
//! Usage: repo-transfer [OPTIONS] [COMMAND]
//!
//! Commands:
//!   copy        Copy a repository
//!   list        List repositories in organization
//!   delete      Delete a repository
//!   visibility  Change repository visibility
//!   help        Print this message or the help of the given subcommand(s)
//!
//! Options:
//!   -c, --config <CONFIG>  Custom configuration file path
//!       --show-config-path Show the current config path
//!   -v, --verbose...       Verbose mode (-v, -vv)
//!   -h, --help             Print help
//!   -V, --version          Print version
//! ```
//!
//! The access token is read from the `GITHUB_PAT` environment variable.

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod commands;
pub mod config;
pub mod copy;
pub mod errors;
pub mod git;
pub mod github;
pub mod platform;
pub mod pulls;
pub mod utils;

pub use cli::{run, TransferCli};
pub use config::TransferConfig;
pub use errors::{TransferError, TransferErrorKind};
pub use platform::Platform;
