//! Command line options for the repo-transfer tool
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use crate::{
    commands::{delete_repo, list_repos, set_visibility, CommandOutcome},
    config::TransferConfig,
    copy::{copy_repo, CopyContext, CopyOutcome, CopyRequest},
    errors::TransferError,
    utils::{RepositoryIdentity, StdinPrompt},
};

/// repo-transfer - Copy a repository and its open pull requests to another organization
#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct TransferCli {
    /// Command to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Custom configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show the current config path
    #[arg(long)]
    pub show_config_path: bool,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Copy a repository
    Copy {
        /// Make repository public (default is private)
        #[arg(long)]
        public: bool,

        /// Name of the source repository
        #[arg(long = "source_repo", visible_alias = "source-repo")]
        source_repo: Option<String>,

        /// Owner of the source repository
        #[arg(long = "source_org", visible_alias = "source-org")]
        source_org: Option<String>,

        /// Target organization name
        #[arg(long)]
        org: Option<String>,
    },

    /// List repositories in organization
    List {
        /// Organization name
        #[arg(long)]
        org: Option<String>,
    },

    /// Delete a repository
    Delete {
        /// Name of the repository to delete
        repo_name: String,

        /// Organization name
        #[arg(long)]
        org: Option<String>,

        /// Force delete without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Change repository visibility
    Visibility {
        /// Name of the repository
        repo_name: String,

        /// Organization name
        #[arg(long)]
        org: Option<String>,

        /// Make repository public (default is private)
        #[arg(long)]
        public: bool,
    },
}

/// Run the repo-transfer tool with the provided command line options
/// # Errors
/// Error if the configuration is invalid or the command fails
pub async fn run(cli_args: TransferCli) -> Result<(), TransferError> {
    if cli_args.show_config_path {
        println!("{}", TransferConfig::resolve_path(&cli_args)?.display());
        return Ok(());
    }
    let Some(command) = cli_args.command.clone() else {
        TransferCli::command().print_help()?;
        return Ok(());
    };
    let config = TransferConfig::try_new(&cli_args)?;
    let data = &config.config_data;
    let platform = config.platform()?;
    let org_or_default = |org: Option<String>| org.unwrap_or_else(|| data.target_org.clone());
    match command {
        Commands::Copy {
            public,
            source_repo,
            source_org,
            org,
        } => {
            let source_name = source_repo.unwrap_or_else(|| data.default_source_repo.clone());
            let request = CopyRequest {
                confirm: source_name != data.default_source_repo,
                source: RepositoryIdentity::new(
                    source_org.unwrap_or_else(|| data.source_org.clone()),
                    source_name,
                ),
                destination_org: org_or_default(org),
                public,
            };
            let git = config.git_runner();
            let context = CopyContext {
                platform: &platform,
                git: &git,
                workspace_root: config.workspace_root(),
                name_attempts: data.name_attempts,
            };
            match copy_repo(&context, &request, &mut StdinPrompt).await? {
                CopyOutcome::Declined => println!("Aborting"),
                CopyOutcome::Copied(report) => {
                    let pulls = &report.pull_requests;
                    for (title, e) in &pulls.failed {
                        println!("Warning: Could not create PR {title}: {e}");
                    }
                    println!(
                        "Recreated {}/{} open pull requests",
                        pulls.created.len(),
                        pulls.total()
                    );
                    if public {
                        println!(
                            "Repository {} is now {}",
                            report.destination.name,
                            report.destination.visibility()
                        );
                    }
                    println!("Copy complete! {}", report.destination.html_url);
                }
            }
        }
        Commands::List { org } => {
            for repo in list_repos(&platform, &org_or_default(org)).await? {
                println!("- {} ({})", repo.name, repo.html_url);
            }
        }
        Commands::Delete {
            repo_name,
            org,
            force,
        } => {
            let org = org_or_default(org);
            match delete_repo(&platform, &org, &repo_name, force, &mut StdinPrompt).await? {
                CommandOutcome::Completed => {
                    println!("Repository {repo_name} has been deleted.");
                }
                CommandOutcome::Declined => println!("Deletion cancelled."),
            }
        }
        Commands::Visibility {
            repo_name,
            org,
            public,
        } => {
            let repo = set_visibility(&platform, &org_or_default(org), &repo_name, public).await?;
            println!("Repository {} is now {}", repo.name, repo.visibility());
        }
    }
    Ok(())
}
