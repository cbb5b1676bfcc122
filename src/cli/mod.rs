//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! githublab-harvest binary.

use clap::{ArgAction, Parser, Subcommand};

/// Harvest CodeMeta metadata from GitHub and GitLab repositories.
#[derive(Parser, Debug)]
#[command(name = "githublab-harvest", about = "GitHub/GitLab CodeMeta harvester", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// GitHub access token.
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitLab access token.
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Harvest CodeMeta metadata for a repository.
    Harvest {
        /// Repository URL, SSH remote, or local checkout.
        path: String,

        /// Skip the contributor lookup.
        #[arg(long)]
        no_contributors: bool,
    },

    /// Show which provider and project a path resolves to.
    Detect {
        /// Repository URL, SSH remote, or local checkout.
        path: String,
    },
}
