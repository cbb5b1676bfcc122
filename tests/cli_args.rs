//! CLI argument parsing tests.

use clap::Parser;
use githublab_harvest::cli::{Cli, Command};

#[test]
fn test_cli_parses_harvest_subcommand() {
    let cli = Cli::parse_from(["githublab-harvest", "harvest", "https://github.com/acme/widget"]);

    assert!(!cli.json);
    match cli.command {
        Command::Harvest {
            path,
            no_contributors,
        } => {
            assert_eq!(path, "https://github.com/acme/widget");
            assert!(!no_contributors);
        }
        _ => panic!("Expected Harvest command"),
    }
}

#[test]
fn test_cli_parses_no_contributors_flag() {
    let cli = Cli::parse_from([
        "githublab-harvest",
        "harvest",
        "git@gitlab.com:acme/tools/gadget.git",
        "--no-contributors",
    ]);

    match cli.command {
        Command::Harvest {
            path,
            no_contributors,
        } => {
            assert_eq!(path, "git@gitlab.com:acme/tools/gadget.git");
            assert!(no_contributors);
        }
        _ => panic!("Expected Harvest command"),
    }
}

#[test]
fn test_cli_parses_detect_subcommand() {
    let cli = Cli::parse_from(["githublab-harvest", "detect", "."]);

    match cli.command {
        Command::Detect { path } => assert_eq!(path, "."),
        _ => panic!("Expected Detect command"),
    }
}

#[test]
fn test_cli_json_flag_is_global() {
    let cli = Cli::parse_from([
        "githublab-harvest",
        "detect",
        "https://github.com/acme/widget",
        "--json",
    ]);
    assert!(cli.json);

    let cli = Cli::parse_from([
        "githublab-harvest",
        "--json",
        "harvest",
        "https://github.com/acme/widget",
    ]);
    assert!(cli.json);
}

#[test]
fn test_cli_counts_verbosity() {
    let cli = Cli::parse_from(["githublab-harvest", "-vv", "detect", "x"]);
    assert_eq!(cli.verbose, 2);
}

#[test]
fn test_cli_accepts_token_flags() {
    let cli = Cli::parse_from([
        "githublab-harvest",
        "--github-token",
        "ghp_example",
        "--gitlab-token",
        "glpat_example",
        "harvest",
        "https://gitlab.com/acme/widget",
    ]);

    assert_eq!(cli.github_token.as_deref(), Some("ghp_example"));
    assert_eq!(cli.gitlab_token.as_deref(), Some("glpat_example"));
}

#[test]
fn test_cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["githublab-harvest"]).is_err());
}

#[test]
fn test_cli_harvest_requires_path() {
    assert!(Cli::try_parse_from(["githublab-harvest", "harvest"]).is_err());
}
