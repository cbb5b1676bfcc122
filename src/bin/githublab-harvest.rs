//! githublab-harvest CLI binary.
//!
//! A command-line host for the harvester: resolves a repository path and
//! prints the harvested CodeMeta record.

use std::process::ExitCode;

use clap::Parser;
use githublab_harvest::cli::{Cli, Command};
use githublab_harvest::output::PrettyPrint;
use githublab_harvest::{HarvestConfig, Harvester};
use serde::Serialize;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(Harvester::new(config), cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.status_code() == Some(401) || e.status_code() == Some(403) {
                eprintln!("Hint: Set GITHUB_TOKEN or GITLAB_TOKEN environment variable");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> githublab_harvest::Result<HarvestConfig> {
    let mut config = HarvestConfig::from_env()?;
    if let Some(token) = &cli.github_token {
        config = config.with_github_token(token.clone());
    }
    if let Some(token) = &cli.gitlab_token {
        config = config.with_gitlab_token(token.clone());
    }
    if let Command::Harvest {
        no_contributors: true,
        ..
    } = cli.command
    {
        config = config.with_contributors(false);
    }
    Ok(config)
}

async fn run(harvester: Harvester, cli: Cli) -> githublab_harvest::Result<()> {
    match cli.command {
        Command::Harvest { path, .. } => {
            let record = harvester.harvest(&path).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record.to_document())?);
            } else {
                println!("{}", record.pretty_print());
            }
        }
        Command::Detect { path } => {
            let reference = harvester.detect(&path)?;
            output_single(&reference, cli.json)?;
        }
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> githublab_harvest::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}
