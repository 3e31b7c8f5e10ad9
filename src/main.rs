// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Metroflow - metro housing and migration cohort analysis
//!
//! Entry point for the Metroflow CLI application.

use clap::Parser;

use metroflow::cli::{Cli, Commands};
use metroflow::commands;
use metroflow::config::Settings;
use metroflow::error::Result;
use metroflow::utils;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // Practical debug toggle: `-v` enables pipeline diagnostics without requiring
    // users to know target names up front. `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        for directive in [
            "metroflow.match=debug",
            "metroflow.panel=debug",
            "metroflow.zillow=debug",
            "metroflow.census=debug",
            "metroflow.migration=debug",
        ] {
            if let Ok(parsed) = directive.parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", utils::format_error(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load settings
    let settings = Settings::load()?;

    // Ensure directories exist
    Settings::ensure_directories()?;

    // Dispatch to appropriate command
    let offline = cli.offline;
    match cli.command {
        Commands::Migration(args) => {
            commands::migration::execute(&args, &settings, offline).await?;
        }
        Commands::PreTrend(args) => {
            commands::pre_trend::execute(&args, &settings, offline).await?;
        }
        Commands::Hierarchy(args) => {
            commands::hierarchy::execute(&args, &settings, offline).await?;
        }
        Commands::Mechanism(args) => {
            commands::mechanism::execute(&args, &settings, offline).await?;
        }
        Commands::Report(args) => {
            commands::report::execute(&args, &settings, offline).await?;
        }
        Commands::Cohorts(args) => {
            commands::cohorts::execute(&args)?;
        }
    }

    Ok(())
}
