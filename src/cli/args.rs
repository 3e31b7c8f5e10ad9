// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for Metroflow.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Metroflow - metro housing and migration cohort analysis
#[derive(Parser, Debug)]
#[command(name = "metroflow")]
#[command(version, about = "Metro housing-price and migration cohort analysis")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use cached source data under the data directory instead of fetching
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch Census net-migration history and build the tidy migration table
    Migration(MigrationArgs),

    /// Pre-pandemic parallel-trends check on cohort housing prices (2010-2019)
    PreTrend(PreTrendArgs),

    /// Post-shock cohort hierarchy with min/max bands (March 2020 baseline)
    Hierarchy(HierarchyArgs),

    /// Price-vs-migration regression for the wealth-exporter cohort
    Mechanism(MechanismArgs),

    /// Run every analysis in sequence, reusing a single ZHVI fetch
    Report(ReportArgs),

    /// Cohort list management
    Cohorts(CohortsArgs),
}

/// Arguments for the migration subcommand
#[derive(clap::Args, Debug, Default)]
pub struct MigrationArgs {
    /// Write the tidy CSV only, skip the chart
    #[arg(long)]
    pub no_chart: bool,
}

/// Arguments for the pre-trend subcommand
#[derive(clap::Args, Debug, Default)]
pub struct PreTrendArgs {}

/// Arguments for the hierarchy subcommand
#[derive(clap::Args, Debug)]
pub struct HierarchyArgs {
    /// First year shown on the chart
    #[arg(long, default_value_t = 2018)]
    pub since: i32,
}

impl Default for HierarchyArgs {
    fn default() -> Self {
        Self { since: 2018 }
    }
}

/// Arguments for the mechanism subcommand
#[derive(clap::Args, Debug)]
pub struct MechanismArgs {
    /// Representative city for the dual-axis chart
    #[arg(long, default_value = "San Francisco")]
    pub city: String,

    /// Path to the migration history CSV (defaults to the migration command output)
    #[arg(long)]
    pub migration_csv: Option<PathBuf>,
}

impl Default for MechanismArgs {
    fn default() -> Self {
        Self {
            city: "San Francisco".to_string(),
            migration_csv: None,
        }
    }
}

/// Arguments for the report subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ReportArgs {
    /// First year shown on the hierarchy chart
    #[arg(long, default_value_t = 2018)]
    pub since: i32,

    /// Representative city for the mechanism chart
    #[arg(long, default_value = "San Francisco")]
    pub city: String,
}

/// Arguments for cohort management
#[derive(clap::Args, Debug)]
pub struct CohortsArgs {
    #[command(subcommand)]
    pub command: CohortsCommands,
}

/// Cohorts subcommands
#[derive(Subcommand, Debug)]
pub enum CohortsCommands {
    /// List known cohorts
    List {
        /// Show member metros as well
        #[arg(short = 'd', long)]
        detailed: bool,
    },

    /// Show a cohort's metros and derived city keys
    Show {
        /// Key of the cohort to show
        key: String,
    },
}
