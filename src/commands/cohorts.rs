// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Cohorts command
//!
//! Lists and inspects the hand-maintained cohort definitions.

use crate::cli::{CohortsArgs, CohortsCommands};
use crate::cohorts::CohortRegistry;
use crate::error::Result;

/// Execute the cohorts command
pub fn execute(args: &CohortsArgs) -> Result<()> {
    let registry = CohortRegistry::load()?;

    match &args.command {
        CohortsCommands::List { detailed } => {
            println!("\nCohorts:\n");
            for cohort in registry.iter() {
                println!("  {} - {} ({} metros)", cohort.key, cohort.label, cohort.metros.len());
                if *detailed {
                    for metro in &cohort.metros {
                        println!("      {}", metro);
                    }
                }
            }
            println!("\nOverride in ~/.metroflow/cohorts.toml or ./.metroflow/cohorts.toml\n");
        }
        CohortsCommands::Show { key } => {
            let cohort = registry.require(key)?;
            println!("\n{}", cohort.label);
            println!("key: {}\n", cohort.key);
            println!("{:<28} {}", "Metro (ZHVI scheme)", "City key (Census scheme)");
            for (metro, simple) in cohort.metros.iter().zip(cohort.simple_names()) {
                println!("{:<28} {}", metro, simple);
            }
            println!();
        }
    }

    Ok(())
}
