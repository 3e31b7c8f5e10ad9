// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mechanism command
//!
//! Joins the tidy migration table to annualized housing prices and runs the
//! price-vs-migration regression.

use std::path::PathBuf;

use super::{print_saved, print_warning};
use crate::analysis::mechanism::{self as mechanism_analysis, MechanismReport};
use crate::cli::MechanismArgs;
use crate::cohorts::CohortRegistry;
use crate::config::Settings;
use crate::error::{MetroflowError, Result};
use crate::panel;
use crate::report::{chart, summary};
use crate::sources::ZillowClient;
use crate::utils;

/// Execute the mechanism command
pub async fn execute(args: &MechanismArgs, settings: &Settings, offline: bool) -> Result<()> {
    let registry = CohortRegistry::load()?;
    utils::ensure_dir(&settings.paths.data_dir)?;
    utils::ensure_dir(&settings.paths.output_dir)?;

    let csv_path: PathBuf = args
        .migration_csv
        .clone()
        .unwrap_or_else(|| settings.migration_csv_path());
    if !csv_path.exists() {
        return Err(MetroflowError::InvalidInput(format!(
            "Migration table not found at {}. Run `metroflow migration` first.",
            csv_path.display()
        )));
    }
    let migration = panel::read_migration_csv(&csv_path)?;

    let client = ZillowClient::new(settings)?;
    let table = client.load(&settings.zhvi_cache_path(), offline).await?;

    let report = mechanism_analysis::run(&table, &registry, &migration)?;
    render(&report, settings, &args.city)?;
    Ok(())
}

/// Render the regression results file and the dual-axis city chart.
pub fn render(report: &MechanismReport, settings: &Settings, city: &str) -> Result<()> {
    let text = summary::regression_summary(&report.fit);
    let results_path = settings.paths.output_dir.join("regression_results.txt");
    summary::write_text(&results_path, &text)?;
    print_saved("Regression results", &results_path)?;
    println!("\n{}", text);

    let series = report.city_series(city);
    if series.is_empty() {
        print_warning(&format!("No joined rows for {}, skipping chart", city))?;
        return Ok(());
    }

    let line: Vec<(f64, f64)> = series.iter().map(|r| (r.year as f64, r.zhvi)).collect();
    let bars: Vec<(f64, f64)> = series
        .iter()
        .map(|r| (r.year as f64, r.net_migration_rate))
        .collect();

    let first_year = series.first().map(|r| r.year).unwrap_or(2011);
    let last_year = series.last().map(|r| r.year).unwrap_or(2019);
    let title = format!(
        "The \"Golden Handcuffs\": {} ({}-{})",
        city, first_year, last_year
    );

    let chart_path = settings.paths.output_dir.join("mechanism_chart.png");
    chart::render_dual_axis(
        &chart_path,
        (settings.chart.width, settings.chart.height),
        &title,
        "Housing Price (ZHVI)",
        "Net Migration Rate (per 1k)",
        &line,
        &bars,
    )?;
    print_saved("Chart", &chart_path)?;

    Ok(())
}
