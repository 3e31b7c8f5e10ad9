// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Pre-trend command
//!
//! Parallel-trends check on cohort housing prices, 2010-2019.

use super::print_saved;
use crate::analysis::pre_trend::{self as pre_trend_analysis, PreTrendReport};
use crate::cli::PreTrendArgs;
use crate::cohorts::CohortRegistry;
use crate::config::Settings;
use crate::error::Result;
use crate::report::{chart, summary};
use crate::sources::ZillowClient;
use crate::utils::{self, year_fraction};

/// Execute the pre-trend command
pub async fn execute(_args: &PreTrendArgs, settings: &Settings, offline: bool) -> Result<()> {
    let registry = CohortRegistry::load()?;
    utils::ensure_dir(&settings.paths.data_dir)?;
    utils::ensure_dir(&settings.paths.output_dir)?;

    let client = ZillowClient::new(settings)?;
    let table = client.load(&settings.zhvi_cache_path(), offline).await?;

    let report = pre_trend_analysis::run(&table, &registry)?;
    render(&report, &registry, settings)?;
    Ok(())
}

/// Render the chart and stats file for a computed report.
pub fn render(
    report: &PreTrendReport,
    registry: &CohortRegistry,
    settings: &Settings,
) -> Result<()> {
    let mut series = Vec::new();
    for cohort in registry.iter() {
        let points: Vec<(f64, f64)> = report
            .series
            .iter()
            .filter(|p| p.cohort == cohort.label)
            .map(|p| (year_fraction(p.date), p.mean))
            .collect();
        if !points.is_empty() {
            series.push((cohort.label.clone(), points));
        }
    }

    let chart_path = settings.paths.output_dir.join("parallel_trends_check.png");
    chart::render_cohort_lines(
        &chart_path,
        (settings.chart.width, settings.chart.height),
        "Parallel Trends Check: Housing Price Growth (2010-2019)",
        "Year",
        "Cumulative % Change (Baseline: Jan 2010)",
        &series,
        None,
    )?;
    print_saved("Chart", &chart_path)?;

    let stats = summary::pre_trend_stats(report);
    let stats_path = settings.paths.output_dir.join("pre_trend_stats.txt");
    summary::write_text(&stats_path, &stats)?;
    print_saved("Stats", &stats_path)?;
    println!("\n{}", stats);

    Ok(())
}
