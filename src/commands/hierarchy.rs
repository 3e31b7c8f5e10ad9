// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hierarchy command
//!
//! Post-shock cohort hierarchy chart and summary.

use chrono::Datelike;

use super::print_saved;
use crate::analysis::hierarchy::{self as hierarchy_analysis, HierarchyReport};
use crate::cli::HierarchyArgs;
use crate::cohorts::CohortRegistry;
use crate::config::Settings;
use crate::error::Result;
use crate::report::{chart, summary};
use crate::sources::ZillowClient;
use crate::utils::{self, year_fraction};

/// Execute the hierarchy command
pub async fn execute(args: &HierarchyArgs, settings: &Settings, offline: bool) -> Result<()> {
    let registry = CohortRegistry::load()?;
    utils::ensure_dir(&settings.paths.data_dir)?;
    utils::ensure_dir(&settings.paths.output_dir)?;

    let client = ZillowClient::new(settings)?;
    let table = client.load(&settings.zhvi_cache_path(), offline).await?;

    let report = hierarchy_analysis::run(&table, &registry)?;
    render(&report, &registry, settings, args.since)?;
    Ok(())
}

/// Render the band chart and summary file for a computed report.
pub fn render(
    report: &HierarchyReport,
    registry: &CohortRegistry,
    settings: &Settings,
    since: i32,
) -> Result<()> {
    let mut bands = Vec::new();
    for cohort in registry.iter() {
        let points: Vec<(f64, f64, f64, f64)> = report
            .bands
            .iter()
            .filter(|b| b.cohort == cohort.label && b.date.year() >= since)
            .map(|b| (year_fraction(b.date), b.mean, b.min, b.max))
            .collect();
        if !points.is_empty() {
            bands.push((cohort.label.clone(), points));
        }
    }

    let title = format!(
        "The \"Zoom Town\" Hierarchy: Housing Inflation Shock ({}-{})",
        since,
        report.latest_date.year()
    );

    let chart_path = settings.paths.output_dir.join("zoom_town_hierarchy.png");
    chart::render_cohort_bands(
        &chart_path,
        (settings.chart.width, settings.chart.height),
        &title,
        "Year",
        "Cumulative % Change (Baseline: March 2020)",
        &bands,
        year_fraction(report.baseline),
    )?;
    print_saved("Chart", &chart_path)?;

    let text = summary::cohort_summary(report);
    let summary_path = settings.paths.output_dir.join("cohort_summary.txt");
    summary::write_text(&summary_path, &text)?;
    print_saved("Summary", &summary_path)?;
    println!("\n{}", text);

    Ok(())
}
