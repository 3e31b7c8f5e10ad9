// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Migration command
//!
//! Fetches the Census components table, writes the tidy migration CSV and
//! renders the pre-pandemic migration chart.

use super::{print_saved, print_warning};
use crate::analysis::migration::{self as migration_analysis, MigrationReport};
use crate::cli::MigrationArgs;
use crate::cohorts::{CohortRegistry, WEALTH_EXPORTERS};
use crate::config::Settings;
use crate::error::{MetroflowError, Result};
use crate::panel;
use crate::report::chart::{self, Annotation};
use crate::sources::CensusClient;
use crate::utils;

/// Execute the migration command
pub async fn execute(args: &MigrationArgs, settings: &Settings, offline: bool) -> Result<()> {
    let registry = CohortRegistry::load()?;
    utils::ensure_dir(&settings.paths.data_dir)?;
    utils::ensure_dir(&settings.paths.output_dir)?;

    let report = acquire(settings, &registry, offline).await?;

    if !args.no_chart {
        render_chart(&report, &registry, settings)?;
    }

    Ok(())
}

/// Produce the migration report, fetching or reusing the tidy CSV.
///
/// Online: fetch, analyze, refresh the CSV. Offline: rebuild the report from
/// the cached CSV (the Census payload itself is not cached; the tidy table
/// carries everything the charts need).
pub async fn acquire(
    settings: &Settings,
    registry: &CohortRegistry,
    offline: bool,
) -> Result<MigrationReport> {
    let csv_path = settings.migration_csv_path();

    if offline {
        if !csv_path.exists() {
            return Err(MetroflowError::InvalidInput(format!(
                "--offline requested but no tidy migration table at {}",
                csv_path.display()
            )));
        }
        println!("Using cached migration table {}", csv_path.display());
        return migration_analysis::from_records(panel::read_migration_csv(&csv_path)?);
    }

    println!("Fetching Census components (Vintage 2019)...");
    let client = CensusClient::new(settings)?;
    let rows = client.fetch_components().await?;

    let report = migration_analysis::run(&rows, registry)?;
    panel::write_migration_csv(&csv_path, &report.records)?;
    print_saved("Migration table", &csv_path)?;

    Ok(report)
}

/// Render the cohort migration-rate chart.
pub fn render_chart(
    report: &MigrationReport,
    registry: &CohortRegistry,
    settings: &Settings,
) -> Result<()> {
    let mut series = Vec::new();
    for cohort in registry.iter() {
        let points: Vec<(f64, f64)> = report
            .cohort_year_means
            .iter()
            .filter(|m| m.cohort == cohort.label)
            .map(|m| (m.year as f64, m.mean))
            .collect();
        if !points.is_empty() {
            series.push((cohort.label.clone(), points));
        }
    }

    if series.is_empty() {
        print_warning("No cohort series to chart, skipping")?;
        return Ok(());
    }

    let annotation = exporter_annotation(report, registry);

    let chart_path = settings.paths.output_dir.join("migration_pre_trend.png");
    chart::render_cohort_lines(
        &chart_path,
        (settings.chart.width, settings.chart.height),
        "The \"Golden Handcuffs\" Breached: Pre-Pandemic Net Migration Rates (2011-2019)",
        "Year",
        "Net Migration Rate (per 1,000 residents)",
        &series,
        annotation,
    )?;
    print_saved("Chart", &chart_path)?;
    Ok(())
}

/// Call out the wealth-exporter cohort when its latest rate is negative.
fn exporter_annotation(
    report: &MigrationReport,
    registry: &CohortRegistry,
) -> Option<Annotation> {
    let label = &registry.get(WEALTH_EXPORTERS)?.label;
    let latest_year = report.latest_year()?;
    let latest_mean = report.mean_for(label, latest_year)?;

    if latest_mean < 0.0 {
        Some(Annotation {
            lines: vec![
                "Negative Migration".to_string(),
                "Before COVID".to_string(),
            ],
            x: latest_year as f64 - 2.0,
            y: latest_mean - 2.0,
        })
    } else {
        None
    }
}
