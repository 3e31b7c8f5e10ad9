// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Report command
//!
//! Runs migration, pre-trend, hierarchy and mechanism in sequence, reusing a
//! single fetched ZHVI table.

use super::{hierarchy, mechanism, migration, pre_trend};
use crate::analysis;
use crate::cli::ReportArgs;
use crate::cohorts::CohortRegistry;
use crate::config::Settings;
use crate::error::Result;
use crate::sources::ZillowClient;
use crate::utils;

/// Execute the report command
pub async fn execute(args: &ReportArgs, settings: &Settings, offline: bool) -> Result<()> {
    let registry = CohortRegistry::load()?;
    utils::ensure_dir(&settings.paths.data_dir)?;
    utils::ensure_dir(&settings.paths.output_dir)?;

    let migration_report = migration::acquire(settings, &registry, offline).await?;
    migration::render_chart(&migration_report, &registry, settings)?;

    let client = ZillowClient::new(settings)?;
    let table = client.load(&settings.zhvi_cache_path(), offline).await?;

    let pre_trend_report = analysis::pre_trend::run(&table, &registry)?;
    pre_trend::render(&pre_trend_report, &registry, settings)?;

    let hierarchy_report = analysis::hierarchy::run(&table, &registry)?;
    hierarchy::render(&hierarchy_report, &registry, settings, args.since)?;

    let mechanism_report =
        analysis::mechanism::run(&table, &registry, &migration_report.records)?;
    mechanism::render(&mechanism_report, settings, &args.city)?;

    Ok(())
}
