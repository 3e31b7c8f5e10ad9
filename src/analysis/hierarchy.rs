// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Post-shock cohort hierarchy
//!
//! Cumulative housing-price growth against the March 2020 baseline, with the
//! member min/max spread per cohort.

use chrono::NaiveDate;

use super::resolve_membership;
use crate::cohorts::CohortRegistry;
use crate::error::{MetroflowError, Result};
use crate::panel::{self, CohortBand};
use crate::sources::ZhviTable;

/// Result of the hierarchy analysis.
#[derive(Debug, Clone)]
pub struct HierarchyReport {
    /// Cohort mean/min/max pct-change per month, full date range
    pub bands: Vec<CohortBand>,
    /// Baseline used for normalization (the pandemic shock month)
    pub baseline: NaiveDate,
    /// Last date present in the bands
    pub latest_date: NaiveDate,
    /// One band per cohort at the latest date, in cohort order
    pub latest: Vec<CohortBand>,
}

/// Run the analysis over a parsed ZHVI table.
pub fn run(table: &ZhviTable, registry: &CohortRegistry) -> Result<HierarchyReport> {
    // Safe: literal calendar date.
    let baseline = NaiveDate::from_ymd_opt(2020, 3, 31).expect("valid date");

    let (membership, all_found) = resolve_membership(table, registry);
    if all_found.is_empty() {
        return Err(MetroflowError::Data(
            "no cohort metro resolved against the ZHVI index".to_string(),
        ));
    }

    let rows = panel::melt(table, &all_found);
    let normalized = panel::normalize(&rows, baseline);
    let tagged = panel::assign_cohorts(&normalized, &membership);
    let bands = panel::band_by_date(&tagged);

    let latest_date = bands
        .iter()
        .map(|b| b.date)
        .max()
        .ok_or_else(|| MetroflowError::Data("hierarchy series is empty".to_string()))?;

    let latest = membership
        .iter()
        .filter_map(|(label, _)| {
            bands
                .iter()
                .find(|b| b.cohort == *label && b.date == latest_date)
                .cloned()
        })
        .collect();

    Ok(HierarchyReport {
        bands,
        baseline,
        latest_date,
        latest,
    })
}
