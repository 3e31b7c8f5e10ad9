// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The analyses
//!
//! Each submodule is a pure function from parsed inputs to a result struct.
//! Fetching, file writes and chart rendering live in the command layer.

pub mod hierarchy;
pub mod mechanism;
pub mod migration;
pub mod pre_trend;

use crate::cohorts::{matcher, CohortRegistry};
use crate::sources::ZhviTable;

/// Resolve every cohort metro against the ZHVI RegionName column.
///
/// Returns (cohort label -> resolved regions) in cohort order, plus the flat
/// list of resolved regions. Unresolved metros have already been warned about
/// by the matcher.
pub fn resolve_membership(
    table: &ZhviTable,
    registry: &CohortRegistry,
) -> (Vec<(String, Vec<String>)>, Vec<String>) {
    let available = table.region_names();

    let mut membership = Vec::new();
    let mut all_found = Vec::new();
    for cohort in registry.iter() {
        let mut resolved = Vec::new();
        for metro in &cohort.metros {
            if let Some(region) = matcher::resolve_zillow_region(metro, &available) {
                all_found.push(region.clone());
                resolved.push(region);
            }
        }
        membership.push((cohort.label.clone(), resolved));
    }

    (membership, all_found)
}
