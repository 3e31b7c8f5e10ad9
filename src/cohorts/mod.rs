// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Cohort definitions
//!
//! The hand-maintained metro cohort list and the name reconciliation
//! routines used to line it up with the data providers.

pub mod matcher;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use registry::CohortRegistry;

/// Cohort key of the wealth-exporter group targeted by the mechanism analysis.
pub const WEALTH_EXPORTERS: &str = "wealth-exporters";

/// A hand-curated group of metro areas sharing an assumed migration behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohort {
    /// Stable key used on the CLI and in overrides ("wealth-exporters")
    pub key: String,

    /// Display label carried into CSV output and chart legends
    pub label: String,

    /// Member metros in "City, ST" form, matching the ZHVI RegionName scheme
    pub metros: Vec<String>,
}

impl Cohort {
    /// Simple city names derived from the metro list, matching the naming
    /// scheme of the tidy migration table ("San Francisco, CA" -> "San Francisco").
    pub fn simple_names(&self) -> Vec<String> {
        self.metros.iter().map(|m| simple_name(m)).collect()
    }
}

/// Strip the state suffix from a "City, ST" metro name.
///
/// Both the Census matcher and the mechanism join key use this form.
pub fn simple_name(metro: &str) -> String {
    metro
        .split(',')
        .next()
        .unwrap_or(metro)
        .trim()
        .to_string()
}
