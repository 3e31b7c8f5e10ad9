// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Utility functions for Metroflow
//!
//! Small pure helpers shared by the command and report layers.

use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::error::{MetroflowError, Result};

/// Create a directory (and parents) if it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Map a month-end date to a fractional year for chart axes.
///
/// Monthly resolution is all the source data carries, so the month index is
/// enough: 2020-03-31 -> 2020.1667.
pub fn year_fraction(date: NaiveDate) -> f64 {
    date.year() as f64 + (date.month0() as f64) / 12.0
}

/// Format a percentage with sign, e.g. "+12.34%" / "-3.10%".
pub fn format_signed_pct(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Format an error for display to the user
pub fn format_error(error: &MetroflowError) -> String {
    match error {
        MetroflowError::Source(source_error) => {
            format!(
                "Source error: {}\nCheck your network connection, or rerun with --offline if a cached copy exists.",
                source_error
            )
        }
        _ => format!("Error: {}", error),
    }
}
