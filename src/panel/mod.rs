// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tidy-table plumbing
//!
//! Row types and the reshape/aggregate helpers shared by the analyses.
//! Group keys are ordered so every derived table (and therefore every output
//! file) is deterministic.

pub mod reshape;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use reshape::*;

/// One long-form observation melted out of the wide ZHVI table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub region: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// An observation re-expressed as percent change from a baseline date.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedObservation {
    pub region: String,
    pub date: NaiveDate,
    pub pct_change: f64,
}

/// A normalized observation tagged with its cohort label.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortObservation {
    pub cohort: String,
    pub region: String,
    pub date: NaiveDate,
    pub pct_change: f64,
}

/// Cohort mean per date.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortPoint {
    pub cohort: String,
    pub date: NaiveDate,
    pub mean: f64,
}

/// Cohort mean with the member min/max spread per date.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortBand {
    pub cohort: String,
    pub date: NaiveDate,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Mean value per region-year, used to annualize the monthly index.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualValue {
    pub region: String,
    pub year: i32,
    pub mean: f64,
}

/// One row of the tidy migration table (the migration command's CSV output).
///
/// Serialized column names match the published table layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    #[serde(rename = "Cohort")]
    pub cohort: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "NetMigrationRate")]
    pub net_migration_rate: f64,
}

/// One joined city-year row feeding the regression.
#[derive(Debug, Clone, PartialEq)]
pub struct CityYear {
    pub city: String,
    pub year: i32,
    pub zhvi: f64,
    pub net_migration_rate: f64,
}

/// Write the tidy migration table as CSV.
pub fn write_migration_csv(
    path: &std::path::Path,
    records: &[MigrationRecord],
) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a tidy migration table back from CSV.
pub fn read_migration_csv(path: &std::path::Path) -> crate::error::Result<Vec<MigrationRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
