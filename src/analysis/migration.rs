// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Pre-pandemic migration history
//!
//! Turns the Census components table into the tidy cohort migration table
//! (2011-2019) and its per-year cohort means.

use std::collections::BTreeMap;

use tracing::warn;

use crate::cohorts::{matcher, CohortRegistry};
use crate::error::{MetroflowError, Result};
use crate::panel::MigrationRecord;
use crate::sources::census::{period_year, ComponentsRow};

/// Cohort-mean net migration rate for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortYearMean {
    pub cohort: String,
    pub year: i32,
    pub mean: f64,
}

/// Result of the migration analysis.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// Tidy rows, in cohort/city/year order
    pub records: Vec<MigrationRecord>,
    /// Cohort means per year, ordered by (cohort label, year)
    pub cohort_year_means: Vec<CohortYearMean>,
}

impl MigrationReport {
    /// Latest year present in the table.
    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// Cohort mean for a specific (label, year), if present.
    pub fn mean_for(&self, cohort: &str, year: i32) -> Option<f64> {
        self.cohort_year_means
            .iter()
            .find(|m| m.cohort == cohort && m.year == year)
            .map(|m| m.mean)
    }
}

/// Build the tidy migration table from the raw components rows.
///
/// For each cohort city, the first Census MSA whose name matches is taken and
/// its valid-period rows become one record per year. Cities with no matching
/// MSA are warned about and skipped.
pub fn run(rows: &[ComponentsRow], registry: &CohortRegistry) -> Result<MigrationReport> {
    let mut records = Vec::new();

    for cohort in registry.iter() {
        for city in cohort.simple_names() {
            let matched_name = rows
                .iter()
                .find(|row| matcher::census_name_matches(&city, &row.name))
                .map(|row| row.name.clone());

            let Some(msa_name) = matched_name else {
                warn!(
                    target: "metroflow.migration",
                    "Could not find Census data for {}",
                    city
                );
                continue;
            };

            let mut city_rows: Vec<(i32, f64)> = rows
                .iter()
                .filter(|row| row.name == msa_name)
                .filter_map(|row| {
                    period_year(row.period_code).map(|year| (year, row.net_migration_rate))
                })
                .collect();
            city_rows.sort_by_key(|(year, _)| *year);

            for (year, net_migration_rate) in city_rows {
                records.push(MigrationRecord {
                    cohort: cohort.label.clone(),
                    city: city.clone(),
                    year,
                    net_migration_rate,
                });
            }
        }
    }

    from_records(records)
}

/// Build a report from already-tidied records (e.g. a cached CSV).
pub fn from_records(records: Vec<MigrationRecord>) -> Result<MigrationReport> {
    if records.is_empty() {
        return Err(MetroflowError::Data(
            "no cohort city matched the Census components table".to_string(),
        ));
    }

    let mut groups: BTreeMap<(String, i32), Vec<f64>> = BTreeMap::new();
    for record in &records {
        groups
            .entry((record.cohort.clone(), record.year))
            .or_default()
            .push(record.net_migration_rate);
    }
    let cohort_year_means = groups
        .into_iter()
        .map(|((cohort, year), values)| CohortYearMean {
            cohort,
            year,
            mean: values.iter().sum::<f64>() / values.len() as f64,
        })
        .collect();

    Ok(MigrationReport {
        records,
        cohort_year_means,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, rate: f64, period: u32) -> ComponentsRow {
        ComponentsRow {
            name: name.to_string(),
            net_migration_rate: rate,
            period_code: period,
        }
    }

    fn sample_rows() -> Vec<ComponentsRow> {
        vec![
            row("Austin-Round Rock, TX Metro Area", 20.0, 3),
            row("Austin-Round Rock, TX Metro Area", 22.0, 11),
            // Out-of-range period must be ignored
            row("Austin-Round Rock, TX Metro Area", 99.0, 2),
            row("San Francisco-Oakland-Hayward, CA Metro Area", -2.0, 3),
            row("San Francisco-Oakland-Hayward, CA Metro Area", -6.0, 11),
            // Portland, OR must lose to Portland, ME
            row("Portland-Vancouver-Hillsboro, OR-WA Metro Area", 10.0, 3),
            row("Portland-South Portland, ME Metro Area", 4.0, 3),
        ]
    }

    #[test]
    fn test_run_builds_tidy_records() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_rows(), &registry).unwrap();

        let austin: Vec<_> = report
            .records
            .iter()
            .filter(|r| r.city == "Austin")
            .collect();
        assert_eq!(austin.len(), 2);
        assert_eq!(austin[0].year, 2011);
        assert_eq!(austin[1].year, 2019);
        assert!(austin[0].cohort.contains("Sunbelt"));
    }

    #[test]
    fn test_run_portland_resolves_to_maine() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_rows(), &registry).unwrap();

        let portland: Vec<_> = report
            .records
            .iter()
            .filter(|r| r.city == "Portland")
            .collect();
        assert_eq!(portland.len(), 1);
        assert!((portland[0].net_migration_rate - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_drops_out_of_range_periods() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_rows(), &registry).unwrap();
        assert!(report.records.iter().all(|r| (2011..=2019).contains(&r.year)));
    }

    #[test]
    fn test_run_cohort_year_means() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_rows(), &registry).unwrap();

        let exporters_label = registry
            .require(crate::cohorts::WEALTH_EXPORTERS)
            .unwrap()
            .label
            .clone();
        assert_eq!(report.mean_for(&exporters_label, 2011), Some(-2.0));
        assert_eq!(report.mean_for(&exporters_label, 2019), Some(-6.0));
    }

    #[test]
    fn test_run_errors_on_no_matches() {
        let registry = CohortRegistry::builtin().unwrap();
        let rows = vec![row("Fargo, ND Metro Area", 1.0, 3)];
        assert!(run(&rows, &registry).is_err());
    }

    #[test]
    fn test_latest_year() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_rows(), &registry).unwrap();
        assert_eq!(report.latest_year(), Some(2019));
    }
}
