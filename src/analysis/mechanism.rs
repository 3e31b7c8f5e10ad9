// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Price-vs-migration mechanism
//!
//! Joins annualized ZHVI values to the tidy migration table for the
//! wealth-exporter cohort and fits OLS: ZHVI ~ NetMigrationRate.

use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};

use crate::cohorts::{matcher, CohortRegistry, WEALTH_EXPORTERS};
use crate::error::{MetroflowError, Result};
use crate::panel::{self, CityYear, MigrationRecord};
use crate::sources::ZhviTable;

/// OLS fit of annual price level on net migration rate.
#[derive(Debug, Clone)]
pub struct RegressionSummary {
    /// Slope on the migration rate
    pub beta: f64,
    pub intercept: f64,
    /// Standard error of the slope
    pub std_err: f64,
    /// p-value of the slope
    pub p_value: f64,
    pub r_squared: f64,
    /// Number of joined city-year observations
    pub n: usize,
}

/// Result of the mechanism analysis.
#[derive(Debug, Clone)]
pub struct MechanismReport {
    /// Joined city-year rows for the wealth-exporter cohort
    pub merged: Vec<CityYear>,
    pub fit: RegressionSummary,
}

impl MechanismReport {
    /// Rows for one city, in year order (the dual-axis chart input).
    pub fn city_series(&self, city: &str) -> Vec<&CityYear> {
        let mut rows: Vec<&CityYear> = self.merged.iter().filter(|r| r.city == city).collect();
        rows.sort_by_key(|r| r.year);
        rows
    }
}

/// Run the analysis: join and regress.
pub fn run(
    table: &ZhviTable,
    registry: &CohortRegistry,
    migration: &[MigrationRecord],
) -> Result<MechanismReport> {
    let exporters = registry.require(WEALTH_EXPORTERS)?;
    let available = table.region_names();

    let resolved: Vec<String> = exporters
        .metros
        .iter()
        .filter_map(|metro| matcher::resolve_zillow_region(metro, &available))
        .collect();
    if resolved.is_empty() {
        return Err(MetroflowError::Data(
            "no wealth-exporter metro resolved against the ZHVI index".to_string(),
        ));
    }

    let annual = panel::annual_means(&panel::melt(table, &resolved));

    let exporter_records: Vec<MigrationRecord> = migration
        .iter()
        .filter(|r| r.cohort == exporters.label)
        .cloned()
        .collect();

    let merged = panel::join_city_years(&annual, &exporter_records);
    if merged.len() < 3 {
        return Err(MetroflowError::Data(format!(
            "only {} joined city-year rows, not enough to regress",
            merged.len()
        )));
    }

    let fit = fit_ols(&merged)?;
    Ok(MechanismReport { merged, fit })
}

/// Fit ZHVI ~ NetMigrationRate with an intercept.
pub fn fit_ols(rows: &[CityYear]) -> Result<RegressionSummary> {
    let y: Vec<f64> = rows.iter().map(|r| r.zhvi).collect();
    let x: Vec<f64> = rows.iter().map(|r| r.net_migration_rate).collect();

    let data = RegressionDataBuilder::new().build_from(vec![("ZHVI", y), ("NetMigrationRate", x)])?;
    let model = FormulaRegressionBuilder::new()
        .data(&data)
        .formula("ZHVI ~ NetMigrationRate")
        .fit()?;

    let slope_of = |pairs: Vec<(&str, f64)>| -> Option<f64> {
        pairs
            .into_iter()
            .find(|(name, _)| *name == "NetMigrationRate")
            .map(|(_, value)| value)
    };

    let beta = slope_of(model.iter_parameter_pairs().collect())
        .ok_or_else(|| MetroflowError::Regression("slope parameter missing from fit".to_string()))?;
    let std_err = slope_of(model.iter_se_pairs().collect())
        .ok_or_else(|| MetroflowError::Regression("slope std error missing from fit".to_string()))?;
    let p_value = slope_of(model.iter_p_value_pairs().collect())
        .ok_or_else(|| MetroflowError::Regression("slope p-value missing from fit".to_string()))?;
    let intercept = model.parameters().first().copied().unwrap_or(0.0);

    Ok(RegressionSummary {
        beta,
        intercept,
        std_err,
        p_value,
        r_squared: model.rsquared(),
        n: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ZhviRegion;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn exporters_label() -> String {
        CohortRegistry::builtin()
            .unwrap()
            .require(WEALTH_EXPORTERS)
            .unwrap()
            .label
            .clone()
    }

    fn record(city: &str, year: i32, rate: f64) -> MigrationRecord {
        MigrationRecord {
            cohort: exporters_label(),
            city: city.to_string(),
            year,
            net_migration_rate: rate,
        }
    }

    fn sample_table() -> ZhviTable {
        ZhviTable {
            dates: vec![date(2011, 6, 30), date(2012, 6, 30), date(2013, 6, 30)],
            regions: vec![ZhviRegion {
                name: "San Francisco, CA".to_string(),
                values: vec![Some(100.0), Some(120.0), Some(140.0)],
            }],
        }
    }

    #[test]
    fn test_fit_ols_perfect_line() {
        // zhvi = 10 * rate + 50, exactly
        let rows: Vec<CityYear> = [(1.0, 60.0), (2.0, 70.0), (3.0, 80.0), (4.0, 90.0)]
            .iter()
            .map(|(rate, zhvi)| CityYear {
                city: "San Francisco".to_string(),
                year: 2011,
                zhvi: *zhvi,
                net_migration_rate: *rate,
            })
            .collect();

        let fit = fit_ols(&rows).unwrap();
        assert!((fit.beta - 10.0).abs() < 1e-6);
        assert!((fit.intercept - 50.0).abs() < 1e-6);
        assert!(fit.r_squared > 0.999);
        assert_eq!(fit.n, 4);
    }

    #[test]
    fn test_run_joins_and_fits() {
        let registry = CohortRegistry::builtin().unwrap();
        let migration = vec![
            record("San Francisco", 2011, -1.0),
            record("San Francisco", 2012, -2.0),
            record("San Francisco", 2013, -3.0),
        ];

        let report = run(&sample_table(), &registry, &migration).unwrap();
        assert_eq!(report.merged.len(), 3);
        // Prices rise while migration falls: negative slope.
        assert!(report.fit.beta < 0.0);
    }

    #[test]
    fn test_run_ignores_other_cohorts() {
        let registry = CohortRegistry::builtin().unwrap();
        let mut migration = vec![
            record("San Francisco", 2011, -1.0),
            record("San Francisco", 2012, -2.0),
            record("San Francisco", 2013, -3.0),
        ];
        migration.push(MigrationRecord {
            cohort: "Cohort B: Major Sunbelt Hubs (Urban Importers)".to_string(),
            city: "San Francisco".to_string(),
            year: 2011,
            net_migration_rate: 99.0,
        });

        let report = run(&sample_table(), &registry, &migration).unwrap();
        assert_eq!(report.merged.len(), 3);
    }

    #[test]
    fn test_run_errors_with_too_few_rows() {
        let registry = CohortRegistry::builtin().unwrap();
        let migration = vec![record("San Francisco", 2011, -1.0)];
        assert!(run(&sample_table(), &registry, &migration).is_err());
    }

    #[test]
    fn test_city_series_sorted() {
        let merged = vec![
            CityYear {
                city: "San Francisco".to_string(),
                year: 2013,
                zhvi: 3.0,
                net_migration_rate: 0.0,
            },
            CityYear {
                city: "San Francisco".to_string(),
                year: 2011,
                zhvi: 1.0,
                net_migration_rate: 0.0,
            },
        ];
        let report = MechanismReport {
            merged,
            fit: RegressionSummary {
                beta: 0.0,
                intercept: 0.0,
                std_err: 0.0,
                p_value: 1.0,
                r_squared: 0.0,
                n: 2,
            },
        };
        let series = report.city_series("San Francisco");
        assert_eq!(series[0].year, 2011);
        assert_eq!(series[1].year, 2013);
    }
}
