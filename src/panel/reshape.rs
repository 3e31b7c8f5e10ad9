// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Melt, normalize, aggregate and join
//!
//! Pure functions over the row types in `panel`. Missing baselines and
//! unmatched join keys warn and skip; they never abort a run.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use super::{
    AnnualValue, CityYear, CohortBand, CohortObservation, CohortPoint, MigrationRecord,
    NormalizedObservation, Observation,
};
use crate::cohorts::simple_name;
use crate::sources::ZhviTable;

/// Melt the wide ZHVI table into long observations for the given regions.
///
/// Blank cells disappear here; downstream code never sees a missing value.
pub fn melt(table: &ZhviTable, regions: &[String]) -> Vec<Observation> {
    let mut rows = Vec::new();
    for region in &table.regions {
        if !regions.contains(&region.name) {
            continue;
        }
        for (date, value) in table.dates.iter().zip(region.values.iter()) {
            if let Some(value) = value {
                rows.push(Observation {
                    region: region.name.clone(),
                    date: *date,
                    value: *value,
                });
            }
        }
    }
    rows
}

/// Keep observations with `from <= date <= to`.
pub fn filter_date_range(rows: Vec<Observation>, from: NaiveDate, to: NaiveDate) -> Vec<Observation> {
    rows.into_iter()
        .filter(|o| o.date >= from && o.date <= to)
        .collect()
}

/// Re-express each region as percent change from its value at `baseline`.
///
/// A region with no observation exactly at the baseline date is skipped with
/// a warning, matching the drop semantics of the source analysis.
pub fn normalize(rows: &[Observation], baseline: NaiveDate) -> Vec<NormalizedObservation> {
    let mut by_region: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for row in rows {
        by_region
            .entry(row.region.as_str())
            .or_default()
            .push((row.date, row.value));
    }

    let mut out = Vec::new();
    for (region, mut series) in by_region {
        series.sort_by_key(|(date, _)| *date);

        let baseline_value = match series.iter().find(|(date, _)| *date == baseline) {
            Some((_, value)) => *value,
            None => {
                warn!(
                    target: "metroflow.panel",
                    "Baseline {} not found for {}",
                    baseline,
                    region
                );
                continue;
            }
        };

        for (date, value) in series {
            out.push(NormalizedObservation {
                region: region.to_string(),
                date,
                pct_change: (value - baseline_value) / baseline_value * 100.0,
            });
        }
    }
    out
}

/// Tag normalized observations with their cohort label.
///
/// `membership` maps cohort label -> resolved region names, in cohort order.
/// A region is in at most one cohort; first label wins.
pub fn assign_cohorts(
    rows: &[NormalizedObservation],
    membership: &[(String, Vec<String>)],
) -> Vec<CohortObservation> {
    let mut out = Vec::new();
    for row in rows {
        let label = membership
            .iter()
            .find(|(_, regions)| regions.contains(&row.region))
            .map(|(label, _)| label.clone());

        if let Some(cohort) = label {
            out.push(CohortObservation {
                cohort,
                region: row.region.clone(),
                date: row.date,
                pct_change: row.pct_change,
            });
        }
    }
    out
}

/// Cohort mean pct-change per (cohort, date).
pub fn mean_by_date(rows: &[CohortObservation]) -> Vec<CohortPoint> {
    let mut groups: BTreeMap<(String, NaiveDate), Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.cohort.clone(), row.date))
            .or_default()
            .push(row.pct_change);
    }

    groups
        .into_iter()
        .map(|((cohort, date), values)| CohortPoint {
            cohort,
            date,
            mean: mean(&values),
        })
        .collect()
}

/// Cohort mean/min/max pct-change per (cohort, date).
pub fn band_by_date(rows: &[CohortObservation]) -> Vec<CohortBand> {
    let mut groups: BTreeMap<(String, NaiveDate), Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.cohort.clone(), row.date))
            .or_default()
            .push(row.pct_change);
    }

    groups
        .into_iter()
        .map(|((cohort, date), values)| {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            CohortBand {
                cohort,
                date,
                mean: mean(&values),
                min,
                max,
            }
        })
        .collect()
}

/// Mean value per (region, year), annualizing the monthly index.
pub fn annual_means(rows: &[Observation]) -> Vec<AnnualValue> {
    let mut groups: BTreeMap<(String, i32), Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.region.clone(), row.date.year()))
            .or_default()
            .push(row.value);
    }

    groups
        .into_iter()
        .map(|((region, year), values)| AnnualValue {
            region,
            year,
            mean: mean(&values),
        })
        .collect()
}

/// Inner-join annual housing values to migration records on (city, year).
///
/// The migration table carries the simple city name; the annualized housing
/// rows carry the "City, ST" metro name. The metro name is reduced to its
/// simple form to bridge the two schemes.
pub fn join_city_years(
    annual: &[AnnualValue],
    migration: &[MigrationRecord],
) -> Vec<CityYear> {
    let mut by_city_year: BTreeMap<(String, i32), f64> = BTreeMap::new();
    for row in annual {
        by_city_year.insert((simple_name(&row.region), row.year), row.mean);
    }

    let mut out = Vec::new();
    for record in migration {
        match by_city_year.get(&(record.city.clone(), record.year)) {
            Some(zhvi) => out.push(CityYear {
                city: record.city.clone(),
                year: record.year,
                zhvi: *zhvi,
                net_migration_rate: record.net_migration_rate,
            }),
            None => {
                warn!(
                    target: "metroflow.panel",
                    "No annual housing value for {} {}",
                    record.city,
                    record.year
                );
            }
        }
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{ZhviRegion, ZhviTable};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_table() -> ZhviTable {
        ZhviTable {
            dates: vec![date(2010, 1, 31), date(2010, 2, 28), date(2010, 3, 31)],
            regions: vec![
                ZhviRegion {
                    name: "Austin, TX".to_string(),
                    values: vec![Some(100.0), Some(110.0), Some(120.0)],
                },
                ZhviRegion {
                    name: "Boise, ID".to_string(),
                    values: vec![Some(200.0), None, Some(220.0)],
                },
                ZhviRegion {
                    name: "Fargo, ND".to_string(),
                    values: vec![Some(300.0), Some(301.0), Some(302.0)],
                },
            ],
        }
    }

    #[test]
    fn test_melt_filters_regions_and_blanks() {
        let table = sample_table();
        let keep = vec!["Austin, TX".to_string(), "Boise, ID".to_string()];
        let rows = melt(&table, &keep);

        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.region != "Fargo, ND"));
        assert!(!rows
            .iter()
            .any(|r| r.region == "Boise, ID" && r.date == date(2010, 2, 28)));
    }

    #[test]
    fn test_filter_date_range_inclusive() {
        let table = sample_table();
        let keep = vec!["Austin, TX".to_string()];
        let rows = filter_date_range(melt(&table, &keep), date(2010, 1, 31), date(2010, 2, 28));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_normalize_pct_change() {
        let table = sample_table();
        let keep = vec!["Austin, TX".to_string()];
        let rows = normalize(&melt(&table, &keep), date(2010, 1, 31));

        assert_eq!(rows.len(), 3);
        assert!((rows[0].pct_change - 0.0).abs() < 1e-9);
        assert!((rows[1].pct_change - 10.0).abs() < 1e-9);
        assert!((rows[2].pct_change - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_skips_region_without_baseline() {
        let table = sample_table();
        let keep = vec!["Austin, TX".to_string(), "Boise, ID".to_string()];
        // Boise has no Feb observation, so a Feb baseline drops it entirely.
        let rows = normalize(&melt(&table, &keep), date(2010, 2, 28));

        assert!(rows.iter().all(|r| r.region == "Austin, TX"));
        assert!(!rows.is_empty());
    }

    #[test]
    fn test_assign_cohorts_first_label_wins() {
        let normalized = vec![
            NormalizedObservation {
                region: "Austin, TX".to_string(),
                date: date(2010, 1, 31),
                pct_change: 1.0,
            },
            NormalizedObservation {
                region: "Fargo, ND".to_string(),
                date: date(2010, 1, 31),
                pct_change: 2.0,
            },
        ];
        let membership = vec![
            ("Cohort A".to_string(), vec!["Austin, TX".to_string()]),
            ("Cohort B".to_string(), vec!["Austin, TX".to_string()]),
        ];

        let rows = assign_cohorts(&normalized, &membership);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cohort, "Cohort A");
    }

    #[test]
    fn test_mean_by_date() {
        let rows = vec![
            CohortObservation {
                cohort: "A".to_string(),
                region: "x".to_string(),
                date: date(2010, 1, 31),
                pct_change: 10.0,
            },
            CohortObservation {
                cohort: "A".to_string(),
                region: "y".to_string(),
                date: date(2010, 1, 31),
                pct_change: 20.0,
            },
        ];
        let points = mean_by_date(&rows);
        assert_eq!(points.len(), 1);
        assert!((points[0].mean - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_by_date() {
        let rows = vec![
            CohortObservation {
                cohort: "A".to_string(),
                region: "x".to_string(),
                date: date(2010, 1, 31),
                pct_change: 10.0,
            },
            CohortObservation {
                cohort: "A".to_string(),
                region: "y".to_string(),
                date: date(2010, 1, 31),
                pct_change: 30.0,
            },
        ];
        let bands = band_by_date(&rows);
        assert_eq!(bands.len(), 1);
        assert!((bands[0].mean - 20.0).abs() < 1e-9);
        assert!((bands[0].min - 10.0).abs() < 1e-9);
        assert!((bands[0].max - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_annual_means() {
        let rows = vec![
            Observation {
                region: "Austin, TX".to_string(),
                date: date(2011, 1, 31),
                value: 100.0,
            },
            Observation {
                region: "Austin, TX".to_string(),
                date: date(2011, 12, 31),
                value: 200.0,
            },
            Observation {
                region: "Austin, TX".to_string(),
                date: date(2012, 1, 31),
                value: 300.0,
            },
        ];
        let annual = annual_means(&rows);
        assert_eq!(annual.len(), 2);
        assert!((annual[0].mean - 150.0).abs() < 1e-9);
        assert_eq!(annual[1].year, 2012);
    }

    #[test]
    fn test_join_city_years_bridges_naming() {
        let annual = vec![AnnualValue {
            region: "San Francisco, CA".to_string(),
            year: 2015,
            mean: 800000.0,
        }];
        let migration = vec![
            MigrationRecord {
                cohort: "Cohort A".to_string(),
                city: "San Francisco".to_string(),
                year: 2015,
                net_migration_rate: -2.5,
            },
            MigrationRecord {
                cohort: "Cohort A".to_string(),
                city: "San Francisco".to_string(),
                year: 2016,
                net_migration_rate: -3.0,
            },
        ];

        let joined = join_city_years(&annual, &migration);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].city, "San Francisco");
        assert!((joined[0].zhvi - 800000.0).abs() < 1e-9);
        assert!((joined[0].net_migration_rate + 2.5).abs() < 1e-9);
    }
}
