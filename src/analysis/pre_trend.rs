// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Pre-pandemic parallel-trends check
//!
//! Cohort-mean cumulative housing-price growth 2010-2019, normalized to the
//! January 2010 observation of each region.

use chrono::NaiveDate;

use super::resolve_membership;
use crate::cohorts::CohortRegistry;
use crate::error::{MetroflowError, Result};
use crate::panel::{self, CohortPoint};
use crate::sources::ZhviTable;

/// Result of the pre-trend analysis.
#[derive(Debug, Clone)]
pub struct PreTrendReport {
    /// Cohort mean pct-change per month, 2010-2019
    pub series: Vec<CohortPoint>,
    /// Last date present in the series
    pub final_date: NaiveDate,
    /// (cohort label, cumulative growth at the final date), in cohort order
    pub final_growth: Vec<(String, f64)>,
}

/// Run the analysis over a parsed ZHVI table.
pub fn run(table: &ZhviTable, registry: &CohortRegistry) -> Result<PreTrendReport> {
    // Safe: literal calendar dates.
    let from = NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid date");
    let to = NaiveDate::from_ymd_opt(2019, 12, 31).expect("valid date");
    let baseline = NaiveDate::from_ymd_opt(2010, 1, 31).expect("valid date");

    let (membership, all_found) = resolve_membership(table, registry);
    if all_found.is_empty() {
        return Err(MetroflowError::Data(
            "no cohort metro resolved against the ZHVI index".to_string(),
        ));
    }

    let rows = panel::filter_date_range(panel::melt(table, &all_found), from, to);
    let normalized = panel::normalize(&rows, baseline);
    let tagged = panel::assign_cohorts(&normalized, &membership);
    let series = panel::mean_by_date(&tagged);

    let final_date = series
        .iter()
        .map(|p| p.date)
        .max()
        .ok_or_else(|| MetroflowError::Data("pre-trend series is empty".to_string()))?;

    let final_growth = membership
        .iter()
        .filter_map(|(label, _)| {
            series
                .iter()
                .find(|p| p.cohort == *label && p.date == final_date)
                .map(|p| (label.clone(), p.mean))
        })
        .collect();

    Ok(PreTrendReport {
        series,
        final_date,
        final_growth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ZhviRegion;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Tiny table with one known metro per cohort plus noise outside range.
    fn sample_table() -> ZhviTable {
        ZhviTable {
            dates: vec![
                date(2009, 12, 31),
                date(2010, 1, 31),
                date(2015, 6, 30),
                date(2019, 12, 31),
                date(2021, 1, 31),
            ],
            regions: vec![
                ZhviRegion {
                    name: "San Francisco, CA".to_string(),
                    values: vec![Some(95.0), Some(100.0), Some(150.0), Some(200.0), Some(400.0)],
                },
                ZhviRegion {
                    name: "Austin, TX".to_string(),
                    values: vec![Some(95.0), Some(100.0), Some(120.0), Some(160.0), Some(300.0)],
                },
                ZhviRegion {
                    name: "Bozeman, MT".to_string(),
                    values: vec![Some(95.0), Some(100.0), Some(110.0), Some(130.0), Some(250.0)],
                },
            ],
        }
    }

    #[test]
    fn test_run_final_growth_per_cohort() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_table(), &registry).unwrap();

        assert_eq!(report.final_date, date(2019, 12, 31));
        assert_eq!(report.final_growth.len(), 3);

        let exporters = report
            .final_growth
            .iter()
            .find(|(label, _)| label.contains("Wealth Exporters"))
            .unwrap();
        assert!((exporters.1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_excludes_out_of_range_dates() {
        let registry = CohortRegistry::builtin().unwrap();
        let report = run(&sample_table(), &registry).unwrap();
        assert!(report.series.iter().all(|p| p.date <= date(2019, 12, 31)));
        assert!(report.series.iter().all(|p| p.date >= date(2010, 1, 1)));
    }

    #[test]
    fn test_run_errors_when_nothing_resolves() {
        let registry = CohortRegistry::builtin().unwrap();
        let table = ZhviTable {
            dates: vec![date(2010, 1, 31)],
            regions: vec![ZhviRegion {
                name: "Fargo, ND".to_string(),
                values: vec![Some(1.0)],
            }],
        };
        assert!(run(&table, &registry).is_err());
    }
}
