// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Text summaries
//!
//! Builds the plain-text stats files written next to the charts. Each
//! builder returns the full text so commands can echo it to the console.

use std::path::Path;

use crate::analysis::hierarchy::HierarchyReport;
use crate::analysis::mechanism::RegressionSummary;
use crate::analysis::pre_trend::PreTrendReport;
use crate::error::Result;
use crate::utils::format_signed_pct;

/// Write a summary file, creating parent directories as needed.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Pre-trend stats: cumulative growth per cohort at the final date.
pub fn pre_trend_stats(report: &PreTrendReport) -> String {
    let mut out = String::new();
    out.push_str("PRE-PANDEMIC TRENDS SUMMARY (2010-2019)\n");
    out.push_str("=======================================\n");
    out.push_str(&format!(
        "Analysis Date: {}\n",
        report.final_date.format("%Y-%m-%d")
    ));
    out.push_str("Baseline: Jan 2010\n\n");

    for (label, growth) in &report.final_growth {
        out.push_str(&format!("{}: {} Growth\n", label, format_signed_pct(*growth)));
    }
    out
}

/// Hierarchy summary: latest mean and min/max range per cohort.
pub fn cohort_summary(report: &HierarchyReport) -> String {
    let mut out = String::new();
    out.push_str("ZOOM TOWN HIERARCHY SUMMARY\n");
    out.push_str("===========================\n");
    out.push_str(&format!(
        "Analysis Date: {}\n",
        report.latest_date.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "Baseline: {}\n\n",
        report.baseline.format("%Y-%m-%d")
    ));

    for band in &report.latest {
        out.push_str(&format!("{}:\n", band.cohort));
        out.push_str(&format!(
            "  - Mean Growth: {}\n",
            format_signed_pct(band.mean)
        ));
        out.push_str(&format!(
            "  - Range: {} to {}\n",
            format_signed_pct(band.min),
            format_signed_pct(band.max)
        ));
    }
    out
}

/// Regression results for the mechanism fit.
pub fn regression_summary(fit: &RegressionSummary) -> String {
    let mut out = String::new();
    out.push_str("MECHANISM REGRESSION: ZHVI ~ NetMigrationRate\n");
    out.push_str("=============================================\n");
    out.push_str(&format!("Observations: {}\n", fit.n));
    out.push_str(&format!("Beta (Migration): {:.4}\n", fit.beta));
    out.push_str(&format!("Std Error: {:.4}\n", fit.std_err));
    out.push_str(&format!("P-Value: {:.4}\n", fit.p_value));
    out.push_str(&format!("R-Squared: {:.4}\n", fit.r_squared));
    out.push_str(&format!("Intercept: {:.4}\n", fit.intercept));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{CohortBand, CohortPoint};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pre_trend_stats_format() {
        let report = PreTrendReport {
            series: vec![CohortPoint {
                cohort: "Cohort A".to_string(),
                date: date(2019, 12, 31),
                mean: 89.3,
            }],
            final_date: date(2019, 12, 31),
            final_growth: vec![("Cohort A".to_string(), 89.3)],
        };

        let text = pre_trend_stats(&report);
        assert!(text.contains("PRE-PANDEMIC TRENDS SUMMARY"));
        assert!(text.contains("Analysis Date: 2019-12-31"));
        assert!(text.contains("Cohort A: +89.30% Growth"));
    }

    #[test]
    fn test_cohort_summary_format() {
        let band = CohortBand {
            cohort: "Cohort B".to_string(),
            date: date(2025, 5, 31),
            mean: 52.1,
            min: 38.0,
            max: 70.5,
        };
        let report = HierarchyReport {
            bands: vec![band.clone()],
            baseline: date(2020, 3, 31),
            latest_date: date(2025, 5, 31),
            latest: vec![band],
        };

        let text = cohort_summary(&report);
        assert!(text.contains("ZOOM TOWN HIERARCHY SUMMARY"));
        assert!(text.contains("Baseline: 2020-03-31"));
        assert!(text.contains("Mean Growth: +52.10%"));
        assert!(text.contains("Range: +38.00% to +70.50%"));
    }

    #[test]
    fn test_regression_summary_format() {
        let fit = RegressionSummary {
            beta: -1532.25,
            intercept: 612000.0,
            std_err: 410.7,
            p_value: 0.0123,
            r_squared: 0.4411,
            n: 72,
        };

        let text = regression_summary(&fit);
        assert!(text.contains("Observations: 72"));
        assert!(text.contains("Beta (Migration): -1532.2500"));
        assert!(text.contains("P-Value: 0.0123"));
        assert!(text.contains("R-Squared: 0.4411"));
    }

    #[test]
    fn test_write_text_creates_parents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out").join("stats.txt");
        write_text(&path, "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
