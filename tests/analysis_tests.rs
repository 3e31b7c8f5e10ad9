// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use metroflow::analysis::{hierarchy, mechanism, migration, pre_trend};
use metroflow::cohorts::CohortRegistry;
use metroflow::panel::{self, MigrationRecord};
use metroflow::sources::census::ComponentsRow;
use metroflow::sources::ZhviTable;

/// Wide-table fixture with three cohort metros plus one outsider.
const ZHVI_FIXTURE: &str = "\
RegionID,SizeRank,RegionName,RegionType,StateName,2010-01-31,2015-06-30,2019-12-31,2020-03-31,2022-03-31
1,1,\"San Francisco, CA\",msa,CA,100,150,200,210,300
2,2,\"New York, NY\",msa,NY,200,400,500,510,600
3,3,\"Austin, TX\",msa,TX,100,120,160,170,255
4,4,\"Bozeman, MT\",msa,MT,100,110,130,140,210
5,5,\"Fargo, ND\",msa,ND,100,101,102,103,104";

fn fixture_table() -> ZhviTable {
    ZhviTable::parse_csv(ZHVI_FIXTURE).unwrap()
}

fn registry() -> CohortRegistry {
    CohortRegistry::builtin().unwrap()
}

fn exporters_label() -> String {
    registry()
        .require(metroflow::cohorts::WEALTH_EXPORTERS)
        .unwrap()
        .label
        .clone()
}

#[test]
fn test_pre_trend_over_fixture() {
    let report = pre_trend::run(&fixture_table(), &registry()).unwrap();

    // 2020+ observations are filtered out of the decade window.
    assert_eq!(
        report.final_date,
        chrono::NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()
    );

    let growth_of = |needle: &str| {
        report
            .final_growth
            .iter()
            .find(|(label, _)| label.contains(needle))
            .map(|(_, g)| *g)
            .unwrap()
    };

    // SF +100%, NY +150% -> exporter mean +125%
    assert!((growth_of("Wealth Exporters") - 125.0).abs() < 1e-9);
    assert!((growth_of("Sunbelt") - 60.0).abs() < 1e-9);
    assert!((growth_of("Nature Enclaves") - 30.0).abs() < 1e-9);
}

#[test]
fn test_pre_trend_ignores_non_cohort_regions() {
    let report = pre_trend::run(&fixture_table(), &registry()).unwrap();
    // Only cohort labels appear in the series.
    assert!(report
        .series
        .iter()
        .all(|p| p.cohort.starts_with("Cohort ")));
}

#[test]
fn test_hierarchy_over_fixture() {
    let report = hierarchy::run(&fixture_table(), &registry()).unwrap();

    assert_eq!(
        report.latest_date,
        chrono::NaiveDate::from_ymd_opt(2022, 3, 31).unwrap()
    );

    let sunbelt = report
        .latest
        .iter()
        .find(|b| b.cohort.contains("Sunbelt"))
        .unwrap();
    assert!((sunbelt.mean - 50.0).abs() < 1e-9);

    // Exporters: SF (300-210)/210, NY (600-510)/510
    let exporters = report
        .latest
        .iter()
        .find(|b| b.cohort.contains("Wealth Exporters"))
        .unwrap();
    let sf = (300.0 - 210.0) / 210.0 * 100.0;
    let ny = (600.0 - 510.0) / 510.0 * 100.0;
    assert!((exporters.mean - (sf + ny) / 2.0).abs() < 1e-9);
    assert!((exporters.min - ny.min(sf)).abs() < 1e-9);
    assert!((exporters.max - ny.max(sf)).abs() < 1e-9);
}

#[test]
fn test_migration_report_from_components() {
    let rows = vec![
        ComponentsRow {
            name: "San Francisco-Oakland-Hayward, CA Metro Area".to_string(),
            net_migration_rate: -2.0,
            period_code: 7,
        },
        ComponentsRow {
            name: "San Francisco-Oakland-Hayward, CA Metro Area".to_string(),
            net_migration_rate: -6.0,
            period_code: 11,
        },
        ComponentsRow {
            name: "Austin-Round Rock, TX Metro Area".to_string(),
            net_migration_rate: 20.0,
            period_code: 7,
        },
    ];

    let report = migration::run(&rows, &registry()).unwrap();
    assert_eq!(report.latest_year(), Some(2019));

    let sf: Vec<_> = report
        .records
        .iter()
        .filter(|r| r.city == "San Francisco")
        .collect();
    assert_eq!(sf.len(), 2);
    assert_eq!(sf[0].year, 2015);
    assert_eq!(sf[1].year, 2019);
}

#[test]
fn test_mechanism_join_and_fit_over_fixture() {
    let label = exporters_label();
    let record = |city: &str, year: i32, rate: f64| MigrationRecord {
        cohort: label.clone(),
        city: city.to_string(),
        year,
        net_migration_rate: rate,
    };

    let migration = vec![
        record("San Francisco", 2015, -2.0),
        record("San Francisco", 2019, -6.0),
        record("New York", 2015, -1.0),
        record("New York", 2019, -3.0),
        // Unjoinable: no 2018 housing observation in the fixture
        record("New York", 2018, -2.5),
    ];

    let report = mechanism::run(&fixture_table(), &registry(), &migration).unwrap();

    assert_eq!(report.fit.n, 4);
    assert!(report.fit.beta.is_finite());
    assert!(report.fit.r_squared >= 0.0 && report.fit.r_squared <= 1.0);

    let sf_series = report.city_series("San Francisco");
    assert_eq!(sf_series.len(), 2);
    assert!((sf_series[0].zhvi - 150.0).abs() < 1e-9);
    assert!((sf_series[1].zhvi - 200.0).abs() < 1e-9);
}

#[test]
fn test_migration_csv_survives_round_trip_into_mechanism() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("migration.csv");
    let label = exporters_label();

    let records = vec![
        MigrationRecord {
            cohort: label.clone(),
            city: "San Francisco".to_string(),
            year: 2015,
            net_migration_rate: -2.0,
        },
        MigrationRecord {
            cohort: label.clone(),
            city: "San Francisco".to_string(),
            year: 2019,
            net_migration_rate: -6.0,
        },
        MigrationRecord {
            cohort: label,
            city: "New York".to_string(),
            year: 2015,
            net_migration_rate: -1.0,
        },
    ];

    panel::write_migration_csv(&path, &records).unwrap();
    let reloaded = panel::read_migration_csv(&path).unwrap();
    assert_eq!(reloaded, records);

    let report = mechanism::run(&fixture_table(), &registry(), &reloaded).unwrap();
    assert_eq!(report.fit.n, 3);
}
