//! End-to-end planning over an in-memory table

use findash_core::plan::{Category, ChartKind};
use findash_core::table::{Column, FinRecord, FinTable, format_fy};
use findash_core::{Dashboard, DashboardConfig, NameMap, Selection};

fn record(company: &str, year: i32, revenue: f64) -> FinRecord {
    FinRecord::new(company, year)
        .with(Column::Revenue, revenue)
        .with(Column::OperatingProfit, revenue * 0.05)
        .with(Column::OperatingMargin, 5.0)
        .with(Column::GrossMargin, 28.0)
        .with(Column::Sga, revenue * 0.23)
        .with(Column::TotalAssets, revenue * 0.8)
        .with(Column::Inventory, revenue * 0.1)
        .with(Column::OperatingCf, revenue * 0.06)
        .with(Column::InvestingCf, -revenue * 0.03)
        .with(Column::FullTimeEmployees, 1000.0)
        .with(Column::PartTimeEmployees, 2000.0)
}

fn dashboard() -> Dashboard {
    let table = FinTable::from_records(vec![
        record("フジ", 2015, 100_000.0),
        record("フジ", 2019, 110_000.0),
        record("フジ", 2020, 120_000.0),
        record("USMH", 2019, 600_000.0),
        record("USMH", 2020, 650_000.0),
        record("ヤオコー", 2020, 500_000.0),
    ]);
    Dashboard::new(
        table,
        NameMap::default(),
        DashboardConfig::default().industry_groups(),
    )
}

#[test]
fn plans_all_categories_for_a_full_selection() {
    let dash = dashboard();
    let selection = Selection::new(
        dash.names()
            .to_data_all(&["フジ・リテイリング".to_string(), "U.S.M.H".to_string()]),
        2020,
    )
    .with_trend(true);

    let plan = dash.plan(&selection).unwrap();
    assert_eq!(plan.fiscal_year, 2020);
    assert_eq!(plan.reports.len(), 7);

    let pl = plan.report(Category::Profitability).unwrap();
    assert_eq!(pl.title, format!("Profitability comparison - {}", format_fy(2020)));
    // Charts carry display labels.
    assert_eq!(
        pl.charts[0].x_labels,
        vec!["フジ・リテイリング".to_string(), "U.S.M.H".to_string()]
    );

    // Growth index uses the 2015 base row for フジ and defaults for USMH.
    let growth = pl
        .charts
        .iter()
        .find(|c| c.title.starts_with("Revenue growth index"))
        .unwrap();
    assert_eq!(growth.series[0].values[0], 1.2);
    assert_eq!(growth.series[0].values[1], 1.0);

    // Cash flow chart only contains the series whose columns exist.
    let cf = plan.report(Category::CashFlow).unwrap();
    let labels: Vec<&str> = cf.charts[0]
        .series
        .iter()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Operating CF", "Investing CF"]);
    assert_eq!(cf.charts[0].kind, ChartKind::Bar);

    // Productivity uses full-time and all-staff denominators.
    let prod = plan.report(Category::Productivity).unwrap();
    let revenue_per_ft = &prod.table.rows[0]
        [prod.table.headers.iter().position(|h| h == "Revenue per full-time employee").unwrap()];
    assert_eq!(revenue_per_ft, "120.00"); // 120000 / 1000

    // Trend table spans the five-year window.
    let trend = plan.report(Category::Trend).unwrap();
    assert_eq!(trend.table.headers.len(), 1 + 5);
    assert_eq!(trend.table.headers[1], "FY2016");
}

#[test]
fn listing_uses_display_labels() {
    let dash = dashboard();
    assert_eq!(
        dash.display_companies(),
        vec![
            "U.S.M.H".to_string(),
            "フジ・リテイリング".to_string(),
            "ヤオコー".to_string()
        ]
    );
    assert_eq!(dash.fiscal_years(), vec![2020, 2019, 2015]);
}

#[test]
fn preset_selection_resolves_against_loaded_companies() {
    let dash = dashboard();
    let preset = dash.preset_selection("イオングループ");
    // Only the group members actually present, as display labels.
    assert_eq!(
        preset,
        vec!["フジ・リテイリング".to_string(), "U.S.M.H".to_string()]
    );
}

#[test]
fn missing_data_file_yields_no_dashboard() {
    let mut config = DashboardConfig::default();
    config.data_path = "does/not/exist.xlsx".into();
    assert!(Dashboard::load(&config).unwrap().is_none());
}
