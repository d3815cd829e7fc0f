//! Pure render planning
//!
//! `build_plan` turns an explicit [`Selection`] into a [`RenderPlan`] value
//! describing every chart and table to produce, with no presentation
//! framework involved. A chart or table column only appears when all of the
//! metric columns it needs are present in the loaded schema.

use crate::metrics;
use crate::names::NameMap;
use crate::select::{Advisory, FilteredRows, Selection, TREND_WINDOW_YEARS, filter_rows};
use crate::table::{Column, FinRecord, FinTable, format_fy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

/// One plotted series. Single-series charts leave the label empty.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    /// One value per x position; NaN marks a gap (no point drawn).
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_labels: Vec<String>,
    pub series: Vec<Series>,
    /// Mean overlay drawn as a horizontal line, if computed.
    pub average: Option<f64>,
    /// Fixed reference line (e.g. growth index 1.0, PBR 1.0).
    pub baseline: Option<f64>,
}

/// A formatted data table, one row per company (or per series).
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    fn with_label_column(header: &str, labels: &[String]) -> Self {
        Self {
            headers: vec![header.to_string()],
            rows: labels.iter().map(|l| vec![l.clone()]).collect(),
        }
    }

    /// Append one column; `values` must have one entry per existing row.
    fn push_column(&mut self, header: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(header.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
}

/// Analytical report categories, one exported document each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Profitability,
    KeyIndicators,
    CostStructure,
    BalanceSheet,
    CashFlow,
    Productivity,
    Trend,
}

impl Category {
    pub fn title(&self) -> &'static str {
        match self {
            Category::Profitability => "Profitability comparison",
            Category::KeyIndicators => "Key indicator comparison",
            Category::CostStructure => "Revenue and cost structure",
            Category::BalanceSheet => "Balance sheet comparison",
            Category::CashFlow => "Cash flow comparison",
            Category::Productivity => "Labor productivity comparison",
            Category::Trend => "Five-year trend",
        }
    }

    /// Stem of the exported report file.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Category::Profitability => "pl_comparison",
            Category::KeyIndicators => "kpi_comparison",
            Category::CostStructure => "structure_comparison",
            Category::BalanceSheet => "bs_comparison",
            Category::CashFlow => "cf_comparison",
            Category::Productivity => "productivity_comparison",
            Category::Trend => "trend_overview",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: Category,
    /// Document title, already carrying the fiscal-year suffix.
    pub title: String,
    pub charts: Vec<ChartSpec>,
    pub table: TableSpec,
}

#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub fiscal_year: i32,
    pub reports: Vec<CategoryReport>,
}

impl RenderPlan {
    pub fn report(&self, category: Category) -> Option<&CategoryReport> {
        self.reports.iter().find(|r| r.category == category)
    }
}

/// Build the full render plan for one selection.
pub fn build_plan(
    table: &FinTable,
    names: &NameMap,
    selection: &Selection,
) -> Result<RenderPlan, Advisory> {
    let rows: FilteredRows = filter_rows(table, selection)?;
    let ctx = PlanContext {
        table,
        names,
        selection,
        rows: &rows.current,
    };

    let mut reports = vec![
        ctx.profitability(),
        ctx.key_indicators(),
        ctx.cost_structure(),
        ctx.balance_sheet(),
        ctx.cash_flow(),
        ctx.productivity(),
    ];
    if let Some(trend_rows) = &rows.trend {
        reports.push(ctx.trend(trend_rows));
    }

    Ok(RenderPlan {
        fiscal_year: selection.fiscal_year,
        reports,
    })
}

struct PlanContext<'a> {
    table: &'a FinTable,
    names: &'a NameMap,
    selection: &'a Selection,
    rows: &'a [&'a FinRecord],
}

impl PlanContext<'_> {
    fn display_labels(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| self.names.to_display(&r.company).to_string())
            .collect()
    }

    fn values(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|r| r.get_or_zero(column)).collect()
    }

    fn document_title(&self, category: Category) -> String {
        format!(
            "{} - {}",
            category.title(),
            format_fy(self.selection.fiscal_year)
        )
    }

    fn single_series(
        &self,
        kind: ChartKind,
        title: impl Into<String>,
        values: Vec<f64>,
    ) -> ChartSpec {
        ChartSpec {
            title: title.into(),
            kind,
            x_labels: self.display_labels(),
            series: vec![Series {
                label: String::new(),
                values,
            }],
            average: None,
            baseline: None,
        }
    }

    /// Bar chart of one column, skipped when the column is absent.
    fn bar(&self, column: Column, title: &str) -> Option<ChartSpec> {
        self.table
            .has_column(column)
            .then(|| self.single_series(ChartKind::Bar, title, self.values(column)))
    }

    /// Line chart of one column, skipped when the column is absent.
    fn line(&self, column: Column, title: &str) -> Option<ChartSpec> {
        self.table
            .has_column(column)
            .then(|| self.single_series(ChartKind::Line, title, self.values(column)))
    }

    /// Base detail table: company labels plus the requested columns that are
    /// actually present, formatted per column.
    fn column_table(&self, requested: &[Column]) -> TableSpec {
        let columns = self.table.project(requested);
        let mut table = TableSpec::with_label_column("Company", &self.display_labels());
        for column in columns {
            let values = self
                .rows
                .iter()
                .map(|r| format_value(column, r.get_or_zero(column)))
                .collect();
            table.push_column(column.label(), values);
        }
        table
    }

    fn profitability(&self) -> CategoryReport {
        let year = self.selection.fiscal_year;
        let mut charts = Vec::new();
        charts.extend(self.bar(Column::Revenue, "Revenue (millions)"));
        charts.extend(self.bar(Column::OperatingProfit, "Operating profit (millions)"));
        if self.table.has_column(Column::Revenue) {
            let values: Vec<f64> = self
                .rows
                .iter()
                .map(|r| {
                    metrics::growth_index(
                        self.table,
                        &r.company,
                        year,
                        r.get_or_zero(Column::Revenue),
                    )
                })
                .collect();
            let mut chart = self.single_series(
                ChartKind::Line,
                format!(
                    "Revenue growth index ({} = 1.0)",
                    format_fy(year - metrics::GROWTH_BASE_OFFSET)
                ),
                values,
            );
            chart.baseline = Some(1.0);
            charts.push(chart);
        }
        charts.extend(self.line(Column::OperatingMargin, "Operating margin (%)"));

        CategoryReport {
            category: Category::Profitability,
            title: self.document_title(Category::Profitability),
            charts,
            table: self.column_table(&[
                Column::Revenue,
                Column::OperatingRevenue,
                Column::GrossMargin,
                Column::Sga,
                Column::OperatingProfit,
                Column::OperatingMargin,
            ]),
        }
    }

    fn key_indicators(&self) -> CategoryReport {
        let mut charts = Vec::new();
        for (column, title) in [
            (Column::Roic, "ROIC (%)"),
            (Column::RealRoe, "Real ROE (%)"),
            (Column::Roa, "ROA (%)"),
            (Column::Roe, "ROE (%)"),
        ] {
            if let Some(mut chart) = self.line(column, title) {
                chart.average = metrics::mean_nonzero(&chart.series[0].values);
                charts.push(chart);
            }
        }
        for (column, title, baseline) in [
            (Column::PerForecast, "PER forecast (x)", None),
            (Column::Pbr, "PBR (x)", Some(1.0)),
            (Column::DividendYield, "Dividend yield (%)", None),
        ] {
            if let Some(mut chart) = self.bar(column, title) {
                chart.average = metrics::mean_positive(&chart.series[0].values);
                chart.baseline = baseline;
                charts.push(chart);
            }
        }
        charts.extend(self.bar(Column::MarketCap, "Market cap (millions)"));

        CategoryReport {
            category: Category::KeyIndicators,
            title: self.document_title(Category::KeyIndicators),
            charts,
            table: self.column_table(&[
                Column::Roe,
                Column::RealRoe,
                Column::Roa,
                Column::Roic,
                Column::OperatingMargin,
                Column::EquityRatio,
                Column::PerForecast,
                Column::Pbr,
                Column::DividendYield,
                Column::MarketCap,
            ]),
        }
    }

    fn cost_structure(&self) -> CategoryReport {
        let mut charts = Vec::new();
        if self.table.has_columns(&[Column::Revenue, Column::OperatingRevenue]) {
            charts.push(ChartSpec {
                title: "Revenue composition (millions)".to_string(),
                kind: ChartKind::Bar,
                x_labels: self.display_labels(),
                series: vec![
                    Series {
                        label: Column::Revenue.label().to_string(),
                        values: self.values(Column::Revenue),
                    },
                    Series {
                        label: Column::OperatingRevenue.label().to_string(),
                        values: self.values(Column::OperatingRevenue),
                    },
                ],
                average: None,
                baseline: None,
            });
        }

        let have_breakdown = self.table.has_columns(&[
            Column::GrossMargin,
            Column::Sga,
            Column::Revenue,
            Column::OperatingMargin,
        ]);
        let cost_ratios: Vec<f64> = self
            .rows
            .iter()
            .map(|r| metrics::cost_of_goods_ratio(r.get_or_zero(Column::GrossMargin)))
            .collect();
        let sga_ratios: Vec<f64> = self
            .rows
            .iter()
            .map(|r| {
                metrics::sga_ratio(r.get_or_zero(Column::Sga), r.get_or_zero(Column::Revenue))
            })
            .collect();
        if have_breakdown {
            charts.push(ChartSpec {
                title: "Cost structure (% of revenue)".to_string(),
                kind: ChartKind::Bar,
                x_labels: self.display_labels(),
                series: vec![
                    Series {
                        label: "Cost of goods ratio".to_string(),
                        values: cost_ratios.clone(),
                    },
                    Series {
                        label: "SG&A ratio".to_string(),
                        values: sga_ratios.clone(),
                    },
                    Series {
                        label: Column::OperatingMargin.label().to_string(),
                        values: self.values(Column::OperatingMargin),
                    },
                ],
                average: None,
                baseline: None,
            });
        }

        let mut table = TableSpec::with_label_column("Company", &self.display_labels());
        if have_breakdown {
            table.push_column(
                "Cost of goods ratio",
                cost_ratios
                    .iter()
                    .map(|v| format!("{:.1}", metrics::round_to(*v, 1)))
                    .collect(),
            );
            table.push_column(
                "SG&A ratio",
                sga_ratios
                    .iter()
                    .map(|v| format!("{:.1}", metrics::round_to(*v, 1)))
                    .collect(),
            );
            table.push_column(
                Column::OperatingMargin.label(),
                self.values(Column::OperatingMargin)
                    .iter()
                    .map(|v| format!("{:.1}", metrics::round_to(*v, 1)))
                    .collect(),
            );
        }

        CategoryReport {
            category: Category::CostStructure,
            title: self.document_title(Category::CostStructure),
            charts,
            table,
        }
    }

    fn balance_sheet(&self) -> CategoryReport {
        let mut charts = Vec::new();
        charts.extend(self.bar(Column::TotalAssets, "Total assets (millions)"));
        charts.extend(self.bar(Column::Inventory, "Inventory (millions)"));
        charts.extend(self.line(Column::AssetTurnover, "Asset turnover (x)"));

        let have_turnover = self.table.has_columns(&[Column::Revenue, Column::Inventory]);
        let turnovers: Vec<f64> = self
            .rows
            .iter()
            .map(|r| {
                metrics::inventory_turnover(
                    r.get_or_zero(Column::Revenue),
                    r.get_or_zero(Column::Inventory),
                )
            })
            .collect();
        if have_turnover {
            charts.push(self.single_series(
                ChartKind::Line,
                "Inventory turnover (x)",
                turnovers.clone(),
            ));
        }

        let mut table = self.column_table(&[
            Column::TotalAssets,
            Column::CurrentAssets,
            Column::FixedAssets,
            Column::Inventory,
            Column::InterestBearingDebt,
            Column::NetAssets,
            Column::EquityRatio,
            Column::AssetTurnover,
        ]);
        if have_turnover {
            table.push_column(
                "Inventory turnover",
                turnovers.iter().map(|v| format!("{v:.1}")).collect(),
            );
        }

        CategoryReport {
            category: Category::BalanceSheet,
            title: self.document_title(Category::BalanceSheet),
            charts,
            table,
        }
    }

    fn cash_flow(&self) -> CategoryReport {
        let cf_columns = [
            Column::OperatingCf,
            Column::InvestingCf,
            Column::FinancingCf,
            Column::FreeCf,
        ];
        let series: Vec<Series> = cf_columns
            .iter()
            .filter(|c| self.table.has_column(**c))
            .map(|c| Series {
                label: c.label().to_string(),
                values: self.values(*c),
            })
            .collect();
        let charts = if series.is_empty() {
            Vec::new()
        } else {
            vec![ChartSpec {
                title: "Cash flows (millions)".to_string(),
                kind: ChartKind::Bar,
                x_labels: self.display_labels(),
                series,
                average: None,
                baseline: Some(0.0),
            }]
        };

        CategoryReport {
            category: Category::CashFlow,
            title: self.document_title(Category::CashFlow),
            charts,
            table: self.column_table(&[
                Column::OperatingCf,
                Column::InvestingCf,
                Column::FinancingCf,
                Column::FreeCf,
                Column::CashAndDeposits,
            ]),
        }
    }

    fn productivity(&self) -> CategoryReport {
        let have_regular = self
            .table
            .has_columns(&[Column::Revenue, Column::FullTimeEmployees]);
        let have_profit = self
            .table
            .has_columns(&[Column::OperatingProfit, Column::FullTimeEmployees]);

        let per_head = |value_col: Column, all_staff: bool| -> Vec<f64> {
            self.rows
                .iter()
                .map(|r| {
                    let heads = if all_staff {
                        metrics::total_employees(
                            r.get_or_zero(Column::FullTimeEmployees),
                            r.get(Column::PartTimeEmployees),
                        )
                    } else {
                        r.get_or_zero(Column::FullTimeEmployees)
                    };
                    metrics::per_employee(r.get_or_zero(value_col), heads)
                })
                .collect()
        };

        let regular_revenue = per_head(Column::Revenue, false);
        let regular_profit = per_head(Column::OperatingProfit, false);
        let all_revenue = per_head(Column::Revenue, true);
        let all_profit = per_head(Column::OperatingProfit, true);

        let mut charts = Vec::new();
        if have_regular {
            charts.push(self.single_series(
                ChartKind::Bar,
                "Revenue per full-time employee (millions)",
                regular_revenue.clone(),
            ));
        }
        if have_profit {
            charts.push(self.single_series(
                ChartKind::Bar,
                "Operating profit per full-time employee (millions)",
                regular_profit.clone(),
            ));
        }
        if have_regular {
            charts.push(self.single_series(
                ChartKind::Bar,
                "Revenue per employee, all staff (millions)",
                all_revenue.clone(),
            ));
        }
        if have_profit {
            charts.push(self.single_series(
                ChartKind::Bar,
                "Operating profit per employee, all staff (millions)",
                all_profit.clone(),
            ));
        }

        let mut table =
            self.column_table(&[Column::FullTimeEmployees, Column::PartTimeEmployees]);
        if have_regular {
            table.push_column(
                "Revenue per full-time employee",
                regular_revenue.iter().map(|v| format!("{v:.2}")).collect(),
            );
            table.push_column(
                "Revenue per employee (all staff)",
                all_revenue.iter().map(|v| format!("{v:.2}")).collect(),
            );
        }
        if have_profit {
            table.push_column(
                "Operating profit per full-time employee",
                regular_profit.iter().map(|v| format!("{v:.2}")).collect(),
            );
            table.push_column(
                "Operating profit per employee (all staff)",
                all_profit.iter().map(|v| format!("{v:.2}")).collect(),
            );
        }

        CategoryReport {
            category: Category::Productivity,
            title: self.document_title(Category::Productivity),
            charts,
            table,
        }
    }

    fn trend(&self, trend_rows: &[&FinRecord]) -> CategoryReport {
        let end_year = self.selection.fiscal_year;
        let start_year = end_year - (TREND_WINDOW_YEARS - 1);
        let years: Vec<i32> = (start_year..=end_year).collect();
        let x_labels: Vec<String> = years.iter().map(|y| format_fy(*y)).collect();

        // One series per selected company, in selection order; years with no
        // row become NaN gaps.
        let company_series = |column: Column| -> Vec<Series> {
            self.selection
                .companies
                .iter()
                .filter_map(|company| {
                    let values: Vec<f64> = years
                        .iter()
                        .map(|year| {
                            trend_rows
                                .iter()
                                .find(|r| &r.company == company && r.fiscal_year == *year)
                                .map(|r| r.get_or_zero(column))
                                .unwrap_or(f64::NAN)
                        })
                        .collect();
                    values.iter().any(|v| v.is_finite()).then(|| Series {
                        label: self.names.to_display(company).to_string(),
                        values,
                    })
                })
                .collect()
        };

        let mut charts = Vec::new();
        if self.table.has_column(Column::Revenue) {
            charts.push(ChartSpec {
                title: "Revenue trend (millions)".to_string(),
                kind: ChartKind::Line,
                x_labels: x_labels.clone(),
                series: company_series(Column::Revenue),
                average: None,
                baseline: None,
            });
        }
        if self.table.has_column(Column::OperatingMargin) {
            charts.push(ChartSpec {
                title: "Operating margin trend (%)".to_string(),
                kind: ChartKind::Line,
                x_labels: x_labels.clone(),
                series: company_series(Column::OperatingMargin),
                average: None,
                baseline: None,
            });
        }

        // Revenue per year as the document table.
        let labels: Vec<String> = company_series(Column::Revenue)
            .iter()
            .map(|s| s.label.clone())
            .collect();
        let mut table = TableSpec::with_label_column("Company", &labels);
        if self.table.has_column(Column::Revenue) {
            for (idx, year_label) in x_labels.iter().enumerate() {
                let values = company_series(Column::Revenue)
                    .iter()
                    .map(|s| {
                        let v = s.values[idx];
                        if v.is_finite() {
                            format_thousands(v)
                        } else {
                            "-".to_string()
                        }
                    })
                    .collect();
                table.push_column(year_label, values);
            }
        }

        CategoryReport {
            category: Category::Trend,
            title: format!(
                "{} ({} - {})",
                Category::Trend.title(),
                format_fy(start_year),
                format_fy(end_year)
            ),
            charts,
            table,
        }
    }
}

/// Format a cell per column kind: amounts with a thousands separator, ratios
/// with one decimal, multiples with two.
fn format_value(column: Column, value: f64) -> String {
    match column {
        Column::GrossMargin
        | Column::OperatingMargin
        | Column::EquityRatio
        | Column::Roe
        | Column::RealRoe
        | Column::Roa
        | Column::Roic => format!("{value:.1}"),
        Column::AssetTurnover
        | Column::PerForecast
        | Column::Pbr
        | Column::DividendYield => format!("{value:.2}"),
        _ => format_thousands(value),
    }
}

/// Round to a whole number and insert thousands separators.
fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
