//! Typed table model for loaded financial records

use std::collections::{BTreeMap, BTreeSet};

/// A numeric metric column of the source spreadsheet.
///
/// Each variant knows the header label used by the data file and an English
/// label for rendered output. The three identifying columns (company name,
/// fiscal year, fiscal quarter) are not part of this enum; they are parsed
/// into dedicated `FinRecord` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Revenue,
    OperatingRevenue,
    GrossMargin,
    Sga,
    OperatingProfit,
    OperatingMargin,
    TotalAssets,
    CurrentAssets,
    FixedAssets,
    Inventory,
    InterestBearingDebt,
    NetAssets,
    EquityRatio,
    AssetTurnover,
    OperatingCf,
    InvestingCf,
    FinancingCf,
    FreeCf,
    CashAndDeposits,
    FullTimeEmployees,
    PartTimeEmployees,
    Roe,
    RealRoe,
    Roa,
    Roic,
    PerForecast,
    Pbr,
    DividendYield,
    MarketCap,
}

impl Column {
    pub const ALL: &'static [Column] = &[
        Column::Revenue,
        Column::OperatingRevenue,
        Column::GrossMargin,
        Column::Sga,
        Column::OperatingProfit,
        Column::OperatingMargin,
        Column::TotalAssets,
        Column::CurrentAssets,
        Column::FixedAssets,
        Column::Inventory,
        Column::InterestBearingDebt,
        Column::NetAssets,
        Column::EquityRatio,
        Column::AssetTurnover,
        Column::OperatingCf,
        Column::InvestingCf,
        Column::FinancingCf,
        Column::FreeCf,
        Column::CashAndDeposits,
        Column::FullTimeEmployees,
        Column::PartTimeEmployees,
        Column::Roe,
        Column::RealRoe,
        Column::Roa,
        Column::Roic,
        Column::PerForecast,
        Column::Pbr,
        Column::DividendYield,
        Column::MarketCap,
    ];

    /// Header label as it appears in the source spreadsheet.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Revenue => "売上高",
            Column::OperatingRevenue => "営業収入",
            Column::GrossMargin => "売上総利益率",
            Column::Sga => "販管費",
            Column::OperatingProfit => "営業利益",
            Column::OperatingMargin => "営業利益率",
            Column::TotalAssets => "総資産",
            Column::CurrentAssets => "流動資産",
            Column::FixedAssets => "固定資産",
            Column::Inventory => "棚卸資産",
            Column::InterestBearingDebt => "有利子負債",
            Column::NetAssets => "純資産",
            Column::EquityRatio => "自己資本比率",
            Column::AssetTurnover => "総資産回転率",
            Column::OperatingCf => "営業CF",
            Column::InvestingCf => "投資CF",
            Column::FinancingCf => "財務CF",
            Column::FreeCf => "フリーCF",
            Column::CashAndDeposits => "現金及び預金",
            Column::FullTimeEmployees => "従業員数",
            Column::PartTimeEmployees => "パート社員",
            Column::Roe => "ROE",
            Column::RealRoe => "実質ROE",
            Column::Roa => "ROA",
            Column::Roic => "ROIC",
            Column::PerForecast => "PER（会予）",
            Column::Pbr => "PBR",
            Column::DividendYield => "配当利回り（実績）",
            Column::MarketCap => "時価総額",
        }
    }

    /// Label used in rendered tables and chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Column::Revenue => "Revenue",
            Column::OperatingRevenue => "Operating revenue",
            Column::GrossMargin => "Gross margin",
            Column::Sga => "SG&A",
            Column::OperatingProfit => "Operating profit",
            Column::OperatingMargin => "Operating margin",
            Column::TotalAssets => "Total assets",
            Column::CurrentAssets => "Current assets",
            Column::FixedAssets => "Fixed assets",
            Column::Inventory => "Inventory",
            Column::InterestBearingDebt => "Interest-bearing debt",
            Column::NetAssets => "Net assets",
            Column::EquityRatio => "Equity ratio",
            Column::AssetTurnover => "Asset turnover",
            Column::OperatingCf => "Operating CF",
            Column::InvestingCf => "Investing CF",
            Column::FinancingCf => "Financing CF",
            Column::FreeCf => "Free CF",
            Column::CashAndDeposits => "Cash and deposits",
            Column::FullTimeEmployees => "Full-time employees",
            Column::PartTimeEmployees => "Part-time employees",
            Column::Roe => "ROE",
            Column::RealRoe => "Real ROE",
            Column::Roa => "ROA",
            Column::Roic => "ROIC",
            Column::PerForecast => "PER (forecast)",
            Column::Pbr => "PBR",
            Column::DividendYield => "Dividend yield",
            Column::MarketCap => "Market cap",
        }
    }

    /// Resolve a header cell to a known metric column.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.iter().copied().find(|c| c.header() == header)
    }
}

/// One row of the table: one company in one fiscal year.
///
/// The value map holds exactly the metric columns present in the source
/// header. Missing values inside a present column have already been cleaned
/// to the zero sentinel by the loader.
#[derive(Debug, Clone)]
pub struct FinRecord {
    pub company: String,
    pub fiscal_year: i32,
    pub fiscal_quarter: Option<String>,
    values: BTreeMap<Column, f64>,
}

impl FinRecord {
    pub fn new(company: impl Into<String>, fiscal_year: i32) -> Self {
        Self {
            company: company.into(),
            fiscal_year,
            fiscal_quarter: None,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style value assignment, convenient for tests and the loader.
    pub fn with(mut self, column: Column, value: f64) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: Column, value: f64) {
        self.values.insert(column, value);
    }

    /// Value of a column, `None` when the column is not in the schema.
    pub fn get(&self, column: Column) -> Option<f64> {
        self.values.get(&column).copied()
    }

    /// Value of a column with the zero sentinel for absent columns.
    pub fn get_or_zero(&self, column: Column) -> f64 {
        self.get(column).unwrap_or(0.0)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.values.keys().copied()
    }
}

/// The loaded financial table: an immutable snapshot constructed once by the
/// loader and shared read-only afterwards. Derived subsets are always new
/// vectors, never in-place mutations.
#[derive(Debug, Clone)]
pub struct FinTable {
    records: Vec<FinRecord>,
    schema: BTreeSet<Column>,
}

impl FinTable {
    pub fn new(records: Vec<FinRecord>, schema: BTreeSet<Column>) -> Self {
        Self { records, schema }
    }

    /// Build a table whose schema is the union of the record columns.
    /// The loader uses [`FinTable::new`] with the header-derived schema;
    /// this constructor is for in-memory tables.
    pub fn from_records(records: Vec<FinRecord>) -> Self {
        let schema = records.iter().flat_map(|r| r.columns()).collect();
        Self { records, schema }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[FinRecord] {
        &self.records
    }

    pub fn schema(&self) -> &BTreeSet<Column> {
        &self.schema
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.schema.contains(&column)
    }

    pub fn has_columns(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.schema.contains(c))
    }

    /// Requested columns intersected with the schema, preserving the
    /// requested order. The displayed metric set is always this projection.
    pub fn project(&self, requested: &[Column]) -> Vec<Column> {
        requested
            .iter()
            .copied()
            .filter(|c| self.schema.contains(c))
            .collect()
    }

    /// Sorted unique data-space company labels.
    pub fn companies(&self) -> Vec<String> {
        let mut companies: Vec<String> = self.records.iter().map(|r| r.company.clone()).collect();
        companies.sort();
        companies.dedup();
        companies
    }

    /// Unique fiscal years, newest first.
    pub fn fiscal_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.fiscal_year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// First record for a company in a given fiscal year, if any.
    pub fn find(&self, company: &str, fiscal_year: i32) -> Option<&FinRecord> {
        self.records
            .iter()
            .find(|r| r.company == company && r.fiscal_year == fiscal_year)
    }
}

/// Format a fiscal year as "FY<year>".
pub fn format_fy(year: i32) -> String {
    format!("FY{year}")
}
