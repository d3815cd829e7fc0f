//! findash-core: comparative company financial analysis
//!
//! Loads a spreadsheet of per-company annual financial figures into an
//! immutable table, translates between display and data company names,
//! derives comparison metrics, and plans per-category charts and tables for
//! a chosen set of companies and fiscal year.

pub mod config;
pub mod groups;
pub mod loader;
pub mod metrics;
pub mod names;
pub mod plan;
pub mod select;
pub mod table;

use anyhow::Result;

pub use config::DashboardConfig;
pub use groups::IndustryGroup;
pub use names::NameMap;
pub use plan::{Category, RenderPlan, build_plan};
pub use select::{Advisory, MAX_COMPANIES, Selection};
pub use table::{Column, FinRecord, FinTable};

/// Main entry point: the loaded table plus naming and grouping context.
///
/// Constructed once; the table inside is never mutated. A long-lived host
/// can hand it out behind shared ownership without locking.
pub struct Dashboard {
    table: FinTable,
    names: NameMap,
    groups: Vec<IndustryGroup>,
}

impl Dashboard {
    pub fn new(table: FinTable, names: NameMap, groups: Vec<IndustryGroup>) -> Self {
        Self {
            table,
            names,
            groups,
        }
    }

    /// Load the table described by the configuration.
    ///
    /// `Ok(None)` means the data file does not exist — a non-fatal condition
    /// the caller reports as an advisory.
    pub fn load(config: &DashboardConfig) -> Result<Option<Self>> {
        let names = config.name_map()?;
        let groups = config.industry_groups();
        let Some(table) = loader::load_table(&config.data_path)? else {
            return Ok(None);
        };
        Ok(Some(Self::new(table, names, groups)))
    }

    pub fn table(&self) -> &FinTable {
        &self.table
    }

    pub fn names(&self) -> &NameMap {
        &self.names
    }

    pub fn groups(&self) -> &[IndustryGroup] {
        &self.groups
    }

    /// Available companies as sorted display labels.
    pub fn display_companies(&self) -> Vec<String> {
        let mut companies = self.names.to_display_all(&self.table.companies());
        companies.sort();
        companies
    }

    /// Available fiscal years, newest first.
    pub fn fiscal_years(&self) -> Vec<i32> {
        self.table.fiscal_years()
    }

    /// Default display-name selection for a group.
    pub fn preset_selection(&self, group_name: &str) -> Vec<String> {
        select::preset_selection(&self.table, &self.names, &self.groups, group_name)
    }

    /// Plan all charts and tables for one selection.
    pub fn plan(&self, selection: &Selection) -> Result<RenderPlan, Advisory> {
        build_plan(&self.table, &self.names, selection)
    }
}
