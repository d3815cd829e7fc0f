//! Selection resolution and row filtering

use crate::groups::IndustryGroup;
use crate::names::NameMap;
use crate::table::{FinRecord, FinTable};
use std::fmt;

/// Upper bound on simultaneously compared companies.
pub const MAX_COMPANIES: usize = 7;
/// Default selection size for the freeform group.
pub const CUSTOM_DEFAULT_COMPANIES: usize = 5;
/// Length of the trend window, including the selected year.
pub const TREND_WINDOW_YEARS: i32 = 5;

/// A non-fatal, user-visible condition that halts rendering for the current
/// cycle without failing the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The user has not chosen any company.
    NoCompaniesSelected,
    /// Companies were chosen but no row matches the chosen fiscal year.
    NoMatchingRows,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NoCompaniesSelected => {
                write!(f, "Select at least one company to compare.")
            }
            Advisory::NoMatchingRows => {
                write!(f, "No rows match the selected companies and fiscal year.")
            }
        }
    }
}

/// What the user chose for one render cycle. Companies are data-space labels.
#[derive(Debug, Clone)]
pub struct Selection {
    pub companies: Vec<String>,
    pub fiscal_year: i32,
    pub trend: bool,
}

impl Selection {
    pub fn new(companies: Vec<String>, fiscal_year: i32) -> Self {
        Self {
            companies,
            fiscal_year,
            trend: false,
        }
    }

    pub fn with_trend(mut self, trend: bool) -> Self {
        self.trend = trend;
        self
    }
}

/// Row subsets for one render cycle, borrowed from the immutable table.
#[derive(Debug)]
pub struct FilteredRows<'a> {
    /// Rows of the selected companies in the selected fiscal year, in table
    /// order.
    pub current: Vec<&'a FinRecord>,
    /// Five-year window rows when trend mode is on and the window is
    /// non-empty.
    pub trend: Option<Vec<&'a FinRecord>>,
}

/// Resolve a selection into row subsets.
///
/// An empty company list and an empty current subset are distinct advisories.
/// An empty trend subset is not: it only suppresses the trend views.
pub fn filter_rows<'a>(
    table: &'a FinTable,
    selection: &Selection,
) -> Result<FilteredRows<'a>, Advisory> {
    if selection.companies.is_empty() {
        return Err(Advisory::NoCompaniesSelected);
    }

    let current: Vec<&FinRecord> = table
        .records()
        .iter()
        .filter(|r| {
            selection.companies.contains(&r.company) && r.fiscal_year == selection.fiscal_year
        })
        .collect();
    if current.is_empty() {
        return Err(Advisory::NoMatchingRows);
    }

    let trend = if selection.trend {
        let start_year = selection.fiscal_year - (TREND_WINDOW_YEARS - 1);
        let rows: Vec<&FinRecord> = table
            .records()
            .iter()
            .filter(|r| {
                selection.companies.contains(&r.company)
                    && r.fiscal_year >= start_year
                    && r.fiscal_year <= selection.fiscal_year
            })
            .collect();
        if rows.is_empty() { None } else { Some(rows) }
    } else {
        None
    };

    Ok(FilteredRows { current, trend })
}

/// Default display-name selection for a group choice.
///
/// A preset group yields its members that are actually present in the table
/// (checked after translation to data names), truncated to [`MAX_COMPANIES`].
/// The custom group, or an unknown group name, yields the first
/// [`CUSTOM_DEFAULT_COMPANIES`] of all available companies sorted by display
/// label.
pub fn preset_selection(
    table: &FinTable,
    names: &NameMap,
    groups: &[IndustryGroup],
    group_name: &str,
) -> Vec<String> {
    let available = table.companies();
    let preset = groups
        .iter()
        .find(|g| g.name == group_name)
        .filter(|g| !g.members.is_empty());

    match preset {
        Some(group) => group
            .members
            .iter()
            .filter(|display| {
                let data = names.to_data(display);
                available.iter().any(|a| a == data)
            })
            .take(MAX_COMPANIES)
            .cloned()
            .collect(),
        None => {
            let mut displays: Vec<String> = available
                .iter()
                .map(|data| names.to_display(data).to_string())
                .collect();
            displays.sort();
            displays.truncate(CUSTOM_DEFAULT_COMPANIES);
            displays
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups;
    use crate::table::{Column, FinRecord, FinTable};

    fn table() -> FinTable {
        FinTable::from_records(vec![
            FinRecord::new("A", 2019).with(Column::Revenue, 90.0),
            FinRecord::new("A", 2020).with(Column::Revenue, 100.0),
            FinRecord::new("B", 2020).with(Column::Revenue, 200.0),
            FinRecord::new("C", 2019).with(Column::Revenue, 50.0),
            FinRecord::new("C", 2020).with(Column::Revenue, 60.0),
        ])
    }

    #[test]
    fn test_filter_exact_rows_in_table_order() {
        let table = table();
        let selection = Selection::new(vec!["A".to_string(), "B".to_string()], 2020);
        let rows = filter_rows(&table, &selection).unwrap();
        let got: Vec<(&str, i32)> = rows
            .current
            .iter()
            .map(|r| (r.company.as_str(), r.fiscal_year))
            .collect();
        assert_eq!(got, vec![("A", 2020), ("B", 2020)]);
        assert!(rows.trend.is_none());
    }

    #[test]
    fn test_empty_selection_advisory() {
        let table = table();
        let selection = Selection::new(vec![], 2020);
        assert_eq!(
            filter_rows(&table, &selection).unwrap_err(),
            Advisory::NoCompaniesSelected
        );
    }

    #[test]
    fn test_no_matching_rows_advisory() {
        let table = table();
        let selection = Selection::new(vec!["A".to_string()], 1999);
        assert_eq!(
            filter_rows(&table, &selection).unwrap_err(),
            Advisory::NoMatchingRows
        );
    }

    #[test]
    fn test_trend_window_inclusive() {
        let table = FinTable::from_records(vec![
            FinRecord::new("A", 2015).with(Column::Revenue, 1.0),
            FinRecord::new("A", 2016).with(Column::Revenue, 2.0),
            FinRecord::new("A", 2020).with(Column::Revenue, 3.0),
        ]);
        let selection = Selection::new(vec!["A".to_string()], 2020).with_trend(true);
        let rows = filter_rows(&table, &selection).unwrap();
        let trend_years: Vec<i32> = rows
            .trend
            .unwrap()
            .iter()
            .map(|r| r.fiscal_year)
            .collect();
        // 2015 is outside the five-year window [2016, 2020].
        assert_eq!(trend_years, vec![2016, 2020]);
    }

    #[test]
    fn test_empty_trend_is_silent() {
        // The only other rows are outside the window; the current year itself
        // is always inside it, so use a table where trend equals current.
        let table = FinTable::from_records(vec![
            FinRecord::new("A", 2020).with(Column::Revenue, 3.0),
        ]);
        let selection = Selection::new(vec!["A".to_string()], 2020).with_trend(true);
        let rows = filter_rows(&table, &selection).unwrap();
        assert_eq!(rows.trend.as_ref().map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_preset_intersects_and_truncates() {
        let names = NameMap::default();
        let records: Vec<FinRecord> = ["ツルハ", "コスモス薬品", "サンドラッグ"]
            .iter()
            .map(|c| FinRecord::new(*c, 2020).with(Column::Revenue, 1.0))
            .collect();
        let table = FinTable::from_records(records);
        let selected =
            preset_selection(&table, &names, &groups::default_groups(), "ドラッグストア");
        assert_eq!(
            selected,
            vec![
                "ツルハ".to_string(),
                "コスモス薬品".to_string(),
                "サンドラッグ".to_string()
            ]
        );
    }

    #[test]
    fn test_preset_checks_membership_in_data_space() {
        let names = NameMap::default();
        // Present under its data-space spelling only.
        let table = FinTable::from_records(vec![
            FinRecord::new("USMH", 2020).with(Column::Revenue, 1.0),
        ]);
        let selected = preset_selection(
            &table,
            &names,
            &groups::default_groups(),
            "イオングループ",
        );
        assert_eq!(selected, vec!["U.S.M.H".to_string()]);
    }

    #[test]
    fn test_custom_group_defaults_to_first_five() {
        let names = NameMap::default();
        let records: Vec<FinRecord> = ["g", "a", "c", "b", "f", "e", "d"]
            .iter()
            .map(|c| FinRecord::new(*c, 2020).with(Column::Revenue, 1.0))
            .collect();
        let table = FinTable::from_records(records);
        let selected =
            preset_selection(&table, &names, &groups::default_groups(), groups::CUSTOM_GROUP);
        assert_eq!(selected, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_preset_truncates_to_max() {
        let names = NameMap::default();
        let members: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let group = IndustryGroup {
            name: "big".to_string(),
            members: members.clone(),
        };
        let records: Vec<FinRecord> = members
            .iter()
            .map(|c| FinRecord::new(c.clone(), 2020).with(Column::Revenue, 1.0))
            .collect();
        let table = FinTable::from_records(records);
        let selected = preset_selection(&table, &names, &[group], "big");
        assert_eq!(selected.len(), MAX_COMPANIES);
    }
}
