//! Derived financial metrics
//!
//! Every ratio with a financial-statement denominator that can legitimately
//! be zero goes through [`safe_divide`].

use crate::table::{Column, FinTable};

/// Division guarded against a zero denominator, defaulting to zero.
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    safe_divide_or(numerator, denominator, 0.0)
}

/// Division guarded against a zero denominator with an explicit default.
pub fn safe_divide_or(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        default
    }
}

/// Round to a fixed number of decimal digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Cost-of-goods ratio in percent, derived from the gross margin.
pub fn cost_of_goods_ratio(gross_margin: f64) -> f64 {
    100.0 - gross_margin
}

/// SG&A as a percentage of revenue.
pub fn sga_ratio(sga: f64, revenue: f64) -> f64 {
    safe_divide(sga * 100.0, revenue)
}

/// Revenue divided by inventory, rounded to one decimal.
pub fn inventory_turnover(revenue: f64, inventory: f64) -> f64 {
    round_to(safe_divide(revenue, inventory), 1)
}

/// Full-time plus part-time headcount; a missing part-time figure counts as
/// zero.
pub fn total_employees(full_time: f64, part_time: Option<f64>) -> f64 {
    full_time + part_time.unwrap_or(0.0)
}

/// A per-head figure rounded to two decimals.
pub fn per_employee(value: f64, employees: f64) -> f64 {
    round_to(safe_divide(value, employees), 2)
}

/// Years between the comparison year and the growth-index base year.
pub const GROWTH_BASE_OFFSET: i32 = 5;

/// Revenue growth index against the base year (`selected_year - 5`).
///
/// Defaults to 1.0 when the base-year row is absent or its revenue is zero.
pub fn growth_index(
    table: &FinTable,
    company: &str,
    selected_year: i32,
    current_revenue: f64,
) -> f64 {
    let base_year = selected_year - GROWTH_BASE_OFFSET;
    match table
        .find(company, base_year)
        .and_then(|r| r.get(Column::Revenue))
    {
        Some(base_revenue) if base_revenue > 0.0 => current_revenue / base_revenue,
        _ => 1.0,
    }
}

/// Mean of the nonzero values, `None` when every value is zero.
///
/// Used for the average-line overlay on comparative charts: companies with a
/// zero (i.e. missing) figure must not drag the average down.
pub fn mean_nonzero(values: &[f64]) -> Option<f64> {
    mean_where(values, |v| v != 0.0)
}

/// Mean of the strictly positive values, `None` when none qualify.
///
/// Valuation ratios use this variant: a non-positive PER or PBR is not a
/// meaningful figure.
pub fn mean_positive(values: &[f64]) -> Option<f64> {
    mean_where(values, |v| v > 0.0)
}

fn mean_where(values: &[f64], keep: impl Fn(f64) -> bool) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.iter().copied().filter(|v| keep(*v)) {
        sum += value;
        count += 1;
    }
    if count == 0 { None } else { Some(sum / count as f64) }
}
