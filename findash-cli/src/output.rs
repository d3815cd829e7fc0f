//! Terminal output for the report generator

use anyhow::Result;
use colored::*;
use findash_core::table::{Column, format_fy};
use findash_core::{Advisory, Dashboard, RenderPlan, Selection};
use std::path::{Path, PathBuf};

pub fn print_data_unavailable(path: &Path) {
    println!(
        "{} {}",
        "Data file not found:".yellow().bold(),
        path.display()
    );
    println!("Place the financial spreadsheet there or point --data at it.");
}

pub fn print_advisory(advisory: &Advisory) {
    println!("{} {}", "Note:".yellow().bold(), advisory);
}

/// List available companies and fiscal years.
pub fn print_listing(dashboard: &Dashboard) {
    println!("{}", "Companies:".bold().underline());
    for company in dashboard.display_companies() {
        println!("  {company}");
    }
    println!();
    println!("{}", "Fiscal years:".bold().underline());
    for year in dashboard.fiscal_years() {
        println!("  {}", format_fy(year));
    }
    println!();
    println!("{}", "Groups:".bold().underline());
    for group in dashboard.groups() {
        println!("  {}", group.name);
    }
}

pub fn print_listing_json(dashboard: &Dashboard) -> Result<()> {
    let output = serde_json::json!({
        "companies": dashboard.display_companies(),
        "fiscal_years": dashboard.fiscal_years(),
        "groups": dashboard.groups().iter().map(|g| g.name.clone()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One line per selected company with its headline figures.
pub fn print_summary(dashboard: &Dashboard, selection: &Selection) {
    println!(
        "{} {}",
        "Comparing for".bold(),
        format_fy(selection.fiscal_year).cyan().bold()
    );
    for company in &selection.companies {
        let display = dashboard.names().to_display(company);
        match dashboard.table().find(company, selection.fiscal_year) {
            Some(record) => {
                let revenue = record.get_or_zero(Column::Revenue);
                let margin = record.get_or_zero(Column::OperatingMargin);
                println!(
                    "  {} {} revenue {:.0}M, operating margin {:.1}%",
                    "•".green(),
                    display.bold(),
                    revenue,
                    margin
                );
            }
            None => {
                println!("  {} {} no data", "•".yellow(), display.bold());
            }
        }
    }
    println!();
}

pub fn print_written(paths: &[PathBuf]) {
    println!(
        "{}",
        format!("✓ Wrote {} report(s):", paths.len()).green().bold()
    );
    for path in paths {
        println!("  {}", path.display());
    }
}

pub fn print_reports_json(
    selection: &Selection,
    plan: &RenderPlan,
    paths: &[PathBuf],
) -> Result<()> {
    let entries: Vec<_> = plan
        .reports
        .iter()
        .zip(paths)
        .map(|(report, path)| {
            serde_json::json!({
                "title": report.title,
                "path": path,
            })
        })
        .collect();
    let output = serde_json::json!({
        "fiscal_year": selection.fiscal_year,
        "companies": selection.companies,
        "reports": entries,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
