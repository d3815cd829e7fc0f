//! findash-report: turn a render plan into HTML report documents
//!
//! Each category report becomes one self-contained HTML file; chart images
//! are rasterized with plotters and inlined as base64 PNGs. Categories are
//! independent of each other, so they render in parallel.

pub mod chart;
pub mod html;

use anyhow::{Context, Result};
use findash_core::RenderPlan;
use findash_core::plan::CategoryReport;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chart_width: 900,
            chart_height: 540,
        }
    }
}

/// One finished document, not yet written to disk.
pub struct RenderedReport {
    pub file_name: String,
    pub title: String,
    pub html: String,
}

/// Render every category report in the plan, in plan order.
pub fn render_plan(plan: &RenderPlan, options: &RenderOptions) -> Result<Vec<RenderedReport>> {
    plan.reports
        .par_iter()
        .map(|report| render_report(report, options))
        .collect()
}

fn render_report(report: &CategoryReport, options: &RenderOptions) -> Result<RenderedReport> {
    let charts = report
        .charts
        .iter()
        .map(|spec| chart::render_chart(spec, options.chart_width, options.chart_height))
        .collect::<Result<Vec<_>>>()?;
    Ok(RenderedReport {
        file_name: format!("{}.html", report.category.file_stem()),
        title: report.title.clone(),
        html: html::render_document(&report.title, &charts, &report.table),
    })
}

/// Render the plan and write one HTML file per category under `dir`.
/// Returns the written paths in plan order.
pub fn write_reports(
    plan: &RenderPlan,
    dir: &Path,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let rendered = render_plan(plan, options)?;
    let mut paths = Vec::with_capacity(rendered.len());
    for report in rendered {
        let path = dir.join(&report.file_name);
        fs::write(&path, report.html)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use findash_core::table::{Column, FinRecord, FinTable};
    use findash_core::{NameMap, Selection, build_plan};

    fn plan() -> RenderPlan {
        let table = FinTable::from_records(vec![
            FinRecord::new("フジ", 2023)
                .with(Column::Revenue, 1000.0)
                .with(Column::OperatingProfit, 50.0),
            FinRecord::new("ヤオコー", 2023)
                .with(Column::Revenue, 1200.0)
                .with(Column::OperatingProfit, 80.0),
        ]);
        let selection = Selection::new(
            vec!["フジ".to_string(), "ヤオコー".to_string()],
            2023,
        );
        build_plan(&table, &NameMap::default(), &selection).unwrap()
    }

    fn small() -> RenderOptions {
        RenderOptions {
            chart_width: 320,
            chart_height: 240,
        }
    }

    #[test]
    fn test_renders_every_category() {
        let plan = plan();
        let rendered = render_plan(&plan, &small()).unwrap();
        assert_eq!(rendered.len(), plan.reports.len());
        assert_eq!(rendered[0].file_name, "pl_comparison.html");
        assert!(rendered[0].html.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_writes_files_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_reports(&plan(), dir.path(), &small()).unwrap();
        assert!(!paths.is_empty());
        for path in &paths {
            let html = fs::read_to_string(path).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>"));
        }
    }
}
