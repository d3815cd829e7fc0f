use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use findash_core::groups::CUSTOM_GROUP;
use findash_core::select::MAX_COMPANIES;
use findash_core::{Dashboard, DashboardConfig, Selection};
use findash_report::RenderOptions;
use std::path::PathBuf;

mod output;

#[derive(Parser)]
#[command(name = "findash")]
#[command(about = "Comparative financial report generator for retail companies", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the financial data spreadsheet (overrides config)
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Industry group preset used when no companies are given
    #[arg(short, long, value_name = "GROUP")]
    group: Option<String>,

    /// Companies to compare, by display name (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    companies: Vec<String>,

    /// Fiscal year to compare (defaults to the latest in the data)
    #[arg(short, long, value_name = "YEAR")]
    year: Option<i32>,

    /// Include the five-year trend report
    #[arg(short, long)]
    trend: bool,

    /// Output directory for generated reports (overrides config)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// List available companies, fiscal years and groups, then exit
    #[arg(short, long)]
    list: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        DashboardConfig::discover(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(out) = &cli.out {
        config.output_dir = out.clone();
    }

    let Some(dashboard) = Dashboard::load(&config)? else {
        output::print_data_unavailable(&config.data_path);
        return Ok(());
    };

    if cli.list {
        match cli.format {
            OutputFormat::Human => output::print_listing(&dashboard),
            OutputFormat::Json => output::print_listing_json(&dashboard)?,
        }
        return Ok(());
    }

    let fiscal_year = match cli.year {
        Some(year) => year,
        None => *dashboard
            .fiscal_years()
            .first()
            .context("Data file contains no fiscal years")?,
    };

    let display_names = if cli.companies.is_empty() {
        let group = cli.group.as_deref().unwrap_or(CUSTOM_GROUP);
        dashboard.preset_selection(group)
    } else {
        let mut names = cli.companies.clone();
        if names.len() > MAX_COMPANIES {
            eprintln!(
                "{} comparing the first {MAX_COMPANIES} companies",
                "Warning:".yellow().bold()
            );
            names.truncate(MAX_COMPANIES);
        }
        names
    };

    let selection = Selection::new(dashboard.names().to_data_all(&display_names), fiscal_year)
        .with_trend(cli.trend);

    let plan = match dashboard.plan(&selection) {
        Ok(plan) => plan,
        Err(advisory) => {
            // Empty selections and empty result sets are user guidance,
            // not failures.
            output::print_advisory(&advisory);
            return Ok(());
        }
    };

    let options = RenderOptions {
        chart_width: config.chart.width,
        chart_height: config.chart.height,
    };
    let paths = findash_report::write_reports(&plan, &config.output_dir, &options)
        .context("Failed to write reports")?;

    match cli.format {
        OutputFormat::Human => {
            output::print_summary(&dashboard, &selection);
            output::print_written(&paths);
        }
        OutputFormat::Json => {
            output::print_reports_json(&selection, &plan, &paths)?;
        }
    }

    Ok(())
}
