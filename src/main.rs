mod app;
mod color;
mod data;
mod report;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use data::aggregate::aggregate;
use data::filter::FilterSelection;
use data::join::join_counties;
use data::loader::{self, LoadedData};
use data::model::Dimension;
use eframe::egui;
use report::SummaryReport;
use state::AppState;

#[derive(Parser)]
#[command(
    name = "disease-dashboard",
    about = "California infectious disease surveillance dashboard"
)]
struct Cli {
    /// Case table (.csv, .json or .parquet) with Disease, County, Year, Sex, Cases.
    #[arg(
        long,
        env = "DISEASE_DASH_CASES",
        default_value = "california_infectious_diseases.csv"
    )]
    cases: PathBuf,

    /// GeoJSON county boundaries.
    #[arg(
        long,
        env = "DISEASE_DASH_BOUNDARIES",
        default_value = "california-counties.geojson"
    )]
    boundaries: PathBuf,

    /// Print the aggregate for the given filters as JSON instead of opening a window.
    #[arg(long)]
    summary: bool,

    #[arg(long, requires = "summary")]
    disease: Option<String>,

    #[arg(long, requires = "summary")]
    county: Option<String>,

    #[arg(long, requires = "summary")]
    year: Option<String>,

    #[arg(long, requires = "summary")]
    sex: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Nothing can be drawn without both files, so a load failure ends here.
    let data = match loader::load(&cli.cases, &cli.boundaries) {
        Ok(data) => data,
        Err(e) => {
            log::error!("Failed to load dashboard data: {e}");
            if let Some(col) = e.missing_column() {
                log::error!("The case table header must include a '{col}' column");
            }
            return Err(e).context("loading dashboard data");
        }
    };

    if cli.summary {
        return print_summary(&cli, &data);
    }

    let state = AppState::new(data, cli.cases, cli.boundaries);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "California Infectious Disease Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}

/// Headless mode: validate the filters against the data, aggregate once and
/// write the report to stdout.
fn print_summary(cli: &Cli, data: &LoadedData) -> Result<()> {
    let mut selection = FilterSelection::default();
    for (dim, value) in [
        (Dimension::Disease, &cli.disease),
        (Dimension::County, &cli.county),
        (Dimension::Year, &cli.year),
        (Dimension::Sex, &cli.sex),
    ] {
        selection.set(dim, value.as_deref())?;
    }
    data.dataset.vocabulary.validate(&selection)?;

    let result = aggregate(&data.dataset.records, &selection);
    let join = join_counties(&result.by_county, &data.boundaries);
    println!("{}", SummaryReport::new(&selection, &result, &join).to_json()?);
    Ok(())
}
