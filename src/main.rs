mod app;
mod color;
mod config;
mod data;
mod error;
mod render;

use anyhow::Context;

use app::ChartReportGenerator;
use config::{DataSource, ReportConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let generator = ChartReportGenerator::new(DataSource::default(), ReportConfig::default());
    let paths = generator
        .draw_plots()
        .context("generating corner deviation report")?;

    println!("{paths:?}");
    Ok(())
}
