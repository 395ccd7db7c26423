use std::path::PathBuf;

use crate::config::{DataSource, ReportConfig};
use crate::data::loader;
use crate::data::model::{StatisticFamily, Table};
use crate::error::ReportError;
use crate::render::canvas::ChartArtifact;
use crate::render::{deviation, grouped, trend};

// ---------------------------------------------------------------------------
// Report pipeline: load → derive → render → persist
// ---------------------------------------------------------------------------

pub struct ChartReportGenerator {
    pub source: DataSource,
    pub config: ReportConfig,
}

impl ChartReportGenerator {
    pub fn new(source: DataSource, config: ReportConfig) -> Self {
        Self { source, config }
    }

    /// Parse the configured source into a table.
    pub fn load(&self) -> Result<Table, ReportError> {
        match &self.source {
            DataSource::File(path) => loader::load_file(path),
            DataSource::Json(text) => loader::parse_json(text),
        }
    }

    /// Load the data, render every chart and return the written paths in
    /// generation order.
    pub fn draw_plots(&self) -> Result<Vec<PathBuf>, ReportError> {
        let table = self.load()?;
        let artifacts = self.render_all(&table)?;
        Ok(artifacts.into_iter().map(|a| a.path).collect())
    }

    /// Render the deviation chart, then the grouped and trend charts for
    /// ceiling and floor.  Stops at the first failure; charts already
    /// written stay on disk.
    pub fn render_all(&self, table: &Table) -> Result<Vec<ChartArtifact>, ReportError> {
        if table.is_empty() {
            return Err(ReportError::render("table has no rows"));
        }

        let out_dir = &self.config.output_dir;
        std::fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
            path: out_dir.clone(),
            source,
        })?;

        let mut artifacts = vec![deviation::render(table, out_dir)?];
        for family in StatisticFamily::ALL {
            artifacts.push(grouped::render(table, family, out_dir)?);
            artifacts.push(trend::render(table, family, out_dir)?);
        }

        for a in &artifacts {
            log::debug!("{} is {}x{}", a.path.display(), a.width, a.height);
        }
        log::info!("Report complete: {} charts in {}", artifacts.len(), out_dir.display());
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::THREE_ROOMS_JSON;

    fn generator(name: &str, source: DataSource) -> ChartReportGenerator {
        let output_dir = std::env::temp_dir()
            .join(format!("corner_report_app_{name}_{}", std::process::id()))
            .join("plots");
        ChartReportGenerator::new(source, ReportConfig { output_dir })
    }

    fn cleanup(generator: &ChartReportGenerator) {
        if let Some(parent) = generator.config.output_dir.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn draw_plots_returns_five_existing_files_in_order() {
        let generator = generator("five", DataSource::Json(THREE_ROOMS_JSON.to_string()));
        let paths = generator.draw_plots().unwrap();

        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "deviation_corners.png",
                "ceiling_deviation_grouped.png",
                "ceiling_deviation_overall_trend.png",
                "floor_deviation_grouped.png",
                "floor_deviation_overall_trend.png",
            ]
        );
        for path in &paths {
            assert!(path.starts_with(&generator.config.output_dir));
            assert!(path.is_file(), "{} was not written", path.display());
        }

        cleanup(&generator);
    }

    #[test]
    fn reads_rows_from_a_file_source() {
        let generator = generator("file", DataSource::Json(String::new()));
        let dir = generator.config.output_dir.parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("data.json");
        std::fs::write(&input, THREE_ROOMS_JSON).unwrap();

        let generator = ChartReportGenerator::new(DataSource::File(input), generator.config.clone());
        assert_eq!(generator.draw_plots().unwrap().len(), 5);

        cleanup(&generator);
    }

    #[test]
    fn empty_table_aborts_before_writing() {
        let generator = generator("empty", DataSource::Json("[]".to_string()));
        assert!(matches!(generator.draw_plots(), Err(ReportError::Render(_))));
        assert!(!generator.config.output_dir.exists());
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let generator = generator("bad", DataSource::Json("[{".to_string()));
        assert!(matches!(generator.draw_plots(), Err(ReportError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let generator = generator("nofile", DataSource::File(PathBuf::from("does/not/exist.json")));
        assert!(matches!(generator.draw_plots(), Err(ReportError::Io { .. })));
    }
}
