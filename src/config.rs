use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Report configuration
// ---------------------------------------------------------------------------

/// Where the measurement rows come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A `.json`, `.csv` or `.parquet` file.
    File(PathBuf),
    /// An in-memory JSON array of row objects.
    Json(String),
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::File(PathBuf::from("data.json"))
    }
}

/// Settings for one report run, independent of the data.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory the PNGs are written to (created if absent).
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
        }
    }
}
