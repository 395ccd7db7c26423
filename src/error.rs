use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Report error taxonomy
// ---------------------------------------------------------------------------

/// Every failure aborts the report; there is no retry path.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Input is not valid structured data or has the wrong shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A column needed by a computation is absent from the table.
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// A required cell is absent or null.
    #[error("row {row}: missing value for column '{column}'")]
    MissingValue { row: usize, column: String },

    /// Empty group, empty table or degenerate chart geometry.
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ReportError {
    pub fn parse(msg: impl Into<String>) -> Self {
        ReportError::Parse(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        ReportError::Render(msg.into())
    }

    pub fn missing_column(column: &str) -> Self {
        ReportError::MissingColumn {
            column: column.to_string(),
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_cell() {
        let err = ReportError::MissingValue {
            row: 3,
            column: "floor_min".to_string(),
        };
        assert_eq!(err.to_string(), "row 3: missing value for column 'floor_min'");

        let err = ReportError::missing_column("rb_corners");
        assert_eq!(err.to_string(), "missing column 'rb_corners'");
    }
}
