use std::path::{Path, PathBuf};

use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::glyphs::GlyphBackend;
use crate::error::ReportError;

/// Drawing surface handed to chart code.
pub type Area<'a> = DrawingArea<GlyphBackend<BitMapBackend<'a>>, Shift>;

// ---------------------------------------------------------------------------
// Canvas – an explicit figure, one per chart
// ---------------------------------------------------------------------------

/// Owned RGB pixel buffer that a chart is painted into and then saved.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, ReportError> {
        if width == 0 || height == 0 {
            return Err(ReportError::render(format!(
                "degenerate canvas size {width}x{height}"
            )));
        }
        Ok(Canvas {
            width,
            height,
            pixels: vec![255; width as usize * height as usize * 3],
        })
    }

    /// Clear to white, run `paint` on the root area, and flush.
    pub fn draw<F>(&mut self, paint: F) -> Result<(), ReportError>
    where
        F: FnOnce(&Area<'_>) -> Result<(), ReportError>,
    {
        let size = (self.width, self.height);
        let backend = GlyphBackend::new(BitMapBackend::with_buffer(&mut self.pixels, size));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)?;
        paint(&root)?;
        root.present()?;
        Ok(())
    }

    /// Encode as PNG at `path`.
    pub fn save(self, path: &Path) -> Result<ChartArtifact, ReportError> {
        let (width, height) = (self.width, self.height);
        let image = RgbImage::from_raw(width, height, self.pixels)
            .ok_or_else(|| ReportError::render("pixel buffer does not match canvas size"))?;
        image.save(path).map_err(|source| ReportError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Wrote {} ({width}x{height})", path.display());
        Ok(ChartArtifact {
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}

// ---------------------------------------------------------------------------
// ChartArtifact – a chart written to storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}
