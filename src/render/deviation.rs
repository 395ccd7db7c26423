use std::path::Path;

use plotters::prelude::*;

use super::axis_range;
use super::canvas::{Canvas, ChartArtifact};
use crate::data::model::{Table, GT_CORNERS, RB_CORNERS};
use crate::data::stats::difference;
use crate::error::ReportError;

pub const FILE_NAME: &str = "deviation_corners.png";

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

// ---------------------------------------------------------------------------
// Deviation line chart
// ---------------------------------------------------------------------------

/// Plot `gt_corners - rb_corners` against row index.
pub fn render(table: &Table, out_dir: &Path) -> Result<ChartArtifact, ReportError> {
    let diff = difference(table, GT_CORNERS, RB_CORNERS)?;
    if diff.is_empty() {
        return Err(ReportError::render("deviation chart needs at least one row"));
    }

    let x_range = axis_range([0.0, (diff.len() - 1) as f64])?;
    let y_range = axis_range(diff.iter().copied())?;

    let mut canvas = Canvas::new(800, 600)?;
    canvas.draw(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(20)
            .caption("Deviation of Model Corners from Ground Truth", ("sans-serif", 22))
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Room Index")
            .y_desc("Difference of Number of Corners (gt-rb)")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                diff.iter().enumerate().map(|(i, &d)| (i as f64, d)),
                ShapeStyle::from(&LINE_COLOR).stroke_width(2),
            ))?
            .label("difference")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&LINE_COLOR).stroke_width(2))
            });

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })?;

    canvas.save(&out_dir.join(FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::three_room_table;
    use crate::data::loader::parse_json;

    #[test]
    fn writes_deviation_png() {
        let dir = std::env::temp_dir().join(format!("corner_report_deviation_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let artifact = render(&three_room_table(), &dir).unwrap();
        assert_eq!(artifact.path, dir.join(FILE_NAME));
        assert!(artifact.path.is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_table_cannot_be_plotted() {
        let table = parse_json("[]").unwrap();
        assert!(render(&table, &std::env::temp_dir()).is_err());
    }
}
