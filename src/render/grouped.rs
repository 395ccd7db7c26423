use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use super::canvas::{Area, Canvas, ChartArtifact};
use super::{axis_range, column_offset, COLUMN_SPACING};
use crate::color::SeriesColors;
use crate::data::model::{StatisticFamily, Table, GT_CORNERS};
use crate::data::stats::group_by;
use crate::error::ReportError;

const PANEL_WIDTH: u32 = 500;
const PANEL_HEIGHT: u32 = 500;

pub fn file_name(family: StatisticFamily) -> String {
    format!("{}_grouped.png", family.file_prefix())
}

/// One scatter panel: a statistic column within one group.
struct Panel {
    title: String,
    color: RGBColor,
    points: Vec<(f64, f64)>,
}

// ---------------------------------------------------------------------------
// Grouped panel chart
// ---------------------------------------------------------------------------

/// Grid of scatter panels, one row per `gt_corners` group (first-seen order)
/// and one column per statistic of `family`.  Panels share the y range.
pub fn render(
    table: &Table,
    family: StatisticFamily,
    out_dir: &Path,
) -> Result<ChartArtifact, ReportError> {
    let columns = family.columns();
    table.require_columns(&columns)?;

    let groups = group_by(table, GT_CORNERS)?;
    if groups.is_empty() {
        return Err(ReportError::render("grouped chart needs at least one group"));
    }

    let colors = SeriesColors::new(&columns);
    let mut panels = Vec::with_capacity(groups.len() * columns.len());
    for group in &groups {
        if group.is_empty() {
            return Err(ReportError::render(format!("group {} has no rows", group.key)));
        }
        for (j, column) in columns.iter().enumerate() {
            let offset = column_offset(j, columns.len(), COLUMN_SPACING);
            let values = group.values(column)?;
            panels.push(Panel {
                title: format!("{column} - gt_corners: {}", group.key),
                color: colors.color_for(column),
                points: group
                    .row_indices
                    .iter()
                    .zip(values)
                    .map(|(&row, v)| (row as f64 + offset, v))
                    .collect(),
            });
        }
    }

    let y_range = axis_range(panels.iter().flat_map(|p| p.points.iter().map(|&(_, y)| y)))?;

    let n_rows = groups.len();
    let n_cols = columns.len();
    let mut canvas = Canvas::new(PANEL_WIDTH * n_cols as u32, PANEL_HEIGHT * n_rows as u32)?;
    canvas.draw(|root| {
        let body = root.titled(
            &format!("{} - Grouped by Number of Ground Truth Corners", family.title()),
            ("sans-serif", 28.0).into_font(),
        )?;
        // Row-major: panels were built group by group.
        for (cell, panel) in body.split_evenly((n_rows, n_cols)).iter().zip(&panels) {
            draw_panel(cell, panel, y_range.clone(), family.y_label())?;
        }
        Ok(())
    })?;

    canvas.save(&out_dir.join(file_name(family)))
}

fn draw_panel(
    area: &Area<'_>,
    panel: &Panel,
    y_range: Range<f64>,
    y_label: &str,
) -> Result<(), ReportError> {
    let x_range = axis_range(panel.points.iter().map(|&(x, _)| x))?;

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .caption(&panel.title, ("sans-serif", 18))
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Room Index")
        .y_desc(y_label)
        .draw()?;

    let color = panel.color;
    chart.draw_series(
        panel
            .points
            .iter()
            .map(|&p| Circle::new(p, 3, color.mix(0.7).filled())),
    )?;
    Ok(())
}
