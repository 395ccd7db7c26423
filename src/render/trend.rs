use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use super::canvas::{Area, Canvas, ChartArtifact};
use super::{axis_range, column_offset, COLUMN_SPACING};
use crate::color::SeriesColors;
use crate::data::model::{StatisticFamily, Table, GT_CORNERS};
use crate::data::stats::{group_by, GroupSummary};
use crate::error::ReportError;

/// Half the height of the band marking a group mean.
const BAND_HALF_HEIGHT: f64 = 1.5;
/// Error bar cap width in pixels.
const CAP_WIDTH: u32 = 10;

pub fn file_name(family: StatisticFamily) -> String {
    format!("{}_overall_trend.png", family.file_prefix())
}

/// What the error bar over a mean band shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whisker {
    /// ± sample standard deviation.
    Std,
    /// Observed range: `mean - min` below, `max - mean` above.
    Range,
}

/// Absolute `(low, high)` span of the error bar, or `None` when the group has
/// no spread and the bar is suppressed.
pub fn error_bar_span(summary: &GroupSummary, whisker: Whisker) -> Option<(f64, f64)> {
    if !summary.has_spread() {
        return None;
    }
    let (below, above) = match whisker {
        Whisker::Std => (summary.std, summary.std),
        Whisker::Range => summary.whiskers(),
    };
    Some((summary.mean - below, summary.mean + above))
}

/// A mean band at its horizontal position.
struct Band {
    x: f64,
    summary: GroupSummary,
}

struct Series {
    column: &'static str,
    color: RGBColor,
    bands: Vec<Band>,
}

/// One series per statistic column, each with a band per group.
fn build_series(table: &Table, family: StatisticFamily) -> Result<Vec<Series>, ReportError> {
    let columns = family.columns();
    table.require_columns(&columns)?;

    let groups = group_by(table, GT_CORNERS)?;
    if groups.is_empty() {
        return Err(ReportError::render("trend chart needs at least one group"));
    }

    let colors = SeriesColors::new(&columns);
    let mut series = Vec::with_capacity(columns.len());
    for (j, &column) in columns.iter().enumerate() {
        let offset = column_offset(j, columns.len(), COLUMN_SPACING);
        let bands = groups
            .iter()
            .map(|g| {
                Ok(Band {
                    x: g.key.value() + offset,
                    summary: g.summarize(column)?,
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;
        series.push(Series {
            column,
            color: colors.color_for(column),
            bands,
        });
    }
    Ok(series)
}

/// Error bars of one series as `(x, low, mean, high)`.  Bands without
/// spread contribute none.
fn error_bars(series: &Series, whisker: Whisker) -> Vec<(f64, f64, f64, f64)> {
    series
        .bands
        .iter()
        .filter_map(|b| match error_bar_span(&b.summary, whisker) {
            Some((low, high)) => Some((b.x, low, b.summary.mean, high)),
            None => {
                log::debug!(
                    "{} gt_corners={}: no spread, skipping {whisker:?} error bar",
                    series.column,
                    b.summary.key
                );
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Overall-trend dual chart
// ---------------------------------------------------------------------------

/// Side-by-side panels sharing a y range: mean bands with ± std on the left,
/// mean bands with the min/max range on the right.
pub fn render(
    table: &Table,
    family: StatisticFamily,
    out_dir: &Path,
) -> Result<ChartArtifact, ReportError> {
    let series = build_series(table, family)?;

    let bands = || series.iter().flat_map(|s| s.bands.iter());
    let x_range = axis_range(bands().flat_map(|b| {
        [b.x - COLUMN_SPACING, b.x + COLUMN_SPACING]
    }))?;
    let y_range = axis_range(bands().flat_map(|b| {
        let s = &b.summary;
        [
            s.mean - BAND_HALF_HEIGHT,
            s.mean + BAND_HALF_HEIGHT,
            s.mean - s.std,
            s.mean + s.std,
            s.min,
            s.max,
        ]
    }))?;

    let mut canvas = Canvas::new(1200, 500)?;
    canvas.draw(|root| {
        let halves = root.split_evenly((1, 2));
        draw_panel(
            &halves[0],
            &series,
            Whisker::Std,
            &format!("{} - Standard Deviation", family.title()),
            Some(family.y_label()),
            (x_range.clone(), y_range.clone()),
        )?;
        draw_panel(
            &halves[1],
            &series,
            Whisker::Range,
            &format!("{} - Deviation Range", family.title()),
            None,
            (x_range.clone(), y_range.clone()),
        )?;
        Ok(())
    })?;

    canvas.save(&out_dir.join(file_name(family)))
}

fn draw_panel(
    area: &Area<'_>,
    series: &[Series],
    whisker: Whisker,
    title: &str,
    y_label: Option<&str>,
    (x_range, y_range): (Range<f64>, Range<f64>),
) -> Result<(), ReportError> {
    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .caption(title, ("sans-serif", 18))
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc("Number of Ground Truth Corners");
        if let Some(label) = y_label {
            mesh.y_desc(label);
        }
        mesh.draw()?;
    }

    let half_width = COLUMN_SPACING / 2.0;
    for s in series {
        let color = s.color;
        chart
            .draw_series(s.bands.iter().map(|b| {
                Rectangle::new(
                    [
                        (b.x - half_width, b.summary.mean - BAND_HALF_HEIGHT),
                        (b.x + half_width, b.summary.mean + BAND_HALF_HEIGHT),
                    ],
                    color.mix(0.7).filled(),
                )
            }))?
            .label(format!("{} (Mean)", s.column))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.mix(0.7).filled()));

        let bars = error_bars(s, whisker).into_iter().map(|(x, low, mean, high)| {
            ErrorBar::new_vertical(x, low, mean, high, BLACK.stroke_width(1), CAP_WIDTH)
        });
        chart.draw_series(bars)?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::three_room_table;
    use crate::data::model::GroupKey;

    fn summary(mean: f64, min: f64, max: f64, std: f64) -> GroupSummary {
        GroupSummary {
            key: GroupKey(4.0),
            mean,
            min,
            max,
            std,
        }
    }

    #[test]
    fn std_whisker_is_symmetric() {
        let s = summary(12.0, 10.0, 14.0, 2.0);
        assert_eq!(error_bar_span(&s, Whisker::Std), Some((10.0, 14.0)));
    }

    #[test]
    fn range_whisker_spans_min_to_max() {
        let s = summary(11.0, 10.0, 14.0, 2.0);
        assert_eq!(error_bar_span(&s, Whisker::Range), Some((10.0, 14.0)));
    }

    #[test]
    fn zero_spread_suppresses_both_bars() {
        let s = summary(5.0, 5.0, 5.0, 0.0);
        assert_eq!(error_bar_span(&s, Whisker::Std), None);
        assert_eq!(error_bar_span(&s, Whisker::Range), None);
    }

    #[test]
    fn single_row_group_gets_no_error_bar() {
        let series = build_series(&three_room_table(), StatisticFamily::Floor).unwrap();
        assert_eq!(series.len(), 3);

        for (j, s) in series.iter().enumerate() {
            let x4 = 4.0 + column_offset(j, 3, COLUMN_SPACING);
            for whisker in [Whisker::Std, Whisker::Range] {
                let bars = error_bars(s, whisker);
                assert_eq!(bars.len(), 1, "{} {whisker:?}", s.column);
                let (x, low, mean, high) = bars[0];
                assert!((x - x4).abs() < 1e-12);
                assert!(low < mean && mean < high);
                assert!(bars.iter().all(|b| (b.0 - 5.0).abs() > 0.5));
            }
        }

        // Group 4 floor_max is [10, 14]: mean 12, std 2√2, range 10..14.
        let max = &series[0];
        assert_eq!(max.column, "floor_max");
        let (_, low, _, high) = error_bars(max, Whisker::Range)[0];
        assert_eq!((low, high), (10.0, 14.0));
        let (_, low, _, high) = error_bars(max, Whisker::Std)[0];
        let std = 8f64.sqrt();
        assert!((low - (12.0 - std)).abs() < 1e-9);
        assert!((high - (12.0 + std)).abs() < 1e-9);
    }

    #[test]
    fn writes_trend_png_with_single_row_group() {
        let dir = std::env::temp_dir().join(format!("corner_report_trend_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // Group 5 has one row, so its error bars are suppressed.
        let artifact = render(&three_room_table(), StatisticFamily::Floor, &dir).unwrap();
        assert_eq!(artifact.path, dir.join("floor_deviation_overall_trend.png"));
        assert_eq!((artifact.width, artifact.height), (1200, 500));
        assert!(artifact.path.is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
