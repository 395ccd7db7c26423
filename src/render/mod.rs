/// Chart rendering: every chart paints into its own [`canvas::Canvas`] and
/// is written once as a PNG.
///
/// ```text
///   Table ──► deviation ──► deviation_corners.png
///     │
///     ├──► grouped (per family) ──► <prefix>_grouped.png
///     └──► trend   (per family) ──► <prefix>_overall_trend.png
/// ```

pub mod canvas;
pub mod deviation;
pub mod glyphs;
pub mod grouped;
pub mod trend;

use std::ops::Range;

use crate::error::ReportError;

/// Horizontal spacing between statistic columns sharing an x position.
pub const COLUMN_SPACING: f64 = 0.3;

/// Offset of column `index` out of `count`, centred so the set is symmetric
/// around the nominal x position.
pub fn column_offset(index: usize, count: usize, spacing: f64) -> f64 {
    index as f64 * spacing - spacing * (count as f64 - 1.0) / 2.0
}

/// Axis range covering `values` with a 5% margin; a single value gets ±1.
pub fn axis_range<I>(values: I) -> Result<Range<f64>, ReportError>
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_finite() {
            return Err(ReportError::render(format!("non-finite coordinate {v}")));
        }
        min = min.min(v);
        max = max.max(v);
    }
    if min > max {
        return Err(ReportError::render("no data to place on axis"));
    }

    let span = max - min;
    if span == 0.0 {
        Ok(min - 1.0..max + 1.0)
    } else {
        let pad = span * 0.05;
        Ok(min - pad..max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_columns_centre_on_the_middle_one() {
        let offsets: Vec<f64> = (0..3).map(|j| column_offset(j, 3, COLUMN_SPACING)).collect();
        assert!((offsets[0] + 0.3).abs() < 1e-12);
        assert_eq!(offsets[1], 0.0);
        assert!((offsets[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn single_column_has_no_offset() {
        assert_eq!(column_offset(0, 1, COLUMN_SPACING), 0.0);
    }

    #[test]
    fn axis_range_pads_and_widens_points() {
        let r = axis_range([0.0, 10.0]).unwrap();
        assert_eq!((r.start, r.end), (-0.5, 10.5));

        let r = axis_range([3.0]).unwrap();
        assert_eq!((r.start, r.end), (2.0, 4.0));
    }

    #[test]
    fn axis_range_rejects_empty_and_nan() {
        assert!(matches!(
            axis_range(Vec::<f64>::new()),
            Err(ReportError::Render(_))
        ));
        assert!(matches!(
            axis_range([1.0, f64::NAN]),
            Err(ReportError::Render(_))
        ));
    }
}
