use std::collections::BTreeMap;
use std::fmt;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Ground-truth corner count; also the grouping key.
pub const GT_CORNERS: &str = "gt_corners";
/// Model-predicted corner count.
pub const RB_CORNERS: &str = "rb_corners";

/// Every column a measurement table must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    GT_CORNERS,
    RB_CORNERS,
    "ceiling_max",
    "ceiling_mean",
    "ceiling_min",
    "floor_max",
    "floor_mean",
    "floor_min",
];

// ---------------------------------------------------------------------------
// StatisticFamily – which deviation columns a chart pair covers
// ---------------------------------------------------------------------------

/// A set of per-room deviation statistics rendered together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticFamily {
    Ceiling,
    Floor,
}

impl StatisticFamily {
    pub const ALL: [StatisticFamily; 2] = [StatisticFamily::Ceiling, StatisticFamily::Floor];

    /// Statistic columns in panel order: max, mean, min.
    pub fn columns(self) -> [&'static str; 3] {
        match self {
            StatisticFamily::Ceiling => ["ceiling_max", "ceiling_mean", "ceiling_min"],
            StatisticFamily::Floor => ["floor_max", "floor_mean", "floor_min"],
        }
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            StatisticFamily::Ceiling => "ceiling_deviation",
            StatisticFamily::Floor => "floor_deviation",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StatisticFamily::Ceiling => "Ceiling Deviation Statistics",
            StatisticFamily::Floor => "Floor Deviation Statistics",
        }
    }

    pub fn y_label(self) -> &'static str {
        "Deviation (degrees)"
    }
}

// ---------------------------------------------------------------------------
// GroupKey – a distinct value of the grouping column
// ---------------------------------------------------------------------------

/// Grouping key compared by exact bit pattern, so `4.0` and `4.0` group
/// together while `-0.0` and `0.0` stay apart.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey(pub f64);

impl GroupKey {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for GroupKey {}

impl std::hash::Hash for GroupKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Large magnitudes would saturate the i64 cast.
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one room measurement
// ---------------------------------------------------------------------------

/// A single row of the source table: column name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Row {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Ordered rows sharing one column set.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    /// Sorted column names shared by every row.
    column_names: Vec<String>,
}

impl Table {
    /// Build a table, rejecting rows whose column set differs from the first.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, ReportError> {
        let column_names: Vec<String> = rows
            .first()
            .map(|r| r.values.keys().cloned().collect())
            .unwrap_or_default();

        for (i, row) in rows.iter().enumerate().skip(1) {
            if !row.values.keys().eq(column_names.iter()) {
                return Err(ReportError::parse(format!(
                    "row {i} has columns {:?}, expected {:?}",
                    row.values.keys().collect::<Vec<_>>(),
                    column_names
                )));
            }
        }

        Ok(Table { rows, column_names })
    }

    /// Fail unless every named column is present.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), ReportError> {
        for col in columns {
            if !self.has_column(col) {
                return Err(ReportError::missing_column(col));
            }
        }
        Ok(())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: &str) -> Result<Vec<f64>, ReportError> {
        if !self.has_column(column) {
            return Err(ReportError::missing_column(column));
        }
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.get(column).ok_or_else(|| ReportError::MissingValue {
                    row: i,
                    column: column.to_string(),
                })
            })
            .collect()
    }

    /// Value of `column` at row `index`.
    pub fn value(&self, index: usize, column: &str) -> Result<f64, ReportError> {
        let row = self
            .rows
            .get(index)
            .ok_or_else(|| ReportError::render(format!("row {index} out of range")))?;
        row.get(column).ok_or_else(|| {
            if self.has_column(column) {
                ReportError::MissingValue {
                    row: index,
                    column: column.to_string(),
                }
            } else {
                ReportError::missing_column(column)
            }
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, f64)]) -> Row {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn rows_must_share_a_column_set() {
        let rows = vec![
            row(&[("gt_corners", 4.0), ("rb_corners", 4.0)]),
            row(&[("gt_corners", 4.0)]),
        ];
        match Table::from_rows(rows) {
            Err(ReportError::Parse(msg)) => assert!(msg.contains("row 1")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn column_extracts_in_row_order() {
        let table = Table::from_rows(vec![
            row(&[("gt_corners", 4.0), ("rb_corners", 5.0)]),
            row(&[("gt_corners", 6.0), ("rb_corners", 6.0)]),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column("gt_corners").unwrap(), vec![4.0, 6.0]);
        assert!(matches!(
            table.column("floor_min"),
            Err(ReportError::MissingColumn { .. })
        ));
        assert!(table.require_columns(&["gt_corners", "rb_corners"]).is_ok());
    }

    #[test]
    fn group_key_display_drops_integral_fraction() {
        assert_eq!(GroupKey(4.0).to_string(), "4");
        assert_eq!(GroupKey(4.5).to_string(), "4.5");
        assert_ne!(GroupKey(0.0), GroupKey(-0.0));
        assert_eq!(GroupKey(1e300).to_string(), format!("{}", 1e300_f64));
        assert_eq!(GroupKey(-3.0).to_string(), "-3");
    }

    #[test]
    fn families_list_max_mean_min() {
        assert_eq!(
            StatisticFamily::Floor.columns(),
            ["floor_max", "floor_mean", "floor_min"]
        );
        for family in StatisticFamily::ALL {
            for col in family.columns() {
                assert!(REQUIRED_COLUMNS.contains(&col));
            }
        }
    }
}
