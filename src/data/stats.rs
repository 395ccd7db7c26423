use std::collections::HashMap;

use super::model::{GroupKey, Table};
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Row-wise derivations
// ---------------------------------------------------------------------------

/// Row-wise `col_a - col_b`; one entry per row.
pub fn difference(table: &Table, col_a: &str, col_b: &str) -> Result<Vec<f64>, ReportError> {
    let a = table.column(col_a)?;
    let b = table.column(col_b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x - y).collect())
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Rows of a table sharing one key value.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    /// Indices into the source table, ascending.
    pub row_indices: Vec<usize>,
    table: &'a Table,
}

impl<'a> Group<'a> {
    pub fn is_empty(&self) -> bool {
        self.row_indices.is_empty()
    }

    /// Values of `column` for this group's rows.
    pub fn values(&self, column: &str) -> Result<Vec<f64>, ReportError> {
        self.row_indices
            .iter()
            .map(|&i| self.table.value(i, column))
            .collect()
    }

    pub fn aggregate(&self, column: &str, op: Aggregate) -> Result<f64, ReportError> {
        let values = self.values(column)?;
        if values.is_empty() {
            return Err(ReportError::render(format!(
                "group {} has no rows for '{column}'",
                self.key
            )));
        }
        aggregate(&values, op)
    }

    pub fn summarize(&self, column: &str) -> Result<GroupSummary, ReportError> {
        let stat = |op| self.aggregate(column, op);
        Ok(GroupSummary {
            key: self.key,
            mean: stat(Aggregate::Mean)?,
            min: stat(Aggregate::Min)?,
            max: stat(Aggregate::Max)?,
            std: stat(Aggregate::Std)?,
        })
    }
}

/// Partition `table` by the value of `key`, keeping keys in first-seen order.
pub fn group_by<'a>(table: &'a Table, key: &str) -> Result<Vec<Group<'a>>, ReportError> {
    let keys = table.column(key)?;

    let mut position: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for (row, value) in keys.into_iter().enumerate() {
        let k = GroupKey(value);
        let slot = *position.entry(k).or_insert_with(|| {
            groups.push(Group {
                key: k,
                row_indices: Vec::new(),
                table,
            });
            groups.len() - 1
        });
        groups[slot].row_indices.push(row);
    }

    Ok(groups)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Min,
    Max,
    /// Sample standard deviation (N − 1 denominator).
    Std,
}

/// Reduce `values` with `op`.  Empty input is an error.
pub fn aggregate(values: &[f64], op: Aggregate) -> Result<f64, ReportError> {
    if values.is_empty() {
        return Err(ReportError::render(format!("cannot take {op:?} of an empty group")));
    }
    let n = values.len() as f64;
    let result = match op {
        Aggregate::Mean => values.iter().sum::<f64>() / n,
        Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregate::Std => {
            // Exactly zero for one row or a constant column, so error bars can be skipped.
            if values.iter().all(|&v| v == values[0]) {
                0.0
            } else {
                let mean = values.iter().sum::<f64>() / n;
                let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (n - 1.0)).sqrt()
            }
        }
    };
    Ok(result)
}

/// Mean, range and dispersion of one column within one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl GroupSummary {
    /// Asymmetric whisker lengths `(mean - min, max - mean)`.
    pub fn whiskers(&self) -> (f64, f64) {
        (self.mean - self.min, self.max - self.mean)
    }

    /// Whether an error bar should be drawn for this group.
    pub fn has_spread(&self) -> bool {
        self.std != 0.0
    }
}
