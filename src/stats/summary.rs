//! Summary Statistics Module
//! Descriptive statistics over the numeric cells of a column.

use crate::data::{Column, Table};
use statrs::statistics::{Data, Distribution, Max, Median, Min};

/// Descriptive statistics; `None` wherever the value is undefined.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryStats {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation (n - 1), needs two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStats {
    /// Compute statistics for an array of values. Non-finite values are ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let count = finite.len();
        if count == 0 {
            return Self::default();
        }

        let sum = finite.iter().sum::<f64>();
        let data = Data::new(finite);
        let defined = |v: f64| v.is_finite().then_some(v);

        Self {
            count,
            sum,
            mean: data.mean().and_then(defined),
            median: defined(data.median()),
            std: if count > 1 {
                data.std_dev().and_then(defined)
            } else {
                None
            },
            min: defined(data.min()),
            max: defined(data.max()),
        }
    }

    /// Statistics over the cells of a column that read as numbers.
    pub fn from_column(column: &Column) -> Self {
        let values: Vec<f64> = column
            .cells()
            .iter()
            .filter_map(|c| c.coerce_number())
            .collect();
        Self::from_values(&values)
    }

    /// Statistics for a named column, `None` when the column is absent.
    pub fn for_table_column(table: &Table, name: &str) -> Option<Self> {
        table.column(name).map(Self::from_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_basic_stats() {
        let stats = SummaryStats::from_values(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 10.0);
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.median, 2.5));
        assert!(close(stats.min, 1.0));
        assert!(close(stats.max, 4.0));
        // sample variance of 1..4 is 5/3
        assert!(close(stats.std, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_empty_and_single() {
        let empty = SummaryStats::from_values(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.sum, 0.0);

        let single = SummaryStats::from_values(&[7.0]);
        assert!(close(single.mean, 7.0));
        assert_eq!(single.std, None);
    }

    #[test]
    fn test_from_column_skips_missing() {
        let column = Column::new(
            "sales",
            vec![Cell::Number(10.0), Cell::Missing, Cell::Number(20.0)],
        );
        let stats = SummaryStats::from_column(&column);
        assert_eq!(stats.count, 2);
        assert!(close(stats.mean, 15.0));
    }
}
