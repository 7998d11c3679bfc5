//! Chart Spec Module
//! Renderer-independent description of a single-series chart.

use crate::data::Table;
use crate::expenses::ExpenseRecord;
use serde::{Deserialize, Serialize};

/// Chart shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    #[default]
    Bar,
    Line,
}

/// Labelled values ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<(String, f64)>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>, points: Vec<(String, f64)>) -> Self {
        Self {
            kind,
            title: title.into(),
            points,
        }
    }

    /// Build from an `aggregate_sum` result: first column labels, second column values.
    pub fn from_aggregate(aggregate: &Table, kind: ChartKind, title: impl Into<String>) -> Self {
        let points = match aggregate.columns() {
            [labels, values, ..] => labels
                .cells()
                .iter()
                .zip(values.cells())
                .filter_map(|(label, value)| Some((label.to_string(), value.coerce_number()?)))
                .collect(),
            _ => Vec::new(),
        };
        Self::new(kind, title, points)
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

/// Pie chart of expense amounts per category, in first-seen category order.
///
/// Records whose amount does not parse as a number are skipped.
pub fn category_totals(records: &[ExpenseRecord]) -> ChartSpec {
    let mut points: Vec<(String, f64)> = Vec::new();
    for record in records {
        let Some(amount) = record.amount_value() else {
            continue;
        };
        match points.iter_mut().find(|(c, _)| *c == record.category) {
            Some((_, total)) => *total += amount,
            None => points.push((record.category.clone(), amount)),
        }
    }
    ChartSpec::new(ChartKind::Pie, "Expense share by category", points)
}
