//! Dashboard view: one update recomputes every output from the inputs.

use crate::charts::{render_svg, ChartKind, ChartSpec};
use crate::dashboard::store::StoredView;
use crate::dashboard::upload::parse_upload;
use crate::dashboard::DashboardError;
use crate::data::dates::parse_date;
use crate::data::{Cell, DataProcessor, RowPredicate, Table};
use crate::stats::SummaryStats;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

pub const CHART_WIDTH: u32 = 900;
pub const CHART_HEIGHT: u32 = 420;

const UPLOAD_PROMPT: &str = "Upload a CSV with columns: date, region, sales.";

/// Everything the page sends on a change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardInputs {
    /// Data URL of the uploaded file.
    pub contents: Option<String>,
    pub filename: Option<String>,
    pub region: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Unknown or null values read as absent and draw bars.
    #[serde(deserialize_with = "lenient_chart_kind")]
    pub chart_type: Option<ChartKind>,
}

impl DashboardInputs {
    pub fn chart_kind(&self) -> ChartKind {
        self.chart_type.unwrap_or_default()
    }
}

fn lenient_chart_kind<'de, D>(deserializer: D) -> Result<Option<ChartKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| match serde_json::from_value(raw.clone()) {
        Ok(kind) => Some(kind),
        Err(_) => {
            warn!("Unknown chart type {}, drawing bars", raw);
            None
        }
    }))
}

/// Everything the page shows after a change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardOutputs {
    /// Filtered view as JSON, sent back on download.
    pub store: Option<String>,
    pub region_options: Vec<String>,
    pub region: Option<String>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub chart: Option<ChartSpec>,
    pub chart_svg: Option<String>,
    pub summary: Vec<String>,
    pub status: String,
}

impl DashboardOutputs {
    fn status_only(status: String) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Recompute the dashboard. Errors are reported in `status`, never raised.
pub fn update_dashboard(inputs: &DashboardInputs) -> DashboardOutputs {
    let Some(contents) = inputs.contents.as_deref().filter(|c| !c.trim().is_empty()) else {
        return DashboardOutputs::status_only(UPLOAD_PROMPT.to_string());
    };

    match build_outputs(contents, inputs) {
        Ok(outputs) => outputs,
        Err(e) => {
            warn!("Dashboard update failed: {}", e);
            DashboardOutputs::status_only(format!("Error: {}", e))
        }
    }
}

fn build_outputs(
    contents: &str,
    inputs: &DashboardInputs,
) -> Result<DashboardOutputs, DashboardError> {
    let table = parse_upload(contents)?;

    let regions = region_options(&table);
    let region = match &inputs.region {
        Some(r) if regions.contains(r) => Some(r.clone()),
        _ => regions.first().cloned(),
    };

    let dates = table.column("date").map(|c| {
        c.cells()
            .iter()
            .filter_map(Cell::as_date)
            .collect::<Vec<_>>()
    });
    let min_date = dates.as_ref().and_then(|d| d.iter().min().copied());
    let max_date = dates.as_ref().and_then(|d| d.iter().max().copied());

    let filtered = filter_view(&table, region.as_deref(), inputs)?;

    let (chart, summary) = if filtered.is_empty() {
        (
            ChartSpec::new(inputs.chart_kind(), "No data for selected filters", Vec::new()),
            vec!["No data found for current filter selection.".to_string()],
        )
    } else {
        let (aggregate, _) = DataProcessor::aggregate_sum(&filtered, "date", "sales")?;
        let kind = match inputs.chart_kind() {
            ChartKind::Line => ChartKind::Line,
            ChartKind::Bar | ChartKind::Pie => ChartKind::Bar,
        };
        let title = format!(
            "Sales for {} (aggregated by date)",
            region.as_deref().unwrap_or("all regions")
        );
        (
            ChartSpec::from_aggregate(&aggregate, kind, title),
            summary_lines(&filtered),
        )
    };

    let chart_svg = if chart.is_empty() {
        None
    } else {
        render_svg(&chart, CHART_WIDTH, CHART_HEIGHT)
            .inspect_err(|e| warn!("Chart not rendered: {}", e))
            .ok()
    };

    let filename = inputs.filename.as_deref().unwrap_or("upload");
    let status = format!(
        "Loaded '{}'. Regions found: {}. Showing region: {}.",
        filename,
        regions.len(),
        region.as_deref().unwrap_or("none")
    );
    info!("{}", status);

    Ok(DashboardOutputs {
        store: Some(StoredView::from_table(&filtered).to_json()?),
        region_options: regions,
        region,
        min_date: min_date.map(|d| d.format("%Y-%m-%d").to_string()),
        max_date: max_date.map(|d| d.format("%Y-%m-%d").to_string()),
        chart: Some(chart),
        chart_svg,
        summary,
        status,
    })
}

/// Distinct regions, sorted.
fn region_options(table: &Table) -> Vec<String> {
    let mut regions: Vec<String> = table
        .column("region")
        .map(|c| {
            c.cells()
                .iter()
                .filter(|cell| !cell.is_missing())
                .map(|cell| cell.to_string())
                .collect()
        })
        .unwrap_or_default();
    regions.sort();
    regions.dedup();
    regions
}

/// Region equality plus an inclusive date range; unparsable bounds are ignored.
fn filter_view(
    table: &Table,
    region: Option<&str>,
    inputs: &DashboardInputs,
) -> Result<Table, DashboardError> {
    let bound = |raw: &Option<String>| {
        let raw = raw.as_deref()?;
        let parsed = parse_date(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            warn!("Ignoring unparsable date filter '{}'", raw);
        }
        parsed
    };

    let mut predicate =
        RowPredicate::date_between("date", bound(&inputs.start_date), bound(&inputs.end_date));
    if let Some(region) = region {
        let in_region = RowPredicate::column_equals("region", Cell::Text(region.to_string()));
        predicate = in_region.and(predicate);
    }
    let (filtered, report) = DataProcessor::filter_rows(table, &predicate)?;
    info!("{}", report);
    Ok(filtered)
}

fn summary_lines(filtered: &Table) -> Vec<String> {
    let stats = SummaryStats::for_table_column(filtered, "sales").unwrap_or_default();
    let average = stats
        .mean
        .map(|m| format!("{:.2}", m))
        .unwrap_or_else(|| "n/a".to_string());
    vec![
        format!("Rows: {}", filtered.height()),
        format!("Total Sales: {:.2}", stats.sum),
        format!("Average per row: {}", average),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as B64;
    use base64::Engine;

    const SALES: &str = "date,region,sales\n\
        2024-01-01,North,10\n\
        2024-01-01,North,5\n\
        2024-01-02,South,7\n\
        2024-01-03,North,x\n\
        2024-01-04,North,20\n";

    fn inputs(csv: &str) -> DashboardInputs {
        DashboardInputs {
            contents: Some(format!("data:text/csv;base64,{}", B64.encode(csv))),
            filename: Some("sales.csv".to_string()),
            ..DashboardInputs::default()
        }
    }

    #[test]
    fn test_no_upload() {
        let out = update_dashboard(&DashboardInputs::default());
        assert_eq!(out.status, UPLOAD_PROMPT);
        assert!(out.store.is_none());
        assert!(out.chart.is_none());
    }

    #[test]
    fn test_defaults_to_first_region() {
        let out = update_dashboard(&inputs(SALES));
        assert_eq!(out.region_options, vec!["North", "South"]);
        assert_eq!(out.region.as_deref(), Some("North"));
        assert_eq!(out.min_date.as_deref(), Some("2024-01-01"));
        assert_eq!(out.max_date.as_deref(), Some("2024-01-04"));
        assert_eq!(
            out.status,
            "Loaded 'sales.csv'. Regions found: 2. Showing region: North."
        );

        let chart = out.chart.unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(
            chart.points,
            vec![
                ("2024-01-01".to_string(), 15.0),
                ("2024-01-03".to_string(), 0.0),
                ("2024-01-04".to_string(), 20.0),
            ]
        );
        assert_eq!(
            out.summary,
            vec!["Rows: 4", "Total Sales: 35.00", "Average per row: 11.67"]
        );
    }

    #[test]
    fn test_region_and_date_filters() {
        let mut request = inputs(SALES);
        request.region = Some("North".to_string());
        request.start_date = Some("2024-01-02".to_string());
        request.end_date = Some("2024-01-04".to_string());
        request.chart_type = Some(ChartKind::Line);
        let out = update_dashboard(&request);
        assert_eq!(out.summary[0], "Rows: 2");
        assert_eq!(out.chart.unwrap().kind, ChartKind::Line);
    }

    #[test]
    fn test_unknown_region_falls_back_and_bad_dates_ignored() {
        let mut request = inputs(SALES);
        request.region = Some("West".to_string());
        request.start_date = Some("whenever".to_string());
        let out = update_dashboard(&request);
        assert_eq!(out.region.as_deref(), Some("North"));
        assert_eq!(out.summary[0], "Rows: 4");
    }

    #[test]
    fn test_empty_selection() {
        let mut request = inputs(SALES);
        request.start_date = Some("2025-01-01".to_string());
        let out = update_dashboard(&request);
        let chart = out.chart.unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.title, "No data for selected filters");
        assert!(out.chart_svg.is_none());
        assert_eq!(out.summary, vec!["No data found for current filter selection."]);
        assert!(out.store.is_some());
    }

    #[test]
    fn test_chart_type_is_lenient() {
        let read = |json: &str| serde_json::from_str::<DashboardInputs>(json).unwrap();
        assert_eq!(read("{}").chart_type, None);
        assert_eq!(read(r#"{"chart_type": null}"#).chart_type, None);
        assert_eq!(read(r#"{"chart_type": "scatter"}"#).chart_type, None);
        assert_eq!(read(r#"{"chart_type": 3}"#).chart_kind(), ChartKind::Bar);
        assert_eq!(read(r#"{"chart_type": "line"}"#).chart_kind(), ChartKind::Line);
    }

    #[test]
    fn test_missing_region_column() {
        let out = update_dashboard(&inputs("date,sales\n2024-01-01,5\n"));
        assert_eq!(out.status, "Error: CSV missing required columns: region");
        assert!(out.chart.is_none());
        assert!(out.chart_svg.is_none());
        assert!(out.region_options.is_empty());
    }

    #[cfg(feature = "charts")]
    #[test]
    fn test_chart_rendered_as_svg() {
        let out = update_dashboard(&inputs(SALES));
        assert!(out.chart_svg.unwrap().contains("<svg"));
    }
}
