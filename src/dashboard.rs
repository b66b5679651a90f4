//! Dashboard view model
//!
//! [`compose`] turns an [`AnalysisResult`] into the sections shown to the
//! user. Every optional section is derived on its own from the matching part
//! of the result and is `None` when that part is absent or empty.

use crate::analysis::{AnalysisResult, CleaningReport, Conclusion, DatasetSummary};
use crate::render::{render_chart, RenderedChart};
use crate::RenderOptions;
use serde_json::{Map, Value};

pub const MAX_SUM_METRICS: usize = 3;
const SUM_SUFFIX: &str = "_sum";

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleaningSection {
    pub stats: Vec<Metric>,
    pub warnings: Vec<(String, String)>,
    pub details: Vec<CleaningDetail>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleaningDetail {
    pub column: String,
    pub column_type: String,
    /// "12.5% missing"
    pub missing: String,
    pub action: String,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSection {
    pub overview: Vec<Metric>,
    pub columns: Vec<ColumnCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCard {
    pub name: String,
    pub kind: String,
    pub stats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub title: String,
    pub chart: RenderedChart,
    pub interpretation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConclusionSection {
    pub title: String,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub data_characteristics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub metrics: Vec<Metric>,
    pub cleaning: Option<CleaningSection>,
    pub dataset: Option<DatasetSection>,
    pub insights: Option<Vec<String>>,
    pub charts: Option<Vec<ChartPanel>>,
    pub conclusion: Option<ConclusionSection>,
    /// Where the export action points; opening it is left to the caller
    pub export_url: String,
}

/// Build the dashboard for one analysis result.
///
/// Charts are rendered against `result.data` with `options`; one that cannot
/// be drawn shows its placeholder text instead.
pub fn compose(result: &AnalysisResult, options: &RenderOptions, export_url: &str) -> Dashboard {
    let charts = (!result.recommended_charts.is_empty()).then(|| {
        result
            .recommended_charts
            .iter()
            .map(|spec| ChartPanel {
                title: spec.title.clone(),
                chart: render_chart(spec, &result.data, options),
                interpretation: result.interpretation_for(&spec.title).map(str::to_string),
            })
            .collect()
    });

    let dashboard = Dashboard {
        metrics: key_metrics(&result.summary),
        cleaning: result.cleaning_report.as_ref().and_then(cleaning_section),
        dataset: result.dataset_summary.as_ref().and_then(dataset_section),
        insights: (!result.insights.is_empty()).then(|| result.insights.clone()),
        charts,
        conclusion: result.conclusion.as_ref().map(conclusion_section),
        export_url: export_url.to_string(),
    };

    tracing::debug!(
        metrics = dashboard.metrics.len(),
        charts = dashboard.charts.as_ref().map_or(0, Vec::len),
        "dashboard composed"
    );
    dashboard
}

/// "Total Rows" when the summary carries a non-zero row count, then up to
/// three `*_sum` entries in summary order
pub fn key_metrics(summary: &Map<String, Value>) -> Vec<Metric> {
    let mut metrics = Vec::new();

    if let Some(rows) = summary.get("total_rows").and_then(Value::as_f64) {
        if rows != 0.0 {
            metrics.push(Metric::new("Total Rows", format_grouped(rows)));
        }
    }

    for (key, value) in summary
        .iter()
        .filter(|(key, _)| key.ends_with(SUM_SUFFIX))
        .take(MAX_SUM_METRICS)
    {
        let field = &key[..key.len() - SUM_SUFFIX.len()];
        metrics.push(Metric::new(format!("Total {}", field), metric_value(value)));
    }

    metrics
}

fn metric_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map(format_grouped).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// en-US grouping with at most three fraction digits: `1,234,567.5`
pub fn format_grouped(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn cleaning_section(report: &CleaningReport) -> Option<CleaningSection> {
    let summary = report.summary.as_ref()?;

    let mut stats = vec![
        Metric::new("Original Columns", summary.original_columns.to_string()),
        Metric::new("Cleaned Columns", summary.cleaned_columns.to_string()),
        Metric::new("Columns Imputed", summary.columns_imputed.to_string()),
    ];
    if summary.columns_dropped > 0 {
        stats.push(Metric::new("Columns Dropped", summary.columns_dropped.to_string()));
    }

    let warnings = report
        .warnings
        .iter()
        .map(|w| (w.column.clone(), w.message.clone()))
        .collect();

    let details = report
        .actions()
        .into_iter()
        .map(|(column, action)| CleaningDetail {
            column,
            column_type: action.column_type,
            missing: format!("{:.1}% missing", action.missing_percent),
            action: action.action,
            strategy: action.strategy,
        })
        .collect();

    Some(CleaningSection { stats, warnings, details })
}

fn dataset_section(summary: &DatasetSummary) -> Option<DatasetSection> {
    let overview = summary.overview.as_ref()?;

    let columns = summary
        .column_details
        .iter()
        .map(|col| {
            let mut stats = vec![format!("Unique: {}", col.unique_values)];
            if col.kind == "numeric" {
                if let (Some(min), Some(max)) = (col.min, col.max) {
                    stats.push(format!("Range: {:.2} - {:.2}", min, max));
                }
                if let Some(mean) = col.mean {
                    stats.push(format!("Mean: {:.2}", mean));
                }
            }
            ColumnCard { name: col.name.clone(), kind: col.kind.clone(), stats }
        })
        .collect();

    Some(DatasetSection {
        overview: vec![
            Metric::new("Total Records", overview.total_rows.to_string()),
            Metric::new("Total Columns", overview.total_columns.to_string()),
            Metric::new("Numeric Columns", overview.numeric_columns.to_string()),
            Metric::new("Categorical Columns", overview.categorical_columns.to_string()),
        ],
        columns,
    })
}

fn conclusion_section(conclusion: &Conclusion) -> ConclusionSection {
    let title = conclusion
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Conclusion");

    ConclusionSection {
        title: title.to_string(),
        summary: conclusion.summary.clone(),
        key_findings: conclusion.key_findings.clone(),
        data_characteristics: conclusion.data_characteristics.clone(),
    }
}

/// Holds the result currently on screen. Replaced whole, never patched.
#[derive(Debug, Default)]
pub struct DashboardState {
    result: Option<AnalysisResult>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, result: AnalysisResult) {
        self.result = Some(result);
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// "Upload New File": drop everything
    pub fn reset(&mut self) {
        self.result = None;
    }

    pub fn dashboard(&self, options: &RenderOptions, export_url: &str) -> Option<Dashboard> {
        self.current().map(|result| compose(result, options, export_url))
    }
}
