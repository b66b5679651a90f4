// Analysis result as returned by the analysis service's upload endpoint

use crate::chart::ChartSpec;
use crate::data::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything the service computed for one uploaded file.
///
/// All fields are optional on the wire; absent sections deserialize to their
/// empty form and the dashboard simply leaves them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: Map<String, Value>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommended_charts: Vec<ChartSpec>,
    #[serde(default)]
    pub columns: ColumnGroups,
    #[serde(default)]
    pub cleaning_report: Option<CleaningReport>,
    #[serde(default)]
    pub dataset_summary: Option<DatasetSummary>,
    #[serde(default)]
    pub chart_interpretations: Vec<ChartInterpretation>,
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub data: Vec<Row>,
    /// Set instead of the analysis when the service failed to process the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// First interpretation whose title matches exactly
    pub fn interpretation_for(&self, chart_title: &str) -> Option<&str> {
        self.chart_interpretations
            .iter()
            .find(|ci| ci.chart_title == chart_title)
            .map(|ci| ci.interpretation.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroups {
    #[serde(default)]
    pub numeric: Vec<String>,
    #[serde(default)]
    pub categorical: Vec<String>,
    #[serde(default)]
    pub datetime: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    #[serde(default)]
    pub summary: Option<CleaningSummary>,
    #[serde(default)]
    pub warnings: Vec<CleaningWarning>,
    /// Per-column actions keyed by column name, in the order the service sent them
    #[serde(default, rename = "cleaning_report")]
    pub column_actions: Map<String, Value>,
    #[serde(default)]
    pub excluded_columns: Vec<String>,
}

impl CleaningReport {
    /// Per-column actions that decode cleanly; malformed entries are skipped
    pub fn actions(&self) -> Vec<(String, ColumnAction)> {
        self.column_actions
            .iter()
            .filter_map(|(col, raw)| {
                match serde_json::from_value::<ColumnAction>(raw.clone()) {
                    Ok(action) => Some((col.clone(), action)),
                    Err(e) => {
                        tracing::debug!("Skipping cleaning entry for '{}': {}", col, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    #[serde(default)]
    pub original_columns: u64,
    #[serde(default)]
    pub cleaned_columns: u64,
    #[serde(default)]
    pub columns_imputed: u64,
    #[serde(default)]
    pub columns_dropped: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningWarning {
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnAction {
    #[serde(default)]
    pub column_type: String,
    #[serde(default)]
    pub missing_percent: f64,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    #[serde(default)]
    pub overview: Option<DatasetOverview>,
    #[serde(default)]
    pub column_details: Vec<ColumnDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub total_columns: u64,
    #[serde(default)]
    pub numeric_columns: u64,
    #[serde(default)]
    pub categorical_columns: u64,
    #[serde(default)]
    pub datetime_columns: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub unique_values: u64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartInterpretation {
    #[serde(default)]
    pub chart_title: String,
    #[serde(default)]
    pub interpretation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub data_characteristics: Vec<String>,
}
