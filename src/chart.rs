// Chart specifications as recommended by the analysis service

use crate::data::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `y` binding that means "count rows per category" rather than a column.
pub const COUNT_COLUMN: &str = "count";

/// Visual encoding requested for a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    /// Drawn as bars over pre-binned data
    Histogram,
    Pie,
    Scatter,
    Heatmap,
    /// Anything else the service sends; kept verbatim for the placeholder
    Unsupported(String),
}

impl ChartKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Unsupported(name) => name,
        }
    }
}

impl From<&str> for ChartKind {
    fn from(value: &str) -> Self {
        match value {
            "line" => ChartKind::Line,
            "bar" => ChartKind::Bar,
            "histogram" => ChartKind::Histogram,
            "pie" => ChartKind::Pie,
            "scatter" => ChartKind::Scatter,
            "heatmap" => ChartKind::Heatmap,
            other => ChartKind::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ChartKind::from(raw.as_str()))
    }
}

impl Serialize for ChartKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One chart to draw: encoding, column bindings and optional pre-aggregated data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Point>>,
    /// Heatmap column set; carried through, not drawn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, x: &str, y: &str, title: &str) -> Self {
        Self {
            kind,
            x: x.to_string(),
            y: y.to_string(),
            title: title.to_string(),
            data: None,
            columns: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Vec<Point>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn counts_rows(&self) -> bool {
        self.y == COUNT_COLUMN
    }
}
