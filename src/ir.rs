use crate::graph::{LineStyle, PointStyle};

// =============================================================================
// Chart scene: what to draw, already in plot coordinates
// =============================================================================

/// A compiled chart. The drawing backend executes these blindly; all data
/// decisions (selection, aggregation, coloring, labels) are made before.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartScene {
    Line(LineScene),
    Bars(BarScene),
    Pie(PieScene),
    Scatter(ScatterScene),
    /// Nothing to plot; show this message instead
    Placeholder(String),
}

impl ChartScene {
    pub fn placeholder_text(&self) -> Option<&str> {
        match self {
            ChartScene::Placeholder(text) => Some(text),
            _ => None,
        }
    }
}

/// Axis captions shared by the cartesian charts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// One series over a categorical x axis (one slot per row)
#[derive(Debug, Clone, PartialEq)]
pub struct LineScene {
    pub labels: AxisLabels,
    pub categories: Vec<String>,
    // x is the category index; slots whose y was unreadable are absent
    pub points: Vec<(f64, f64)>,
    pub series_name: String,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarScene {
    pub labels: AxisLabels,
    pub series_name: String,
    pub bars: Vec<BarItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieScene {
    pub title: String,
    pub wedges: Vec<Wedge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub category: String,
    pub value: f64,
    /// Share of the total, 0..=1
    pub fraction: f64,
    /// "{category} {percent}%"
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterScene {
    pub labels: AxisLabels,
    pub series_name: String,
    pub points: Vec<(f64, f64)>,
    pub style: PointStyle,
}
