use crate::chart::{ChartKind, ChartSpec};
use crate::data::{key_string, parse_float, parse_float_or_zero, Point, Row};
use crate::graph::{LineStyle, PointStyle};
use crate::ir::{AxisLabels, BarItem, BarScene, ChartScene, LineScene, PieScene, ScatterScene, Wedge};
use crate::palette::{palette_hex, ACCENT_HEX};
use crate::select::select_data;

pub const HEATMAP_PLACEHOLDER: &str = "Heatmap visualization coming soon";

pub fn unsupported_placeholder(kind: &str) -> String {
    format!("Unsupported chart type: {}", kind)
}

pub fn empty_placeholder(title: &str) -> String {
    format!("No data available for {}", title)
}

/// Turn a chart spec and the dataset rows into a drawable scene.
///
/// Pure and total: unknown chart types and charts with nothing to plot come
/// back as [`ChartScene::Placeholder`].
pub fn compile_chart(spec: &ChartSpec, rows: &[Row]) -> ChartScene {
    let scene = match &spec.kind {
        ChartKind::Heatmap => return ChartScene::Placeholder(HEATMAP_PLACEHOLDER.to_string()),
        ChartKind::Unsupported(name) => return ChartScene::Placeholder(unsupported_placeholder(name)),
        ChartKind::Line => compile_line(spec, &select_data(spec, rows)),
        ChartKind::Bar | ChartKind::Histogram => compile_bars(spec, &select_data(spec, rows)),
        ChartKind::Pie => compile_pie(spec, &select_data(spec, rows)),
        ChartKind::Scatter => compile_scatter(spec, &select_data(spec, rows)),
    };

    scene.unwrap_or_else(|| ChartScene::Placeholder(empty_placeholder(&spec.title)))
}

fn axis_labels(spec: &ChartSpec) -> AxisLabels {
    AxisLabels {
        title: spec.title.clone(),
        x_label: spec.x.clone(),
        y_label: spec.y.clone(),
    }
}

fn compile_line(spec: &ChartSpec, data: &[Point]) -> Option<ChartScene> {
    let categories: Vec<String> = data.iter().map(|p| key_string(p.get(&spec.x))).collect();
    let points: Vec<(f64, f64)> = data
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| {
            let y = parse_float(p.get(&spec.y));
            y.is_finite().then_some((idx as f64, y))
        })
        .collect();

    if points.is_empty() {
        return None;
    }

    Some(ChartScene::Line(LineScene {
        labels: axis_labels(spec),
        categories,
        points,
        series_name: spec.y.clone(),
        style: LineStyle {
            color: Some(ACCENT_HEX.to_string()),
            width: Some(2.0),
            alpha: None,
        },
    }))
}

fn compile_bars(spec: &ChartSpec, data: &[Point]) -> Option<ChartScene> {
    if data.is_empty() {
        return None;
    }

    let bars = data
        .iter()
        .enumerate()
        .map(|(idx, p)| BarItem {
            label: key_string(p.get(&spec.x)),
            value: parse_float_or_zero(p.get(&spec.y)),
            color: palette_hex(idx).to_string(),
        })
        .collect();

    let series_name = if spec.counts_rows() {
        "Count".to_string()
    } else {
        spec.y.clone()
    };

    Some(ChartScene::Bars(BarScene {
        labels: axis_labels(spec),
        series_name,
        bars,
    }))
}

fn compile_pie(spec: &ChartSpec, data: &[Point]) -> Option<ChartScene> {
    let values: Vec<(String, f64)> = data
        .iter()
        .map(|p| {
            let v = parse_float_or_zero(p.get(&spec.y));
            (key_string(p.get(&spec.x)), if v.is_finite() { v.max(0.0) } else { 0.0 })
        })
        .collect();

    let total: f64 = values.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return None;
    }

    let wedges = values
        .into_iter()
        .enumerate()
        .map(|(idx, (category, value))| {
            let fraction = value / total;
            Wedge {
                label: format!("{} {:.0}%", category, (fraction * 100.0).round()),
                category,
                value,
                fraction,
                color: palette_hex(idx).to_string(),
            }
        })
        .collect();

    Some(ChartScene::Pie(PieScene {
        title: spec.title.clone(),
        wedges,
    }))
}

fn compile_scatter(spec: &ChartSpec, data: &[Point]) -> Option<ChartScene> {
    let points: Vec<(f64, f64)> = data
        .iter()
        .filter_map(|p| {
            let x = parse_float(p.get(&spec.x));
            let y = parse_float(p.get(&spec.y));
            (x.is_finite() && y.is_finite()).then_some((x, y))
        })
        .collect();

    if points.is_empty() {
        return None;
    }

    Some(ChartScene::Scatter(ScatterScene {
        labels: axis_labels(spec),
        series_name: format!("{} vs {}", spec.x, spec.y),
        points,
        style: PointStyle {
            color: Some(ACCENT_HEX.to_string()),
            size: Some(3.0),
            alpha: None,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        crate::data::rows_from_json(&value).unwrap()
    }

    fn sales_rows() -> Vec<Row> {
        rows(json!([
            {"region": "A", "sales": "10", "units": 4},
            {"region": "B", "sales": "5", "units": 2},
            {"region": "A", "sales": "3", "units": 1}
        ]))
    }

    #[test]
    fn test_compile_bar_aggregates_and_colors() {
        let spec = ChartSpec::new(ChartKind::Bar, "region", "sales", "Sales by region");
        let ChartScene::Bars(bars) = compile_chart(&spec, &sales_rows()) else { panic!("expected bars") };
        assert_eq!(bars.series_name, "sales");
        assert_eq!(bars.bars.len(), 2);
        assert_eq!(bars.bars[0].label, "A");
        assert_eq!(bars.bars[0].value, 13.0);
        assert_eq!(bars.bars[0].color, "#8b5cf6");
        assert_eq!(bars.bars[1].value, 5.0);
        assert_eq!(bars.bars[1].color, "#ec4899");
    }

    #[test]
    fn test_compile_bar_palette_wraps() {
        let data: Vec<Row> = (0..10)
            .map(|i| rows(json!([{"k": format!("c{}", i), "count": 1}])).remove(0))
            .collect();
        let spec = ChartSpec::new(ChartKind::Bar, "k", "count", "many").with_data(data);
        let ChartScene::Bars(bars) = compile_chart(&spec, &[]) else { panic!("expected bars") };
        assert_eq!(bars.series_name, "Count");
        assert_eq!(bars.bars[8].color, bars.bars[0].color);
        assert_eq!(bars.bars[9].color, bars.bars[1].color);
    }

    #[test]
    fn test_compile_histogram_uses_supplied_bins() {
        let bins = rows(json!([{"bin": "0-5", "count": 3}, {"bin": "5-10", "count": 1}]));
        let spec = ChartSpec::new(ChartKind::Histogram, "bin", "count", "dist").with_data(bins);
        let ChartScene::Bars(bars) = compile_chart(&spec, &sales_rows()) else { panic!("expected bars") };
        assert_eq!(bars.bars.len(), 2);
        assert_eq!(bars.bars[0].label, "0-5");
        assert_eq!(bars.bars[0].value, 3.0);
    }

    #[test]
    fn test_compile_pie_labels_round_percent() {
        let data = rows(json!([
            {"kind": "a", "count": 1},
            {"kind": "b", "count": 2}
        ]));
        let spec = ChartSpec::new(ChartKind::Pie, "kind", "count", "share").with_data(data);
        let ChartScene::Pie(pie) = compile_chart(&spec, &[]) else { panic!("expected pie") };
        assert_eq!(pie.wedges.len(), 2);
        assert_eq!(pie.wedges[0].label, "a 33%");
        assert_eq!(pie.wedges[1].label, "b 67%");
        let total: f64 = pie.wedges.iter().map(|w| w.fraction).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(pie.wedges[1].color, "#ec4899");
    }

    #[test]
    fn test_compile_pie_all_zero_is_placeholder() {
        let data = rows(json!([{"kind": "a", "count": 0}]));
        let spec = ChartSpec::new(ChartKind::Pie, "kind", "count", "share").with_data(data);
        let scene = compile_chart(&spec, &[]);
        assert_eq!(scene.placeholder_text(), Some("No data available for share"));
    }

    #[test]
    fn test_compile_line_keeps_row_slots() {
        let data = rows(json!([
            {"date": "2024-01", "v": "1"},
            {"date": "2024-02", "v": "oops"},
            {"date": "2024-03", "v": 3}
        ]));
        let spec = ChartSpec::new(ChartKind::Line, "date", "v", "trend");
        let ChartScene::Line(line) = compile_chart(&spec, &data) else { panic!("expected line") };
        assert_eq!(line.categories, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(line.points, vec![(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(line.style.color.as_deref(), Some("#8b5cf6"));
    }

    #[test]
    fn test_compile_scatter_drops_non_numeric() {
        let data = rows(json!([
            {"h": 170, "w": 65},
            {"h": "n/a", "w": 70},
            {"h": "180", "w": "80.5"}
        ]));
        let spec = ChartSpec::new(ChartKind::Scatter, "h", "w", "h vs w");
        let ChartScene::Scatter(scatter) = compile_chart(&spec, &data) else { panic!("expected scatter") };
        assert_eq!(scatter.points, vec![(170.0, 65.0), (180.0, 80.5)]);
        assert_eq!(scatter.series_name, "h vs w");
    }

    #[test]
    fn test_compile_heatmap_placeholder_ignores_rows() {
        let spec = ChartSpec::new(ChartKind::Heatmap, "", "", "Correlation Matrix");
        assert_eq!(
            compile_chart(&spec, &sales_rows()).placeholder_text(),
            Some(HEATMAP_PLACEHOLDER)
        );
        assert_eq!(compile_chart(&spec, &[]).placeholder_text(), Some(HEATMAP_PLACEHOLDER));
    }

    #[test]
    fn test_compile_unsupported_names_type() {
        let spec = ChartSpec::new(ChartKind::from("unsupported-type"), "a", "b", "t");
        let scene = compile_chart(&spec, &sales_rows());
        assert!(scene.placeholder_text().unwrap().contains("unsupported-type"));
    }

    #[test]
    fn test_compile_empty_rows_placeholder() {
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter, ChartKind::Pie] {
            let spec = ChartSpec::new(kind, "a", "b", "Empty");
            assert_eq!(
                compile_chart(&spec, &[]).placeholder_text(),
                Some("No data available for Empty")
            );
        }
    }
}
