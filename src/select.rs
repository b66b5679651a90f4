use crate::aggregate::aggregate;
use crate::chart::{ChartKind, ChartSpec};
use crate::data::{Point, Row};
use std::borrow::Cow;

/// Pick the data a chart is drawn from.
///
/// Pre-aggregated data on the spec always wins and is handed back as-is.
/// Bars without it are aggregated from the rows, heatmaps get nothing, and
/// every other chart uses the rows unchanged.
pub fn select_data<'a>(spec: &'a ChartSpec, rows: &'a [Row]) -> Cow<'a, [Point]> {
    if let Some(data) = &spec.data {
        return Cow::Borrowed(data.as_slice());
    }

    match spec.kind {
        ChartKind::Bar => Cow::Owned(aggregate(rows, &spec.x, &spec.y)),
        ChartKind::Heatmap => Cow::Borrowed(&[]),
        _ => Cow::Borrowed(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rows() -> Vec<Row> {
        crate::data::rows_from_json(&json!([
            {"region": "A", "sales": "10"},
            {"region": "B", "sales": "5"},
            {"region": "A", "sales": "3"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_supplied_data_is_passed_through_untouched() {
        let rows = sample_rows();
        let binned = crate::data::rows_from_json(&json!([{"bin": "0-5", "count": 2}])).unwrap();
        let spec = ChartSpec::new(ChartKind::Bar, "region", "sales", "t").with_data(binned);

        let selected = select_data(&spec, &rows);
        assert!(matches!(selected, Cow::Borrowed(_)));
        let supplied = spec.data.as_ref().unwrap();
        assert!(std::ptr::eq(selected.as_ptr(), supplied.as_ptr()));
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_bar_without_data_is_aggregated() {
        let rows = sample_rows();
        let spec = ChartSpec::new(ChartKind::Bar, "region", "sales", "t");
        let selected = select_data(&spec, &rows);
        assert!(matches!(selected, Cow::Owned(_)));
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0]["sales"], json!(13));
    }

    #[test]
    fn test_line_scatter_pie_use_raw_rows() {
        let rows = sample_rows();
        for kind in [ChartKind::Line, ChartKind::Scatter, ChartKind::Pie, ChartKind::Histogram] {
            let spec = ChartSpec::new(kind, "region", "sales", "t");
            let selected = select_data(&spec, &rows);
            assert!(std::ptr::eq(selected.as_ptr(), rows.as_ptr()));
            assert_eq!(selected.len(), 3);
        }
    }

    #[test]
    fn test_heatmap_without_data_is_empty() {
        let rows = sample_rows();
        let spec = ChartSpec::new(ChartKind::Heatmap, "", "", "Correlation Matrix");
        assert!(select_data(&spec, &rows).is_empty());
    }
}
