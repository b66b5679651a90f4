// Group-by aggregation for categorical charts

use crate::chart::COUNT_COLUMN;
use crate::data::{key_string, parse_float_or_zero, Point, Row};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Collapse rows into one point per distinct `x` value.
///
/// With `y == "count"` each point carries the number of rows in its bucket;
/// otherwise the sum of the numeric reading of `y`, where unreadable or
/// missing cells count as zero. Rows without an `x` cell fall into the
/// `"undefined"` bucket. Points come out in the order their key was first
/// seen.
pub fn aggregate(rows: &[Row], x: &str, y: &str) -> Vec<Point> {
    let counting = y == COUNT_COLUMN;

    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut key_order: Vec<String> = Vec::new();

    for row in rows {
        let key = key_string(row.get(x));
        let increment = if counting {
            1.0
        } else {
            parse_float_or_zero(row.get(y))
        };

        // Track key order (first appearance)
        if !totals.contains_key(&key) {
            key_order.push(key.clone());
        }
        *totals.entry(key).or_insert(0.0) += increment;
    }

    key_order
        .into_iter()
        .map(|key| {
            let total = totals.get(&key).copied().unwrap_or(0.0);
            let mut point = Point::new();
            point.insert(x.to_string(), Value::String(key));
            // Same column for x and y: the aggregate replaces the key
            point.insert(y.to_string(), number_value(total));
            point
        })
        .collect()
}

/// Aggregates stay integral in JSON when they are whole numbers. JSON has no
/// infinities, so non-finite totals are spelled out and read back by
/// `parse_float`.
fn number_value(total: f64) -> Value {
    if total.is_nan() {
        Value::String("NaN".to_string())
    } else if total.is_infinite() {
        let text = if total > 0.0 { "Infinity" } else { "-Infinity" };
        Value::String(text.to_string())
    } else if total.fract() == 0.0 && total.abs() < i64::MAX as f64 {
        Value::Number(Number::from(total as i64))
    } else {
        Number::from_f64(total).map(Value::Number).unwrap_or(Value::Null)
    }
}
