use anyhow::{anyhow, Context, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};
use serde_json::{Map, Value};
use std::io::Read;

/// One record of the analysed dataset: column name -> scalar, in column order.
pub type Row = Map<String, Value>;

/// One item handed to a chart. Same shape as a [`Row`]; for aggregated bar
/// data it holds exactly the x and y columns.
pub type Point = Map<String, Value>;

/// Grouping key used for a value that is absent from a row.
pub const MISSING_KEY: &str = "undefined";

/// Stringify a cell the way the dashboard groups and labels it.
///
/// Integral numbers print without a fractional part (`10`, not `10.0`) so a
/// numeric column groups the same whether the service sent `10` or `10.0`.
pub fn key_string(value: Option<&Value>) -> String {
    match value {
        None => MISSING_KEY.to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f != 0.0 && (f.abs() >= 1e21 || f.abs() < 1e-6) {
        // Exponent form outside this band, positive exponents signed: 1e+21, 1.5e-7
        let text = format!("{:e}", f);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    } else if f.fract() == 0.0 {
        format!("{}", f as i128)
    } else {
        format!("{}", f)
    }
}

/// Lenient numeric read of a cell.
///
/// Numbers pass through. Strings are read by their longest leading decimal
/// prefix (`"12.5kg"` is 12.5). Everything else, including empty strings, is
/// NaN; callers decide what NaN means for them.
pub fn parse_float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_float_str(s),
        _ => f64::NAN,
    }
}

/// `parse_float` with NaN folded to zero.
pub fn parse_float_or_zero(value: Option<&Value>) -> f64 {
    let v = parse_float(value);
    if v.is_nan() { 0.0 } else { v }
}

pub fn parse_float_str(input: &str) -> f64 {
    match float_prefix(input) {
        Ok((_, text)) => parse_prefix(text),
        Err(_) => f64::NAN,
    }
}

fn parse_prefix(text: &str) -> f64 {
    let unsigned = text.trim_start_matches(['+', '-']);
    let negative = text.starts_with('-');
    if unsigned == "Infinity" {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn float_prefix(input: &str) -> IResult<&str, &str> {
    preceded(
        multispace0,
        recognize(pair(
            opt(one_of("+-")),
            alt((tag("Infinity"), decimal)),
        )),
    )(input)
}

fn decimal(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        // A dangling exponent marker ("1e") is not part of the number
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    ))(input)
}

/// Read CSV text into rows. Every cell stays a string; numeric reads happen
/// lazily through [`parse_float`].
pub fn rows_from_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        anyhow::bail!("CSV must have at least one column");
    }

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", idx + 1))?;
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Accept a JSON array of objects as rows
pub fn rows_from_json(value: &Value) -> Result<Vec<Row>> {
    let array = value
        .as_array()
        .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

    array
        .iter()
        .map(|item| {
            item.as_object()
                .cloned()
                .ok_or_else(|| anyhow!("Items in array must be objects"))
        })
        .collect()
}

/// Column names in first-seen order across all rows
pub fn column_names(rows: &[Row]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    names
}

/// Requested columns that no row carries. Blank names are ignored, and
/// nothing is reported for an empty dataset.
pub fn missing_columns<'a>(rows: &[Row], wanted: &[&'a str]) -> Vec<&'a str> {
    if rows.is_empty() {
        return Vec::new();
    }
    let names = column_names(rows);
    wanted
        .iter()
        .copied()
        .filter(|w| !w.is_empty() && !names.iter().any(|n| n == w))
        .collect()
}
