use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_insightboard");

/// Run insightboard with the given args and optional stdin, returning stdout on success
fn run_insightboard(args: &[&str], stdin: Option<&str>) -> Result<Vec<u8>, String> {
    let mut child = Command::new(BIN)
        .args(args)
        .env_remove("INSIGHTBOARD_ENDPOINT")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut handle) = child.stdin.take() {
        if let Some(input) = stdin {
            handle
                .write_all(input.as_bytes())
                .map_err(|e| format!("Failed to write to stdin: {}", e))?;
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_validate_accepts_csv() {
    let out = run_insightboard(&["validate", "test/sales.csv"], None).expect("validate failed");
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("sales.csv"));
    assert!(text.contains("ready for analysis"));
}

#[test]
fn test_validate_rejects_txt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let err = run_insightboard(&["validate", path.to_str().unwrap()], None).unwrap_err();
    assert!(
        err.contains("Invalid file type. Please upload: .csv, .xls, .xlsx, .pdf, .doc, .docx"),
        "unexpected stderr: {}",
        err
    );
}

#[test]
fn test_chart_bar_from_csv() {
    let out = run_insightboard(
        &["chart", "--csv", "test/sales.csv", "--type", "bar", "--x", "region", "--y", "revenue"],
        None,
    )
    .expect("chart failed");
    assert!(is_valid_png(&out), "Output is not a valid PNG");
}

#[test]
fn test_chart_pie_counts_from_stdin() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let out = run_insightboard(
        &["chart", "--type", "pie", "--x", "product", "--y", "count", "--title", "Orders"],
        Some(&csv),
    );
    // Pie charts plot rows as-is; without a count column every wedge is zero
    let err = out.unwrap_err();
    assert!(err.contains("No data available for Orders"), "unexpected stderr: {}", err);
}

#[test]
fn test_chart_line_svg_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("units.svg");
    run_insightboard(
        &[
            "chart", "--csv", "test/sales.csv", "--type", "line", "--x", "date", "--y", "units",
            "--image", "svg", "-o", out_path.to_str().unwrap(),
        ],
        None,
    )
    .expect("chart failed");
    let svg = fs::read_to_string(&out_path).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_chart_scatter() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let out = run_insightboard(
        &["chart", "--type", "scatter", "--x", "units", "--y", "revenue"],
        Some(&csv),
    )
    .expect("chart failed");
    assert!(is_valid_png(&out));
}

#[test]
fn test_chart_warns_about_unknown_column() {
    let output = Command::new(BIN)
        .args(["chart", "--csv", "test/sales.csv", "--type", "bar", "--x", "regoin", "--y", "count"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run insightboard");

    // Still drawn: every row lands in the "undefined" bucket
    assert!(output.status.success());
    assert!(is_valid_png(&output.stdout));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("regoin"), "unexpected stderr: {}", stderr);
    assert!(stderr.contains("available: date, region, product, units, revenue"));
}

#[test]
fn test_chart_heatmap_is_placeholder() {
    let err = run_insightboard(&["chart", "--csv", "test/sales.csv", "--type", "heatmap"], None)
        .unwrap_err();
    assert!(err.contains("Heatmap visualization coming soon"));
}

#[test]
fn test_chart_unknown_type_named() {
    let err = run_insightboard(&["chart", "--csv", "test/sales.csv", "--type", "radar"], None)
        .unwrap_err();
    assert!(err.contains("Unsupported chart type: radar"));
}

#[test]
fn test_render_html_dashboard() {
    let out = run_insightboard(&["render", "test/analysis_result.json"], None).expect("render failed");
    let html = String::from_utf8(out).unwrap();

    assert!(html.contains("Data Cleaning Report"));
    assert!(html.contains("Dataset Summary"));
    assert!(html.contains("Key Insights"));
    assert!(html.contains("<h3>Sales Overview</h3>"));
    assert!(html.contains("North and East lead revenue."));
    assert!(html.contains("Heatmap visualization coming soon"));
    assert!(html.contains("Range: 3.00 - 15.00"));
    assert!(html.contains("href=\"http://localhost:8000/download_report\" target=\"_blank\""));
    // bar, pie, line and scatter are drawn inline
    assert_eq!(html.matches("<svg").count(), 4);
}

#[test]
fn test_render_text_metrics() {
    let out = run_insightboard(&["render", "test/analysis_result.json", "--format", "text"], None)
        .expect("render failed");
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Total Rows: 8"));
    assert!(text.contains("Total units: 67"));
    assert!(text.contains("Total revenue: 1,650.75"));
    assert!(!text.contains("Columns Dropped"));
}

#[test]
fn test_render_uses_endpoint_flag() {
    let out = run_insightboard(
        &["render", "test/analysis_result.json", "--format", "text", "--endpoint", "http://reports.test:9000/"],
        None,
    )
    .expect("render failed");
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Export report: http://reports.test:9000/download_report"));
}

#[test]
fn test_render_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("insightboard.toml");
    fs::write(&config, "endpoint = \"http://from-config:8000\"\n").unwrap();

    let out = run_insightboard(
        &["render", "test/analysis_result.json", "--format", "text", "--config", config.to_str().unwrap()],
        None,
    )
    .expect("render failed");
    assert!(String::from_utf8(out).unwrap().contains("http://from-config:8000/download_report"));
}

#[test]
fn test_analyze_unreachable_service() {
    let err = run_insightboard(
        &["analyze", "test/sales.csv", "--endpoint", "http://127.0.0.1:9"],
        None,
    )
    .unwrap_err();
    assert!(err.contains(
        "Failed to analyze file. Please ensure the backend is running and supports this file type."
    ));
}

#[tokio::test]
async fn test_analyze_against_mock_service() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    let body: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("test/analysis_result.json").unwrap()).unwrap();
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("result.json");
    let uri = server.uri();
    let output = tokio::process::Command::new(BIN)
        .args([
            "analyze", "test/sales.csv", "--format", "text",
            "--endpoint", uri.as_str(),
            "--save-json", saved.to_str().unwrap(),
        ])
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Total revenue: 1,650.75"));
    assert!(text.contains("* Correlation Matrix: Heatmap visualization coming soon"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(saved["summary"]["total_rows"], 8);
}
