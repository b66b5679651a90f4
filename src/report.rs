//! Dashboard output as a standalone HTML page or as plain terminal text

use crate::dashboard::{ChartPanel, CleaningSection, ConclusionSection, Dashboard, DatasetSection, Metric};
use crate::palette::{ACCENT_HEX, AXIS_HEX, PANEL_HEX};
use crate::render::RenderedChart;
use crate::upload::format_file_size;

const PAGE_TITLE: &str = "Analysis Results";

/// Render the dashboard as a self-contained HTML document.
///
/// Charts are embedded inline and must have been rendered as SVG; a raster
/// chart is listed by size only.
pub fn to_html(dashboard: &Dashboard) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", PAGE_TITLE));
    html.push_str(&format!(
        "<style>\nbody {{ background: #111827; color: #e5e7eb; font-family: sans-serif; margin: 2rem; }}\n\
         section, .card {{ background: {panel}; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }}\n\
         .metrics {{ display: flex; gap: 1rem; }}\n\
         .label, .muted {{ color: {axis}; }}\n\
         a.button {{ background: #10b981; color: #fff; padding: 0.5rem 1rem; border-radius: 6px; text-decoration: none; }}\n\
         h2, h3 {{ color: {accent}; }}\n</style>\n",
        panel = PANEL_HEX,
        axis = AXIS_HEX,
        accent = ACCENT_HEX,
    ));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<header>\n<h2>{}</h2>\n", PAGE_TITLE));
    html.push_str(&format!(
        "<a class=\"button\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Export Report (PDF)</a>\n",
        escape_html(&dashboard.export_url)
    ));
    html.push_str("</header>\n");

    if let Some(cleaning) = &dashboard.cleaning {
        html.push_str(&cleaning_html(cleaning));
    }
    if let Some(dataset) = &dashboard.dataset {
        html.push_str(&dataset_html(dataset));
    }

    if !dashboard.metrics.is_empty() {
        html.push_str("<div class=\"metrics\">\n");
        for metric in &dashboard.metrics {
            html.push_str(&format!(
                "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
                escape_html(&metric.label),
                escape_html(&metric.value)
            ));
        }
        html.push_str("</div>\n");
    }

    if let Some(insights) = &dashboard.insights {
        html.push_str("<section>\n<h3>Key Insights</h3>\n");
        html.push_str(&list_html(insights));
        html.push_str("</section>\n");
    }

    if let Some(charts) = &dashboard.charts {
        html.push_str("<div class=\"charts\">\n");
        for panel in charts {
            html.push_str(&chart_html(panel));
        }
        html.push_str("</div>\n");
    }

    if let Some(conclusion) = &dashboard.conclusion {
        html.push_str(&conclusion_html(conclusion));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn stats_html(stats: &[Metric]) -> String {
    stats
        .iter()
        .map(|m| {
            format!(
                "<div><span class=\"label\">{}:</span> <span>{}</span></div>\n",
                escape_html(&m.label),
                escape_html(&m.value)
            )
        })
        .collect()
}

fn list_html(items: &[String]) -> String {
    let mut html = String::from("<ul>\n");
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", escape_html(item)));
    }
    html.push_str("</ul>\n");
    html
}

fn cleaning_html(cleaning: &CleaningSection) -> String {
    let mut html = String::from("<section>\n<h3>Data Cleaning Report</h3>\n");
    html.push_str(&stats_html(&cleaning.stats));

    if !cleaning.warnings.is_empty() {
        html.push_str("<h4>Warnings</h4>\n<ul>\n");
        for (column, message) in &cleaning.warnings {
            html.push_str(&format!(
                "<li><strong>{}:</strong> {}</li>\n",
                escape_html(column),
                escape_html(message)
            ));
        }
        html.push_str("</ul>\n");
    }

    if !cleaning.details.is_empty() {
        html.push_str("<details>\n<summary>View Detailed Cleaning Actions</summary>\n");
        for detail in &cleaning.details {
            html.push_str(&format!(
                "<div class=\"card\"><strong>{}</strong> <span class=\"muted\">{} | {} | {}</span><div>{}</div></div>\n",
                escape_html(&detail.column),
                escape_html(&detail.column_type),
                escape_html(&detail.missing),
                escape_html(&detail.action),
                escape_html(&detail.strategy)
            ));
        }
        html.push_str("</details>\n");
    }

    html.push_str("</section>\n");
    html
}

fn dataset_html(dataset: &DatasetSection) -> String {
    let mut html = String::from("<section>\n<h3>Dataset Summary</h3>\n");
    html.push_str(&stats_html(&dataset.overview));

    if !dataset.columns.is_empty() {
        html.push_str("<details>\n<summary>View Detailed Column Information</summary>\n");
        for card in &dataset.columns {
            html.push_str(&format!(
                "<div class=\"card\"><strong>{}</strong> <span class=\"muted\">{}</span><div>{}</div></div>\n",
                escape_html(&card.name),
                escape_html(&card.kind),
                escape_html(&card.stats.join(" | "))
            ));
        }
        html.push_str("</details>\n");
    }

    html.push_str("</section>\n");
    html
}

fn chart_html(panel: &ChartPanel) -> String {
    let mut html = format!("<div class=\"card\">\n<h4>{}</h4>\n", escape_html(&panel.title));

    // SVG comes from our own renderer, so it is inserted as markup
    match (&panel.chart, panel.chart.svg_markup()) {
        (_, Some(svg)) => html.push_str(svg),
        (RenderedChart::Placeholder(text), None) => {
            html.push_str(&format!("<p class=\"muted\">{}</p>", escape_html(text)));
        }
        (RenderedChart::Image { format, bytes }, None) => {
            html.push_str(&format!(
                "<p class=\"muted\">{} chart, {}</p>",
                format.extension(),
                format_file_size(bytes.len() as u64)
            ));
        }
    }
    html.push('\n');

    if let Some(interpretation) = &panel.interpretation {
        html.push_str(&format!("<p>{}</p>\n", escape_html(interpretation)));
    }

    html.push_str("</div>\n");
    html
}

fn conclusion_html(conclusion: &ConclusionSection) -> String {
    let mut html = format!("<section>\n<h3>{}</h3>\n", escape_html(&conclusion.title));
    html.push_str(&format!("<p>{}</p>\n", escape_html(&conclusion.summary)));

    if !conclusion.key_findings.is_empty() {
        html.push_str("<h4>Key Findings:</h4>\n");
        html.push_str(&list_html(&conclusion.key_findings));
    }
    if !conclusion.data_characteristics.is_empty() {
        html.push_str("<h4>Data Characteristics:</h4>\n");
        html.push_str(&list_html(&conclusion.data_characteristics));
    }

    html.push_str("</section>\n");
    html
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Plain-text summary of the same sections, for the terminal
pub fn to_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n", PAGE_TITLE, "=".repeat(PAGE_TITLE.len())));

    if !dashboard.metrics.is_empty() {
        out.push('\n');
        for metric in &dashboard.metrics {
            out.push_str(&format!("{}: {}\n", metric.label, metric.value));
        }
    }

    if let Some(cleaning) = &dashboard.cleaning {
        out.push_str("\nData Cleaning Report\n");
        push_stats(&mut out, &cleaning.stats);
        if !cleaning.warnings.is_empty() {
            out.push_str("  Warnings:\n");
            for (column, message) in &cleaning.warnings {
                out.push_str(&format!("    - {}: {}\n", column, message));
            }
        }
        for detail in &cleaning.details {
            out.push_str(&format!(
                "  {} [{}] {}, {}: {}\n",
                detail.column, detail.column_type, detail.missing, detail.action, detail.strategy
            ));
        }
    }

    if let Some(dataset) = &dashboard.dataset {
        out.push_str("\nDataset Summary\n");
        push_stats(&mut out, &dataset.overview);
        for card in &dataset.columns {
            out.push_str(&format!("  {} ({}): {}\n", card.name, card.kind, card.stats.join(", ")));
        }
    }

    if let Some(insights) = &dashboard.insights {
        out.push_str("\nKey Insights\n");
        for insight in insights {
            out.push_str(&format!("  - {}\n", insight));
        }
    }

    if let Some(charts) = &dashboard.charts {
        out.push_str("\nCharts\n");
        for panel in charts {
            let shown = match &panel.chart {
                RenderedChart::Image { format, bytes } => {
                    format!("{} image, {}", format.extension(), format_file_size(bytes.len() as u64))
                }
                RenderedChart::Placeholder(text) => text.clone(),
            };
            out.push_str(&format!("  * {}: {}\n", panel.title, shown));
            if let Some(interpretation) = &panel.interpretation {
                out.push_str(&format!("    {}\n", interpretation));
            }
        }
    }

    if let Some(conclusion) = &dashboard.conclusion {
        out.push_str(&format!("\n{}\n  {}\n", conclusion.title, conclusion.summary));
        if !conclusion.key_findings.is_empty() {
            out.push_str("  Key Findings:\n");
            for finding in &conclusion.key_findings {
                out.push_str(&format!("    - {}\n", finding));
            }
        }
        if !conclusion.data_characteristics.is_empty() {
            out.push_str("  Data Characteristics:\n");
            for item in &conclusion.data_characteristics {
                out.push_str(&format!("    - {}\n", item));
            }
        }
    }

    out.push_str(&format!("\nExport report: {}\n", dashboard.export_url));
    out
}

fn push_stats(out: &mut String, stats: &[Metric]) {
    for m in stats {
        out.push_str(&format!("  {}: {}\n", m.label, m.value));
    }
}
