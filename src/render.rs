use crate::chart::ChartSpec;
use crate::compiler::compile_chart;
use crate::data::Row;
use crate::graph::draw_scene;
use crate::ir::ChartScene;
use crate::{OutputFormat, RenderOptions};

/// What a chart slot on the dashboard ends up showing
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedChart {
    Image { format: OutputFormat, bytes: Vec<u8> },
    Placeholder(String),
}

impl RenderedChart {
    pub fn placeholder_text(&self) -> Option<&str> {
        match self {
            RenderedChart::Placeholder(text) => Some(text),
            RenderedChart::Image { .. } => None,
        }
    }

    /// Inline SVG markup, when the chart was drawn as SVG
    pub fn svg_markup(&self) -> Option<&str> {
        match self {
            RenderedChart::Image { format: OutputFormat::Svg, bytes } => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

/// Render one recommended chart. Never fails: anything that cannot be drawn
/// degrades to a placeholder message.
pub fn render_chart(spec: &ChartSpec, rows: &[Row], options: &RenderOptions) -> RenderedChart {
    let scene = compile_chart(spec, rows);

    if let ChartScene::Placeholder(message) = scene {
        tracing::debug!(chart = %spec.title, kind = %spec.kind, "placeholder: {}", message);
        return RenderedChart::Placeholder(message);
    }

    match draw_scene(&scene, options) {
        Ok(bytes) => {
            tracing::debug!(chart = %spec.title, kind = %spec.kind, bytes = bytes.len(), "chart drawn");
            RenderedChart::Image { format: options.format, bytes }
        }
        Err(e) => {
            tracing::warn!(chart = %spec.title, "failed to draw chart: {:#}", e);
            RenderedChart::Placeholder(format!("Could not draw chart: {}", spec.title))
        }
    }
}
