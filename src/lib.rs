// Library exports for insightboard

pub mod analysis;
pub mod chart;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod palette;
pub mod upload;

// Chart pipeline
pub mod aggregate;
pub mod select;
pub mod ir;
pub mod compiler;
pub mod graph;
pub mod render;

// Dashboard composition
pub mod dashboard;
pub mod report;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 300 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
        }
    }
}

impl RenderOptions {
    /// Same dimensions, different encoding
    pub fn with_format(&self, format: OutputFormat) -> Self {
        Self { format, ..self.clone() }
    }
}
