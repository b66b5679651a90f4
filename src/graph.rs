use crate::ir::{BarScene, ChartScene, LineScene, PieScene, ScatterScene};
use crate::palette::{color_or_accent, ChartTheme};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

/// Style configuration for line series
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for point series
#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    pub alpha: Option<f64>,
}

const TITLE_FONT: f64 = 18.0;
const LABEL_FONT: f64 = 12.0;
const MESSAGE_FONT: f64 = 14.0;

/// Largest width or height accepted for a single chart
pub const MAX_DIMENSION: u32 = 8192;

/// Draw a compiled scene and encode it in the requested format
pub fn draw_scene(scene: &ChartScene, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        anyhow::bail!("Chart dimensions must be non-zero (got {}x{})", width, height);
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        anyhow::bail!(
            "Chart dimensions {}x{} exceed the {} pixel limit",
            width,
            height,
            MAX_DIMENSION
        );
    }

    let theme = ChartTheme::default();

    match options.format {
        OutputFormat::Png => {
            let len = (width as usize)
                .checked_mul(height as usize)
                .and_then(|n| n.checked_mul(3))
                .context("Chart buffer size overflows")?;
            let mut buffer = vec![0u8; len];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
                    .into_drawing_area();
                draw_on(&root, scene, &theme)?;
                root.present().context("Failed to present drawing")?;
            }
            encode_png(&buffer, width, height)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                draw_on(&root, scene, &theme)?;
                root.present().context("Failed to present drawing")?;
            }
            Ok(svg.into_bytes())
        }
    }
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

fn draw_on<DB>(root: &DrawingArea<DB, Shift>, scene: &ChartScene, theme: &ChartTheme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&theme.background).context("Failed to fill background")?;

    match scene {
        ChartScene::Line(line) => draw_line(root, line, theme),
        ChartScene::Bars(bars) => draw_bars(root, bars, theme),
        ChartScene::Pie(pie) => draw_pie(root, pie, theme),
        ChartScene::Scatter(scatter) => draw_scatter(root, scatter, theme),
        ChartScene::Placeholder(message) => draw_message(root, message, theme),
    }
}

fn text_style(size: f64, theme: &ChartTheme) -> TextStyle<'static> {
    ("sans-serif", size).into_font().color(&theme.axis)
}

/// Pad a data range by 5% (or by 1 when degenerate), as the axes expect
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Range for bar heights: always includes the zero baseline
fn baseline_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == max {
        return 0.0..1.0;
    }
    let padding = (max - min) * 0.05;
    let lo = if min < 0.0 { min - padding } else { 0.0 };
    let hi = if max > 0.0 { max + padding } else { 0.0 };
    lo..hi
}

fn category_label(categories: &[String], x: f64) -> String {
    if x < 0.0 {
        return String::new();
    }
    categories.get(x.floor() as usize).cloned().unwrap_or_default()
}

fn draw_line<DB>(root: &DrawingArea<DB, Shift>, line: &LineScene, theme: &ChartTheme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let slots = line.categories.len().max(1);
    let x_range = 0.0..(slots as f64);
    let y_range = padded_range(line.points.iter().map(|&(_, y)| y));

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&line.labels.title, text_style(TITLE_FONT, theme))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    let categories = &line.categories;
    chart
        .configure_mesh()
        .bold_line_style(&theme.grid)
        .light_line_style(&theme.grid.mix(0.3))
        .axis_style(&theme.axis)
        .label_style(text_style(LABEL_FONT, theme))
        .x_labels(slots.min(12))
        .x_label_formatter(&|x| category_label(categories, *x))
        .x_desc(line.labels.x_label.as_str())
        .draw()
        .context("Failed to draw mesh")?;

    let color = line
        .style
        .color
        .as_deref()
        .map(color_or_accent)
        .unwrap_or(theme.accent);
    let alpha = line.style.alpha.unwrap_or(1.0);
    let width = line.style.width.unwrap_or(1.0) as u32;
    let stroke = color.mix(alpha).stroke_width(width);

    // Points sit in the middle of their category slot
    let points: Vec<(f64, f64)> = line.points.iter().map(|&(x, y)| (x + 0.5, y)).collect();

    chart
        .draw_series(LineSeries::new(points.clone(), stroke))
        .context("Failed to draw line series")?
        .label(line.series_name.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));

    chart
        .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 2, color.filled())))
        .context("Failed to draw line markers")?;

    chart
        .configure_series_labels()
        .background_style(&theme.background.mix(0.8))
        .border_style(&theme.grid)
        .label_font(text_style(LABEL_FONT, theme))
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

fn draw_bars<DB>(root: &DrawingArea<DB, Shift>, bars: &BarScene, theme: &ChartTheme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if bars.bars.is_empty() {
        anyhow::bail!("Cannot create bar chart with no data");
    }
    if let Some(bar) = bars.bars.iter().find(|b| !b.value.is_finite()) {
        anyhow::bail!("Bar '{}' has non-finite height {}", bar.label, bar.value);
    }

    let num_categories = bars.bars.len();
    let x_range = 0.0..(num_categories as f64);
    let y_range = baseline_range(bars.bars.iter().map(|b| b.value));

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&bars.labels.title, text_style(TITLE_FONT, theme))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    // Configure mesh with custom x-axis labels
    let categories: Vec<String> = bars.bars.iter().map(|b| b.label.clone()).collect();
    chart
        .configure_mesh()
        .bold_line_style(&theme.grid)
        .light_line_style(&theme.grid.mix(0.3))
        .axis_style(&theme.axis)
        .label_style(text_style(LABEL_FONT, theme))
        .x_labels(num_categories.min(20))
        .x_label_formatter(&|x| category_label(&categories, *x))
        .x_desc(bars.labels.x_label.as_str())
        .draw()
        .context("Failed to draw mesh")?;

    let bar_width = 0.8;
    let legend_color = theme.accent;
    chart
        .draw_series(bars.bars.iter().enumerate().map(|(idx, bar)| {
            let x_center = idx as f64 + 0.5;
            Rectangle::new(
                [
                    (x_center - bar_width / 2.0, 0.0),
                    (x_center + bar_width / 2.0, bar.value),
                ],
                color_or_accent(&bar.color).filled(),
            )
        }))
        .context("Failed to draw bars")?
        .label(bars.series_name.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled()));

    chart
        .configure_series_labels()
        .background_style(&theme.background.mix(0.8))
        .border_style(&theme.grid)
        .label_font(text_style(LABEL_FONT, theme))
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

fn draw_pie<DB>(root: &DrawingArea<DB, Shift>, pie: &PieScene, theme: &ChartTheme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = if pie.title.is_empty() {
        root.clone()
    } else {
        root.titled(&pie.title, text_style(TITLE_FONT, theme))
            .context("Failed to draw title")?
    };

    let (width, height) = area.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = (width.min(height) as f64 / 2.0 - 30.0).max(10.0);

    // Counter-clockwise from three o'clock
    let mut start = 0.0f64;
    for wedge in &pie.wedges {
        let sweep = wedge.fraction * std::f64::consts::TAU;
        if sweep <= 0.0 {
            continue;
        }
        let end = start + sweep;

        let steps = ((sweep / std::f64::consts::TAU) * 90.0).ceil().max(2.0) as usize;
        let mut outline: Vec<(i32, i32)> = Vec::with_capacity(steps + 2);
        outline.push((center.0 as i32, center.1 as i32));
        for step in 0..=steps {
            let angle = start + sweep * step as f64 / steps as f64;
            outline.push(polar(center, radius, angle));
        }

        area.draw(&Polygon::new(outline, color_or_accent(&wedge.color).filled()))
            .context("Failed to draw pie wedge")?;

        let mid = start + sweep / 2.0;
        let anchor = polar(center, radius + 12.0, mid);
        area.draw(&Text::new(wedge.label.clone(), anchor, text_style(LABEL_FONT, theme)))
            .context("Failed to draw pie label")?;

        start = end;
    }

    Ok(())
}

fn polar(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.cos()).round() as i32,
        (center.1 - radius * angle.sin()).round() as i32,
    )
}

fn draw_scatter<DB>(root: &DrawingArea<DB, Shift>, scatter: &ScatterScene, theme: &ChartTheme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if scatter.points.is_empty() {
        anyhow::bail!("Cannot create canvas with no data points");
    }

    let x_range = padded_range(scatter.points.iter().map(|&(x, _)| x));
    let y_range = padded_range(scatter.points.iter().map(|&(_, y)| y));

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&scatter.labels.title, text_style(TITLE_FONT, theme))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .bold_line_style(&theme.grid)
        .light_line_style(&theme.grid.mix(0.3))
        .axis_style(&theme.axis)
        .label_style(text_style(LABEL_FONT, theme))
        .x_desc(scatter.labels.x_label.as_str())
        .y_desc(scatter.labels.y_label.as_str())
        .draw()
        .context("Failed to draw mesh")?;

    let color = scatter
        .style
        .color
        .as_deref()
        .map(color_or_accent)
        .unwrap_or(theme.accent);
    let fill = color.mix(scatter.style.alpha.unwrap_or(1.0)).filled();
    let size = scatter.style.size.unwrap_or(3.0) as i32;

    chart
        .draw_series(scatter.points.iter().map(|&(x, y)| Circle::new((x, y), size, fill)))
        .context("Failed to draw point series")?
        .label(scatter.series_name.as_str())
        .legend(move |(x, y)| Circle::new((x + 10, y), size, fill));

    chart
        .configure_series_labels()
        .background_style(&theme.background.mix(0.8))
        .border_style(&theme.grid)
        .label_font(text_style(LABEL_FONT, theme))
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

fn draw_message<DB>(root: &DrawingArea<DB, Shift>, message: &str, theme: &ChartTheme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, height) = root.dim_in_pixel();
    let style = text_style(MESSAGE_FONT, theme).pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        message.to_string(),
        ((width / 2) as i32, (height / 2) as i32),
        style,
    ))
    .context("Failed to draw message")?;
    Ok(())
}
