//! Draws a [`Figure`] with plotters: PNG through the bitmap backend, SVG through
//! the SVG backend. Both formats share one drawing routine.

use crate::domain::figure::{Bar, Figure, Legend, Marker, MarkerShape, TextMode, Tick};
use crate::domain::ports::{ImageFormat, Renderer, Trim};
use crate::utils::error::{GanttError, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

const PX_PER_PT: f64 = 100.0 / 72.0;
const TITLE_FONT_PX: f64 = 12.0 * PX_PER_PT;
const LABEL_FONT_PX: f64 = 10.0 * PX_PER_PT;
const MARGIN: u32 = 15;
const X_LABEL_AREA: u32 = 30;
const Y_LABEL_GAP: u32 = 12;
const DEFAULT_X_TICKS: usize = 6;
const TIGHT_PAD: u32 = 10;
const GRID_COLOR: RGBColor = RGBColor(176, 176, 176);
const LEGEND_FRAME_COLOR: RGBColor = RGBColor(204, 204, 204);

/// Renders figures with plotters, picking the backend from the requested format.
#[derive(Debug, Clone, Default)]
pub struct PlotRenderer;

impl PlotRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for PlotRenderer {
    fn render(&self, figure: &Figure, format: ImageFormat, trim: Trim) -> Result<Vec<u8>> {
        if figure.width == 0 || figure.height == 0 {
            return Err(GanttError::InvalidConfigValueError {
                field: "figure".to_string(),
                value: format!("{}x{}", figure.width, figure.height),
                reason: "Figure dimensions must be positive".to_string(),
            });
        }

        let colors = Colors::resolve(figure)?;
        let size = (figure.width, figure.height);

        match format {
            ImageFormat::Png => {
                let pixels = draw_pixels(figure, &colors)?;
                let crop = tight_crop(trim, &pixels, size);
                encode_png(&pixels, size, crop)
            }
            ImageFormat::Svg => {
                // The bitmap pass measures the drawn content for the viewBox.
                let crop = match trim {
                    Trim::Tight => tight_crop(trim, &draw_pixels(figure, &colors)?, size),
                    Trim::None => None,
                };
                let svg = draw_svg(figure, &colors)?;
                let svg = match crop {
                    Some(crop) => set_view_box(svg, size, crop),
                    None => svg,
                };
                Ok(svg.into_bytes())
            }
        }
    }
}

/// Parses `#RRGGBB`, `#RGB` or a basic colour name.
pub fn parse_color(value: &str) -> Option<RGBColor> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(RGBColor((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let expand = |nibble: u32| (nibble * 17) as u8;
                Some(RGBColor(
                    expand((v >> 8) & 0xF),
                    expand((v >> 4) & 0xF),
                    expand(v & 0xF),
                ))
            }
            _ => None,
        };
    }

    let (r, g, b) = match value.to_ascii_lowercase().as_str() {
        "black" | "k" => (0, 0, 0),
        "white" | "w" => (255, 255, 255),
        "red" | "r" => (255, 0, 0),
        "green" | "g" => (0, 128, 0),
        "blue" | "b" => (0, 0, 255),
        "yellow" | "y" => (255, 255, 0),
        "cyan" | "c" => (0, 255, 255),
        "magenta" | "m" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "gold" => (255, 215, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "olive" => (128, 128, 0),
        "maroon" => (128, 0, 0),
        "lime" => (0, 255, 0),
        "silver" => (192, 192, 192),
        _ => return None,
    };
    Some(RGBColor(r, g, b))
}

/// Figure colours parsed up front, so bad values fail before any drawing.
struct Colors {
    bars: Vec<RGBColor>,
    /// Fill and edge per marker.
    markers: Vec<(RGBColor, RGBColor)>,
    legend: Vec<RGBColor>,
}

impl Colors {
    fn resolve(figure: &Figure) -> Result<Self> {
        let package_color = |value: &str| {
            parse_color(value).ok_or_else(|| GanttError::validation(format!("unknown color '{}'", value)))
        };
        let style_color = |field: &str, value: &str| {
            parse_color(value).ok_or_else(|| GanttError::InvalidConfigValueError {
                field: field.to_string(),
                value: value.to_string(),
                reason: "Expected #RRGGBB, #RGB or a basic color name".to_string(),
            })
        };

        let bars = figure
            .bars
            .iter()
            .map(|bar| package_color(bar.color.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let markers = figure
            .markers
            .iter()
            .map(|marker| -> Result<(RGBColor, RGBColor)> {
                Ok((
                    style_color("milestones.fill", marker.fill.as_str())?,
                    style_color("milestones.edge", marker.edge.as_str())?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        let legend = match &figure.legend {
            Some(legend) => legend
                .entries
                .iter()
                .map(|entry| package_color(entry.color.as_str()))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            bars,
            markers,
            legend,
        })
    }
}

/// Linear axis whose key points are exactly the figure's ticks, labelled with their text.
struct TickAxis {
    scale: RangedCoordf64,
    ticks: Vec<Tick>,
}

impl TickAxis {
    fn new((lo, hi): (f64, f64), ticks: Vec<Tick>) -> Self {
        let ticks = ticks
            .into_iter()
            .filter(|tick| tick.position >= lo.min(hi) && tick.position <= lo.max(hi))
            .collect();
        Self {
            scale: (lo..hi).into(),
            ticks,
        }
    }
}

impl Ranged for TickAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.scale.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        // Ticks are major points only; no minor grid.
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.iter().map(|tick| tick.position).collect()
        }
    }

    fn range(&self) -> Range<f64> {
        self.scale.range()
    }
}

impl ValueFormatter<f64> for TickAxis {
    fn format_ext(&self, value: &f64) -> String {
        self.ticks
            .iter()
            .find(|tick| (tick.position - value).abs() < 1e-6)
            .map(|tick| tick.label.clone())
            .unwrap_or_default()
    }
}

/// Evenly spaced numeric ticks chosen by plotters.
fn numeric_ticks(lo: f64, hi: f64) -> Vec<Tick> {
    RangedCoordf64::from(lo..hi)
        .key_points(DEFAULT_X_TICKS)
        .into_iter()
        .map(|position| Tick {
            position,
            label: format!("{:.0}", position),
        })
        .collect()
}

fn widen((lo, hi): (f64, f64), pad: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - pad, hi + pad)
    } else {
        (lo, hi)
    }
}

fn font_family(mode: TextMode) -> FontFamily<'static> {
    match mode {
        TextMode::Plain => FontFamily::SansSerif,
        TextMode::Typeset => FontFamily::Serif,
    }
}

fn render_error(e: impl std::fmt::Display) -> GanttError {
    GanttError::RenderError {
        message: e.to_string(),
    }
}

fn draw_pixels(figure: &Figure, colors: &Colors) -> Result<Vec<u8>> {
    let mut pixels = vec![0u8; figure.width as usize * figure.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (figure.width, figure.height)).into_drawing_area();
        draw_figure(&root, figure, colors)?;
        root.present().map_err(render_error)?;
    }
    Ok(pixels)
}

fn draw_svg(figure: &Figure, colors: &Colors) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (figure.width, figure.height)).into_drawing_area();
        draw_figure(&root, figure, colors)?;
        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

enum Shape<'a> {
    Bar(&'a Bar, RGBColor),
    Marker(&'a Marker, (RGBColor, RGBColor)),
}

fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure, colors: &Colors) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let family = font_family(figure.text_mode);
    let label_style = TextStyle::from((family, LABEL_FONT_PX));
    let x_bounds = widen(figure.x_bounds(), 1.0);
    let y_bounds = widen(figure.y_bounds(), 0.5);

    let x_ticks = match &figure.xticks {
        Some(ticks) => ticks.clone(),
        None => numeric_ticks(x_bounds.0, x_bounds.1),
    };
    let x_axis = TickAxis::new(x_bounds, x_ticks);
    let y_axis = TickAxis::new(y_bounds, figure.yticks.clone());

    let mut y_label_width = 0;
    for tick in &y_axis.ticks {
        let (width, _) = root
            .estimate_text_size(&tick.label, &label_style)
            .map_err(render_error)?;
        y_label_width = y_label_width.max(width);
    }
    let x_label_area = match figure.xlabel {
        Some(_) => X_LABEL_AREA + 2 * LABEL_FONT_PX as u32,
        None => X_LABEL_AREA,
    };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(MARGIN)
        .x_label_area_size(x_label_area)
        .y_label_area_size(y_label_width + Y_LABEL_GAP);
    if let Some(title) = &figure.title {
        builder.caption(title, (family, TITLE_FONT_PX));
    }
    let mut chart = builder
        .build_cartesian_2d(x_axis, y_axis)
        .map_err(render_error)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.label_style(label_style.clone())
            .axis_desc_style(label_style.clone())
            .bold_line_style(GRID_COLOR.stroke_width(1))
            .axis_style(BLACK.stroke_width(1));
        if !figure.x_grid {
            mesh.disable_x_mesh();
        }
        if !figure.y_grid {
            mesh.disable_y_mesh();
        }
        // Only the bottom and left edges carry label areas.
        if !figure.tick_edges.bottom {
            mesh.set_tick_mark_size(LabelAreaPosition::Bottom, 0);
        }
        if !figure.tick_edges.left {
            mesh.set_tick_mark_size(LabelAreaPosition::Left, 0);
        }
        if let Some(xlabel) = &figure.xlabel {
            mesh.x_desc(xlabel.as_str());
        }
        mesh.draw().map_err(render_error)?;
    }

    let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
    let x_per_px = (x_bounds.1 - x_bounds.0) / f64::from((x_pixels.end - x_pixels.start).max(1));
    let y_per_px = (y_bounds.1 - y_bounds.0) / f64::from((y_pixels.end - y_pixels.start).max(1));

    let mut shapes: Vec<(u32, Shape)> = figure
        .bars
        .iter()
        .zip(colors.bars.iter())
        .map(|(bar, color)| (bar.zorder, Shape::Bar(bar, *color)))
        .chain(
            figure
                .markers
                .iter()
                .zip(colors.markers.iter())
                .map(|(marker, colors)| (marker.zorder, Shape::Marker(marker, *colors))),
        )
        .collect();
    // Stable sort keeps insertion order within a z level.
    shapes.sort_by_key(|(z, _)| *z);

    for (_, shape) in shapes {
        match shape {
            Shape::Bar(bar, color) => {
                let corners = [
                    (bar.left, bar.y - bar.height / 2.0),
                    (bar.left + bar.width, bar.y + bar.height / 2.0),
                ];
                chart
                    .draw_series(std::iter::once(Rectangle::new(corners, color.mix(bar.alpha).filled())))
                    .map_err(render_error)?;
            }
            Shape::Marker(marker, (fill, edge)) => {
                let points = marker_outline(marker, x_per_px, y_per_px);
                let mut closed = points.clone();
                closed.extend(points.first().copied());
                chart
                    .draw_series(std::iter::once(Polygon::new(points, fill.filled())))
                    .map_err(render_error)?;
                chart
                    .draw_series(std::iter::once(PathElement::new(closed, edge.stroke_width(1))))
                    .map_err(render_error)?;
            }
        }
    }

    if let Some(legend) = &figure.legend {
        draw_legend(root, legend, &colors.legend, family, (x_pixels, y_pixels))?;
    }

    Ok(())
}

/// Corner points in data units; marker size is an area in pt².
fn marker_outline(marker: &Marker, x_per_px: f64, y_per_px: f64) -> Vec<(f64, f64)> {
    let half = marker.size.max(0.0).sqrt() * PX_PER_PT / 2.0;
    let (dx, dy) = (half * x_per_px, half * y_per_px);
    match marker.shape {
        MarkerShape::Diamond => vec![
            (marker.x, marker.y + dy),
            (marker.x + dx, marker.y),
            (marker.x, marker.y - dy),
            (marker.x - dx, marker.y),
        ],
    }
}

/// Upper right corner of the plotting area, entries filled row by row.
fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    legend: &Legend,
    colors: &[RGBColor],
    family: FontFamily<'static>,
    (x_pixels, y_pixels): (Range<i32>, Range<i32>),
) -> Result<()> {
    if legend.entries.is_empty() {
        return Ok(());
    }

    let font_px = legend.font_size.points() * PX_PER_PT;
    let style = TextStyle::from((family, font_px)).pos(Pos::new(HPos::Left, VPos::Center));
    let patch_w = (2.0 * font_px) as i32;
    let patch_h = (0.7 * font_px) as i32;
    let gap = (0.8 * font_px) as i32;
    let row_h = (1.5 * font_px) as i32;
    let pad = (0.5 * font_px) as i32;

    let columns = (legend.columns.max(1) as usize).min(legend.entries.len());
    let rows = legend.entries.len().div_ceil(columns) as i32;

    let mut label_widths = Vec::with_capacity(legend.entries.len());
    for entry in &legend.entries {
        let (width, _) = root
            .estimate_text_size(&entry.label, &style)
            .map_err(render_error)?;
        label_widths.push(width as i32);
    }
    let column_widths: Vec<i32> = (0..columns)
        .map(|c| {
            label_widths
                .iter()
                .skip(c)
                .step_by(columns)
                .map(|w| patch_w + gap + w)
                .max()
                .unwrap_or(0)
        })
        .collect();

    let box_w = column_widths.iter().sum::<i32>() + gap * (columns as i32 - 1) + 2 * pad;
    let box_h = rows * row_h + 2 * pad;
    let box_x = x_pixels.end - box_w - pad;
    let box_y = y_pixels.start + pad;
    let frame = [(box_x, box_y), (box_x + box_w, box_y + box_h)];

    if legend.shadow {
        let shadow = [(box_x + 3, box_y + 3), (box_x + box_w + 3, box_y + box_h + 3)];
        root.draw(&Rectangle::new(shadow, BLACK.mix(0.3).filled()))
            .map_err(render_error)?;
    }
    if legend.frame {
        root.draw(&Rectangle::new(frame, WHITE.mix(0.8).filled()))
            .map_err(render_error)?;
        root.draw(&Rectangle::new(frame, LEGEND_FRAME_COLOR.stroke_width(1)))
            .map_err(render_error)?;
    }

    for (i, (entry, color)) in legend.entries.iter().zip(colors).enumerate() {
        let row = (i / columns) as i32;
        let col = i % columns;
        let x = box_x + pad + column_widths[..col].iter().sum::<i32>() + gap * col as i32;
        let center_y = box_y + pad + row * row_h + row_h / 2;

        let patch = [
            (x, center_y - patch_h / 2),
            (x + patch_w, center_y + patch_h / 2),
        ];
        root.draw(&Rectangle::new(patch, color.filled()))
            .map_err(render_error)?;
        root.draw(&Text::new(
            entry.label.as_str(),
            (x + patch_w + gap / 2, center_y),
            style.clone(),
        ))
        .map_err(render_error)?;
    }

    Ok(())
}

/// Pixel rectangle kept by a tight trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Crop {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

fn tight_crop(trim: Trim, pixels: &[u8], size: (u32, u32)) -> Option<Crop> {
    match trim {
        Trim::Tight => content_bounds(pixels, size),
        Trim::None => None,
    }
}

/// Smallest box around non-white RGB pixels, padded and clamped to the canvas.
fn content_bounds(pixels: &[u8], (width, height): (u32, u32)) -> Option<Crop> {
    let mut found = false;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (width, height, 0, 0);

    for (i, px) in pixels.chunks_exact(3).enumerate() {
        if px.iter().all(|&c| c == 255) {
            continue;
        }
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        found = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if !found {
        return None;
    }

    let x = min_x.saturating_sub(TIGHT_PAD);
    let y = min_y.saturating_sub(TIGHT_PAD);
    let right = (max_x + 1 + TIGHT_PAD).min(width);
    let bottom = (max_y + 1 + TIGHT_PAD).min(height);
    Some(Crop {
        x,
        y,
        width: right - x,
        height: bottom - y,
    })
}

fn encode_png(pixels: &[u8], (width, height): (u32, u32), crop: Option<Crop>) -> Result<Vec<u8>> {
    let crop = crop.unwrap_or(Crop {
        x: 0,
        y: 0,
        width,
        height,
    });

    let row_len = width as usize * 3;
    let start = crop.x as usize * 3;
    let end = start + crop.width as usize * 3;
    let mut data = Vec::with_capacity(crop.width as usize * crop.height as usize * 3);
    for row in pixels
        .chunks_exact(row_len)
        .skip(crop.y as usize)
        .take(crop.height as usize)
    {
        data.extend_from_slice(&row[start..end]);
    }

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&data, crop.width, crop.height, ExtendedColorType::Rgb8)
        .map_err(render_error)?;
    Ok(out)
}

/// Narrows the root `<svg>` element to `crop`.
fn set_view_box(svg: String, (width, height): (u32, u32), crop: Crop) -> String {
    let full = format!(
        "width=\"{0}\" height=\"{1}\" viewBox=\"0 0 {0} {1}\"",
        width, height
    );
    let cropped = format!(
        "width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\"",
        crop.width, crop.height, crop.x, crop.y, crop.width, crop.height
    );
    svg.replacen(&full, &cropped, 1)
}
