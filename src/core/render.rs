use crate::core::layout::ProcessedChart;
use crate::domain::figure::{
    Bar, Figure, FontSize, Legend, LegendEntry, Marker, MarkerShape, TextMode, Tick, TickEdges,
};

/// Visual settings for the render phase.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub bar_height: f64,
    pub bar_alpha: f64,
    pub milestone_size: f64,
    pub milestone_fill: String,
    pub milestone_edge: String,
    pub legend_columns: u32,
    pub legend_font_size: FontSize,
    pub text_mode: TextMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            bar_height: 0.5,
            bar_alpha: 1.0,
            milestone_size: 120.0,
            milestone_fill: "yellow".to_string(),
            milestone_edge: "black".to_string(),
            legend_columns: 3,
            legend_font_size: FontSize::Medium,
            text_mode: TextMode::Plain,
        }
    }
}

const BAR_ZORDER: u32 = 1;
const MILESTONE_ZORDER: u32 = 3;

/// Runs every drawing step in order.
pub fn render(chart: &ProcessedChart, options: &RenderOptions) -> Figure {
    let figure = init_figure(chart, options);
    let figure = draw_bars(figure, chart, options);
    let figure = format_axes(figure, chart);
    let figure = add_milestones(figure, chart, options);
    add_legend(figure, chart, options)
}

pub fn init_figure(chart: &ProcessedChart, options: &RenderOptions) -> Figure {
    let mut figure = Figure::new(options.width, options.height);
    figure.title = Some(chart.title.clone());
    figure.x_grid = true;
    figure.y_grid = false;
    figure.text_mode = options.text_mode;
    figure
}

pub fn draw_bars(mut figure: Figure, chart: &ProcessedChart, options: &RenderOptions) -> Figure {
    figure.bars.extend(chart.rows.iter().map(|row| Bar {
        y: f64::from(row.slot),
        left: row.start_ordinal as f64,
        width: row.duration_days as f64,
        height: options.bar_height,
        color: row.color.clone(),
        alpha: options.bar_alpha,
        label: None,
        zorder: BAR_ZORDER,
    }));
    figure
}

pub fn format_axes(mut figure: Figure, chart: &ProcessedChart) -> Figure {
    figure.tick_edges = TickEdges {
        bottom: true,
        top: false,
        left: false,
        right: false,
    };

    let (lo, hi) = chart.x_range();
    figure.xlim = Some((lo as f64, hi as f64));
    figure.ylim = Some(chart.y_range());

    figure.yticks = chart
        .rows
        .iter()
        .map(|row| Tick {
            position: f64::from(row.slot),
            label: row.label.clone(),
        })
        .collect();

    if !chart.xlabel.is_empty() {
        figure.xlabel = Some(chart.xlabel.clone());
    }

    if !chart.xticks.is_empty() {
        figure.xticks = Some(
            chart
                .xticks
                .iter()
                .map(|tick| Tick {
                    position: tick.date.ordinal() as f64,
                    label: tick.label.clone(),
                })
                .collect(),
        );
    }

    figure
}

pub fn add_milestones(mut figure: Figure, chart: &ProcessedChart, options: &RenderOptions) -> Figure {
    if chart.milestones.is_empty() {
        return figure;
    }

    figure.markers.extend(chart.milestones.iter().map(|point| Marker {
        x: point.ordinal as f64,
        y: f64::from(point.slot),
        size: options.milestone_size,
        shape: MarkerShape::Diamond,
        fill: options.milestone_fill.clone(),
        edge: options.milestone_edge.clone(),
        zorder: MILESTONE_ZORDER,
    }));
    figure
}

pub fn add_legend(mut figure: Figure, chart: &ProcessedChart, options: &RenderOptions) -> Figure {
    let mut entries = Vec::new();
    for (row, bar) in chart.rows.iter().zip(figure.bars.iter_mut()) {
        if let Some(legend) = row.legend.as_deref().filter(|l| !l.is_empty()) {
            bar.label = Some(legend.to_string());
            entries.push(LegendEntry {
                label: legend.to_string(),
                color: row.color.clone(),
            });
        }
    }

    if !entries.is_empty() {
        figure.legend = Some(Legend {
            entries,
            columns: options.legend_columns,
            font_size: options.legend_font_size,
            shadow: false,
            frame: false,
        });
    }

    figure
}
