//! Backend independent description of a chart surface.
//!
//! Drawing steps take a [`Figure`] by value and hand it back, so each chart owns
//! its own drawing state. Renderers turn the finished figure into image bytes.

use serde::{Deserialize, Serialize};

/// How text is typeset in the rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Plain,
    /// TeX-style serif typesetting, used when a TeX installation is present.
    Typeset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn points(&self) -> f64 {
        match self {
            FontSize::Small => 8.33,
            FontSize::Medium => 10.0,
            FontSize::Large => 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Diamond,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Vertical centre of the bar in data units.
    pub y: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub alpha: f64,
    pub label: Option<String>,
    pub zorder: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// Marker area in points squared.
    pub size: f64,
    pub shape: MarkerShape,
    pub fill: String,
    pub edge: String,
    pub zorder: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEdges {
    pub bottom: bool,
    pub top: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for TickEdges {
    fn default() -> Self {
        Self {
            bottom: true,
            top: true,
            left: true,
            right: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub columns: u32,
    pub font_size: FontSize,
    pub shadow: bool,
    pub frame: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    /// Grid lines at x tick positions.
    pub x_grid: bool,
    /// Grid lines at y tick positions.
    pub y_grid: bool,
    pub bars: Vec<Bar>,
    pub markers: Vec<Marker>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    /// `None` lets the renderer choose numeric ticks.
    pub xticks: Option<Vec<Tick>>,
    pub yticks: Vec<Tick>,
    pub tick_edges: TickEdges,
    pub legend: Option<Legend>,
    pub text_mode: TextMode,
    pub width: u32,
    pub height: u32,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Data x range: explicit limits, otherwise the extent of the bars.
    pub fn x_bounds(&self) -> (f64, f64) {
        if let Some(lim) = self.xlim {
            return lim;
        }
        let lo = self.bars.iter().map(|b| b.left).fold(f64::INFINITY, f64::min);
        let hi = self
            .bars
            .iter()
            .map(|b| b.left + b.width)
            .fold(f64::NEG_INFINITY, f64::max);
        if lo.is_finite() && hi.is_finite() {
            (lo, hi)
        } else {
            (0.0, 1.0)
        }
    }

    pub fn y_bounds(&self) -> (f64, f64) {
        self.ylim
            .unwrap_or((0.5, self.bars.len() as f64 + 0.5))
    }
}
