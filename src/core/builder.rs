use crate::config::style::DEFAULT_OUTPUT_PATH;
use crate::core::document::LoadedChart;
use crate::core::layout::ProcessedChart;
use crate::core::render::{self, RenderOptions};
use crate::domain::figure::Figure;
use crate::domain::ports::{ImageFormat, Renderer, Storage, Trim, Viewer};
use crate::utils::error::Result;
use crate::utils::validation;
use std::path::PathBuf;

/// Where the finished chart goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Show,
    /// `None` saves to the default path.
    Save(Option<PathBuf>),
}

/// Runs Load, Process, Render and then Show or Save, in that order.
pub struct ChartBuilder<S: Storage, R: Renderer> {
    storage: S,
    renderer: R,
    options: RenderOptions,
}

impl<S: Storage, R: Renderer> ChartBuilder<S, R> {
    pub fn new(storage: S, renderer: R, options: RenderOptions) -> Self {
        Self {
            storage,
            renderer,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn load(&self, data_path: &str) -> Result<LoadedChart> {
        tracing::info!("📥 Loading chart data from {}", data_path);
        let chart = LoadedChart::from_file(&self.storage, data_path)?;
        tracing::info!("Loaded {} work packages", chart.len());
        Ok(chart)
    }

    pub fn process(&self, chart: LoadedChart) -> ProcessedChart {
        tracing::debug!("Processing chart '{}'", chart.title);
        chart.process()
    }

    pub fn render(&self, chart: &ProcessedChart) -> Figure {
        tracing::debug!("Rendering {} bars", chart.len());
        render::render(chart, &self.options)
    }

    /// Loads, processes and renders the chart in `data_path`.
    pub fn build(&self, data_path: &str) -> Result<Figure> {
        let loaded = self.load(data_path)?;
        let processed = self.process(loaded);
        Ok(self.render(&processed))
    }

    /// Writes the chart cropped to its content and returns the path written.
    /// The extension picks the image format.
    pub fn save(&self, figure: &Figure, path: Option<&str>) -> Result<String> {
        let path = path.unwrap_or(DEFAULT_OUTPUT_PATH);
        validation::validate_path("output", path)?;
        let format = ImageFormat::from_path("output", path)?;

        let image = self.renderer.render(figure, format, Trim::Tight)?;
        self.storage.write_file(path, &image)?;
        tracing::info!("💾 Chart saved to {}", path);
        Ok(path.to_string())
    }

    pub fn show<V: Viewer>(&self, figure: &Figure, viewer: &V) -> Result<()> {
        let format = ImageFormat::Png;
        let image = self.renderer.render(figure, format, Trim::None)?;
        viewer.show(&image, format.extension())
    }

    /// Full run; returns the saved path when saving.
    pub fn run<V: Viewer>(&self, data_path: &str, output: &Output, viewer: &V) -> Result<Option<String>> {
        let figure = self.build(data_path)?;

        match output {
            Output::Show => {
                self.show(&figure, viewer)?;
                Ok(None)
            }
            Output::Save(path) => {
                let path = path.as_ref().map(|p| p.to_string_lossy().to_string());
                self.save(&figure, path.as_deref()).map(Some)
            }
        }
    }
}
