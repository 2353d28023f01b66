//! Chart rendering entry point.

use crate::error::RenderError;
use crate::html::HtmlRenderer;
use crate::sankey::SankeyData;
use crate::svg::SvgRenderer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use earnviz_model::FlowGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output format of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    /// Static SVG image.
    #[default]
    Svg,
    /// Interactive HTML page.
    Html,
}

impl ChartFormat {
    /// File extension for this format.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
        }
    }

    /// MIME type for this format.
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Html => "text/html",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChartFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Space reserved around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    /// Top margin (holds the title).
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
}

/// Page geometry and typography shared by all renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Chart width in pixels.
    pub width: f64,
    /// Chart height in pixels.
    pub height: f64,
    /// Margins around the plot area.
    pub margin: Margin,
    /// Node bar thickness in pixels.
    pub node_thickness: f64,
    /// Minimum vertical gap between nodes, in pixels.
    pub node_pad: f64,
    /// Font family for all text.
    pub font_family: String,
    /// Node label font size.
    pub label_size: f64,
    /// Base font size (title is drawn slightly larger).
    pub font_size: f64,
}

impl ChartLayout {
    /// Width of the plot area.
    pub fn plot_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of the plot area.
    pub fn plot_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin: Margin {
                top: 50.0,
                bottom: 20.0,
                left: 20.0,
                right: 20.0,
            },
            node_thickness: 20.0,
            node_pad: 200.0,
            font_family: "Arial, sans-serif".to_string(),
            label_size: 16.0,
            font_size: 15.0,
        }
    }
}

/// Turns Sankey arrays into a chart document.
pub trait ChartRenderer {
    /// Format this renderer produces.
    fn format(&self) -> ChartFormat;

    /// Render a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be encoded.
    fn render(&self, data: &SankeyData, title: &str) -> Result<Vec<u8>, RenderError>;
}

/// The default renderer for a format.
pub fn renderer_for(format: ChartFormat) -> Box<dyn ChartRenderer> {
    match format {
        ChartFormat::Svg => Box::new(SvgRenderer::default()),
        ChartFormat::Html => Box::new(HtmlRenderer::default()),
    }
}

/// Where a rendered chart goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write to a file. Without an explicit format the extension decides.
    File {
        /// Output path.
        path: PathBuf,
        /// Explicit format, overriding the extension.
        format: Option<ChartFormat>,
    },
    /// Keep the bytes in memory.
    Memory(ChartFormat),
}

impl Destination {
    /// A file destination whose format follows the extension.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            format: None,
        }
    }

    /// A file destination with an explicit format.
    pub fn file_as(path: impl Into<PathBuf>, format: ChartFormat) -> Self {
        Self::File {
            path: path.into(),
            format: Some(format),
        }
    }

    /// Resolved output format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFormat`] for a file destination with
    /// neither an explicit format nor a known extension.
    pub fn format(&self) -> Result<ChartFormat, RenderError> {
        match self {
            Self::Memory(format) | Self::File { format: Some(format), .. } => Ok(*format),
            Self::File { path, format: None } => ChartFormat::from_path(path)
                .ok_or_else(|| RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Format of the bytes.
    pub format: ChartFormat,
    /// File the chart was written to, if any.
    pub path: Option<PathBuf>,
    /// Chart document.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Encode the chart as a `data:` URI for embedding in a page.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Render a flow graph to a destination.
///
/// # Errors
///
/// Fails on a malformed graph, an unknown file format, or an unwritable
/// destination. Nothing is written on failure.
pub fn render(
    graph: &FlowGraph,
    title: &str,
    destination: &Destination,
) -> Result<Artifact, RenderError> {
    let renderer = renderer_for(destination.format()?);
    let format = renderer.format();
    let data = SankeyData::from_graph(graph)?;
    let bytes = renderer.render(&data, title)?;

    let path = match destination {
        Destination::File { path, .. } => {
            std::fs::write(path, &bytes)?;
            tracing::info!(path = %path.display(), %format, bytes = bytes.len(), "wrote chart");
            Some(path.clone())
        }
        Destination::Memory(_) => {
            tracing::debug!(%format, bytes = bytes.len(), "rendered chart");
            None
        }
    };

    Ok(Artifact {
        format,
        path,
        bytes,
    })
}
