#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnviz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod format;
pub mod html;
pub mod render;
pub mod sankey;
pub mod summary;
pub mod svg;

pub use error::RenderError;
pub use export::{ExportError, ExportFormat, Exporter};
pub use format::{escape_markup, format_dollar_amount};
pub use html::HtmlRenderer;
pub use render::{
    Artifact, ChartFormat, ChartLayout, ChartRenderer, Destination, Margin, render, renderer_for,
};
pub use sankey::SankeyData;
pub use summary::{IncomeSummary, SummaryLine};
pub use svg::SvgRenderer;
