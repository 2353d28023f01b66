//! Rendering errors.

use earnviz_model::NodeKey;
use thiserror::Error;

/// Errors that can occur while turning a graph into a chart.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The graph has no nodes
    #[error("Cannot render an empty graph")]
    EmptyGraph,

    /// An edge endpoint is not a node of the graph
    #[error("Edge {from:?} -> {to:?} references a node missing from the graph")]
    DanglingEdge {
        /// Edge source
        from: NodeKey,
        /// Edge target
        to: NodeKey,
    },

    /// The chart format could not be determined or is not supported
    #[error("Unsupported chart format: {0}")]
    UnsupportedFormat(String),

    /// Chart document could not be written
    #[error("Chart encoding error: {0}")]
    Encoding(#[from] std::fmt::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
