//! Errors for the earnviz binary.

use earnviz::PipelineError;
use earnviz_data::DataError;
use std::io;
use thiserror::Error;

/// Errors from configuration, the CLI and the web form.
#[derive(Debug, Error)]
pub enum ServerError {
    /// An environment variable or flag held an unusable value.
    #[error("Invalid {name}: {value:?} ({reason})")]
    InvalidConfig {
        /// Variable or flag name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The provider could not be built.
    #[error("Provider setup failed: {0}")]
    Provider(#[source] DataError),

    /// Fetching or rendering a chart failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Exporting a summary failed.
    #[error(transparent)]
    Export(#[from] earnviz_output::ExportError),

    /// Binding or serving failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for the binary.
pub type Result<T> = std::result::Result<T, ServerError>;
