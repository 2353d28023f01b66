#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnviz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use earnviz_data as data;
pub use earnviz_model as model;
pub use earnviz_output as output;

pub use pipeline::{
    Chart, PipelineError, Quarter, chart_for_quarter, chart_for_ticker, chart_title,
    quarter_for_ticker,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
