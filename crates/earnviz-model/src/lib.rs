#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnviz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
pub mod money;
pub mod report;

pub use error::ReportError;
pub use graph::{Edge, FlowGraph, Node, NodeKey, Position, Tone, assemble_graph};
pub use money::Unit;
pub use report::{EarningsReport, FinancialFields, FinancialFieldsBuilder, OpexItem, build_report};
