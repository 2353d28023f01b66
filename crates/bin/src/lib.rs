//! Command-line interface and web form for earnviz.
//!
//! The `earnviz` binary renders charts and summaries from the terminal and
//! serves a one-field web form. This library half holds what the binary and
//! its tests share: configuration, logging setup and the axum router.

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnviz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod server;

pub use config::Config;
pub use error::{Result, ServerError};
pub use logging::{LogFormat, init_tracing};
pub use server::{AppState, app_router, serve};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
