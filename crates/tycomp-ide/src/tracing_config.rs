//! Tracing subscriber setup for embedders and tests.
//!
//! Nothing is installed unless `TYCOMP_LOG` or `RUST_LOG` is set.
//!
//! - `TYCOMP_LOG`: filter directives, e.g. `tycomp_solver=trace`
//! - `RUST_LOG`: used when `TYCOMP_LOG` is unset
//! - `TYCOMP_LOG_FORMAT`: `text` (default), `tree` or `json`
//!
//! `tree` renders span nesting, which is the readable way to follow a
//! solve through its disjunctions.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("TYCOMP_LOG_FORMAT").as_deref() {
            Ok("tree") => LogFormat::Tree,
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var("TYCOMP_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install a global subscriber according to the environment. Does nothing
/// when no filter variable is set or a subscriber is already installed.
pub fn init_tracing() {
    if std::env::var_os("TYCOMP_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            let _ = Registry::default().with(filter).with(layer).try_init();
        }
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            let _ = Registry::default().with(filter).with(layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
