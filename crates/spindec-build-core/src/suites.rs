//! Test and example suite entry points
//!
//! Both only locate their directory for now; runners plug in here.

use crate::config::BuildConfig;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    Tests,
    Examples,
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteKind::Tests => f.write_str("test"),
            SuiteKind::Examples => f.write_str("example"),
        }
    }
}

/// Resolve the directory of `kind`. A missing directory is logged, not fatal.
pub fn locate_suite(config: &BuildConfig, kind: SuiteKind) -> PathBuf {
    let dir = match kind {
        SuiteKind::Tests => config.tests_path(),
        SuiteKind::Examples => config.examples_path(),
    };

    if dir.is_dir() {
        info!("Using {} directory {:?}", kind, dir);
    } else {
        warn!("{} directory {:?} does not exist", kind, dir);
    }
    dir
}
