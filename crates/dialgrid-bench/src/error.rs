use std::path::PathBuf;

use dialgrid_core::GridError;
use thiserror::Error;

/// Errors raised while reading map and scenario files. Line numbers are
/// 1-based.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `{expected}`, found `{found}`")]
    Header {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("unsupported map type `{0}`")]
    MapType(String),
    #[error("map data ends after {found} of {expected} cells")]
    Truncated { expected: usize, found: usize },
    #[error("unsupported scenario version `{0}`")]
    Version(String),
    #[error("line {line}: {reason}")]
    Experiment { line: usize, reason: String },
    #[error(transparent)]
    Grid(#[from] GridError),
}
