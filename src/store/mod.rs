pub mod loader;
pub mod sink;

pub use loader::*;
pub use sink::*;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading notes or persisting results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Data directory not found: {0}")]
    MissingDataDir(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
