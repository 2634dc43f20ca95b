pub mod config;
pub mod error;
pub mod reader;
pub mod render;

pub use config::{IoConfig, OutputFormat};
pub use error::IoError;
pub use reader::{read_grid, read_grid_from_reader};
pub use render::{render, render_json, render_table};

use std::path::Path;

/// Write rendered results to `path`, replacing any existing file.
pub fn write_output(path: impl AsRef<Path>, contents: &str) -> Result<(), IoError> {
    let path = path.as_ref();

    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), bytes = contents.len(), "writing results");

    std::fs::write(path, contents).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}
