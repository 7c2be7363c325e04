//! Plain-text persistence of search results

use std::fs;
use std::path::Path;

use crate::error::PersistenceError;

/// Write `text` to `destination`, creating parent directories as needed
pub fn save(text: &str, destination: &Path) -> Result<(), PersistenceError> {
    let wrap = |source| PersistenceError {
        path: destination.to_path_buf(),
        source,
    };

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(destination, text).map_err(wrap)?;

    tracing::debug!(path = %destination.display(), bytes = text.len(), "Result saved");
    Ok(())
}
