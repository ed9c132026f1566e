use std::path::PathBuf;

use tracing::warn;

/// Fixed page resources served from the configured pages directory.
///
/// A missing or unreadable file degrades to an empty body; the server keeps
/// answering rather than failing the connection.
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Reads a page by file name, returning empty bytes when unavailable.
    pub fn load(&self, name: &str) -> Vec<u8> {
        match std::fs::read(self.root.join(name)) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(page = name, error = %e, "Failed to read page");
                Vec::new()
            }
        }
    }
}
