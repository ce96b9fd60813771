//! Reading URL and internal translation sources from the file system

use msgbind_core::ResourceReader;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use url::Url;

/// Reads `file:` URLs and paths relative to a resource directory
#[derive(Debug, Clone)]
pub struct FsResourceReader {
    base_dir: PathBuf,
}

impl FsResourceReader {
    /// Create a reader resolving internal paths under `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory internal paths are resolved against
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn internal_path(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("resource path '{path}' leaves the resource directory"),
            ));
        }
        Ok(self.base_dir.join(relative))
    }
}

impl ResourceReader for FsResourceReader {
    fn read_url(&self, url: &str) -> io::Result<String> {
        let parsed = Url::parse(url).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        if parsed.scheme() != "file" {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported URL scheme '{}'", parsed.scheme()),
            ));
        }
        let path = parsed
            .to_file_path()
            .map_err(|()| io::Error::new(io::ErrorKind::InvalidInput, format!("'{url}' is not a local file")))?;

        debug!(path = %path.display(), "Reading translation from URL");
        std::fs::read_to_string(path)
    }

    fn read_internal(&self, path: &str) -> io::Result<String> {
        let full = self.internal_path(path)?;
        debug!(path = %full.display(), "Reading internal translation");
        std::fs::read_to_string(full)
    }
}
