//! Readers for translations declared as resource references

use std::io;

/// Supplies raw text for URL and internal-path translation sources
pub trait ResourceReader: Send + Sync {
    /// Read the text behind a URL
    fn read_url(&self, url: &str) -> io::Result<String>;

    /// Read the text at a path relative to the resource root
    fn read_internal(&self, path: &str) -> io::Result<String>;
}

/// A reader that cannot read anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResources;

impl ResourceReader for NoResources {
    fn read_url(&self, url: &str) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no resource reader configured for '{url}'"),
        ))
    }

    fn read_internal(&self, path: &str) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no resource reader configured for '{path}'"),
        ))
    }
}
