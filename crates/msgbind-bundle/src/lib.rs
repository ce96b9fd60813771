//! # msgbind Bundle
//!
//! File-system backed translation sources for msgbind:
//!
//! - `.properties` resource bundles with locale fallback
//! - In-memory bundles for tests and embedded catalogs
//! - A resource reader for `file:` URLs and internal paths

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod memory;
pub mod properties;
pub mod resource;

pub use loader::{PropertiesBundleLoader, BUNDLE_EXTENSION};
pub use memory::MapBundleLoader;
pub use resource::FsResourceReader;
