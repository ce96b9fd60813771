//! # msgbind Config
//!
//! Declarative message configuration for msgbind.
//!
//! This crate loads YAML or TOML files describing modules, annotation
//! bindings, bundles and interface declarations, validates them, and turns
//! them into a configured context held behind a lock-free, reloadable
//! shared handle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod module;
pub mod schema;
pub mod shared;
pub mod validation;

pub use loader::*;
pub use module::*;
pub use schema::*;
pub use shared::*;
pub use validation::*;
