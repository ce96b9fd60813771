//! # msgbind Common
//!
//! Shared error types, logging setup and small utilities used across all
//! crates in the msgbind workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod macros;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{BoxError, MsgBindError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LogFormat, LoggingConfig};
pub use utils::{quote, truncate_display};
