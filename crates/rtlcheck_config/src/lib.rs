//! Parsing and validation of `rtlcheck.toml` session files.
//!
//! A session file names the design kind with its width and capacity
//! parameters, the clock periods, the checking policy, and the random
//! stimulus mix. The result is an immutable [`SessionConfig`] handed by
//! reference to every component.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME, MAX_CAPACITY,
};
pub use types::*;
