//! Command handlers for CLI subcommands
//!
//! Each handler loads its input documents, runs one engine operation and
//! writes the result through the [`OutputWriter`](crate::output::OutputWriter).

mod config;
mod get_path;
mod merge;
mod transform;
mod utils;
mod validate;

pub use config::handle_config;
pub use get_path::handle_get_path;
pub use merge::handle_merge;
pub use transform::{handle_inject, handle_transform};
pub use validate::handle_validate;
