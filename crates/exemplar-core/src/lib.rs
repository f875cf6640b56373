//! Exemplar Core - data transformation and validation by example
//!
//! Specs are ordinary JSON-shaped values. Backtick references inside
//! strings are resolved against a store of data and `$`-commands, so a
//! spec reads like the output it produces.
//!
//! # Main Components
//!
//! - **Values**: A shared, mutable JSON-like tree with function leaves
//! - **Helpers**: Total property access, type names, stringification and escaping
//! - **Paths**: Dotted path lookup with relative and escaped segments
//! - **Merge**: Deep, last-wins merging of maps and lists
//! - **Injection**: Resolution of references across a whole spec tree
//! - **Transform**: Injection over data with the transform commands
//! - **Validate**: Shape checking with defaults and error collection
//!
//! # Example
//!
//! ```
//! use exemplar_core::{transform, Value};
//! use serde_json::json;
//!
//! let data = Value::from(json!({"user": {"name": "Ada"}}));
//! let spec = Value::from(json!({"greeting": "Hello `user.name`"}));
//! let out = transform(&data, &spec).unwrap();
//! assert_eq!(out.to_json(), json!({"greeting": "Hello Ada"}));
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod accessors;
pub mod consts;
pub mod error;
pub mod inject;
pub mod merge;
pub mod path;
pub mod text;
pub mod transform;
pub mod validate;
pub mod value;
pub mod walk;

// Re-export the operations for convenience
pub use accessors::{
    clone, get_prop, has_key, is_empty, is_func, is_key, is_list, is_map, is_node, items,
    keys_of, set_prop, str_key, typify, Key,
};
pub use error::{Error, Result};
pub use inject::{inject, inject_with, InjectMode, Injection, Modify};
pub use merge::{merge, merge_list};
pub use path::{get_path, get_path_state, PathSpec};
pub use text::{esc_re, esc_url, join_url, pathify, pathify_parts, stringify};
pub use transform::{transform, transform_with};
pub use validate::{validate, validate_collect, validate_with};
pub use value::{Command, Value};
pub use walk::{walk, walk_from};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
