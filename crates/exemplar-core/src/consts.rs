//! Reserved names used by the injector and its commands
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

/// Key under which the data root is stored
pub const TOP: &str = "$TOP";

/// Store key holding the shared error list
pub const ERRS: &str = "$ERRS";

/// Spec key naming the element field that supplies a key
pub const KEY_SPEC: &str = "`$KEY`";

/// Spec key carrying per-node metadata
pub const META: &str = "`$META`";

/// Spec key that opens a validation shape to undeclared keys
pub const OPEN: &str = "`$OPEN`";

/// Metadata field holding the originating key
pub const KEY: &str = "KEY";

/// Command sigil
pub const SIGIL: char = '$';

/// Path separator
pub const DOT: char = '.';

/// Reference delimiter
pub const BACKTICK: &str = "`";
