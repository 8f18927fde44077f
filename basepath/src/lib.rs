//! Lexical guard for joining untrusted relative paths onto a trusted base directory.
//!
//! A relative path is rejected as soon as one of its `..` segments would climb
//! above the base, even when later segments climb back down. That also stops
//! callers from probing for directories outside the base with paths such as
//! `../some/sensitive/dir/../../../base/file`.

pub mod config;
pub mod errors;
pub mod fs;
pub mod path;
pub mod scan;

pub use config::{BasepathConfig, Separators};
pub use errors::{ConfigError, FsError, SandboxViolation};
pub use fs::{FileEntry, SandboxedFs};
pub use path::{combine, escapes_base, Basepath};
pub use scan::Segment;
