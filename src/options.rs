//! Configuration options for the local filesystem backend.
//!
//! This module provides [`LocalOptions`], fixed when a
//! [`LocalDestination`](crate::LocalDestination) is opened.
//!
//! # Example
//!
//! ```
//! use fancopy::LocalOptions;
//!
//! let options = LocalOptions::default()
//!     .with_file_mode(0o640)
//!     .with_dir_mode(0o750)
//!     .without_fsync();
//! assert_eq!(options.file_mode, 0o640);
//! ```

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default permission bits for written files.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Default permission bits for created directories.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Options for a local destination.
///
/// # Default Values
///
/// | Field | Default | Query key |
/// |-------|---------|-----------|
/// | `file_mode` | `0o644` | `file_mode` |
/// | `dir_mode` | `0o755` | `dir_mode` |
/// | `fsync` | `true` | `fsync` |
/// | `scratch_dir` | `None` (next to the destination) | `scratch` |
///
/// Query keys are read from the configuration URI, e.g.
/// `local:///srv/mirror?file_mode=0600&fsync=false`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalOptions {
    /// Permission bits applied to every written file (default: 0o644)
    pub file_mode: u32,

    /// Permission bits for directories created on demand (default: 0o755)
    ///
    /// Subject to the process umask, like `mkdir -p`.
    pub dir_mode: u32,

    /// Whether to sync file data to disk before the rename (default: true)
    pub fsync: bool,

    /// Where temporary files are created (default: None)
    ///
    /// `None` creates them next to the destination, which keeps the final
    /// rename on one filesystem. A directory on another filesystem makes
    /// every write fail with [`Error::Persist`].
    pub scratch_dir: Option<PathBuf>,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            fsync: true,
            scratch_dir: None,
            warn_handler: None,
        }
    }
}

impl LocalOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Set the permission bits of written files
    ///
    /// Only the lower 12 bits are kept.
    #[must_use]
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode & 0o7777;
        self
    }

    /// Set the permission bits of created directories
    #[must_use]
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode & 0o7777;
        self
    }

    /// Disable fsync for faster (but less durable) writes
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Create temporary files in `dir` instead of next to the destination
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Apply one configuration URI query parameter.
    ///
    /// Unknown keys are reported through [`warn`](Self::warn) and ignored.
    pub(crate) fn apply_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "file_mode" => self.file_mode = parse_mode(key, value)?,
            "dir_mode" => self.dir_mode = parse_mode(key, value)?,
            "fsync" => {
                self.fsync = match value {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => return Err(invalid_option(key, value)),
                }
            }
            "scratch" => {
                if value.is_empty() {
                    return Err(invalid_option(key, value));
                }
                self.scratch_dir = Some(PathBuf::from(value));
            }
            _ => self.warn(&format!("Ignoring unknown option {key}={value}")),
        }
        Ok(())
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}

/// Parse an octal permission string such as `644`, `0644` or `0o644`.
fn parse_mode(key: &str, value: &str) -> Result<u32> {
    let digits = value.strip_prefix("0o").unwrap_or(value);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if !digits.is_empty() && mode <= 0o7777 => Ok(mode),
        _ => Err(invalid_option(key, value)),
    }
}

fn invalid_option(key: &str, value: &str) -> Error {
    Error::InvalidOption {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}
