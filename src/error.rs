//! Error types for fancopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur while opening backends and replicating an item, the
//! [`Result`] type alias, and the stable [`ErrorCode`] used by tooling.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Configuration | [`Error::NoDestinations`], [`Error::InvalidUri`], [`Error::UnknownScheme`], [`Error::RootNotFound`], [`Error::NotADirectory`], [`Error::InvalidOption`] |
//! | Source | [`Error::Read`] |
//! | Destination | [`Error::Io`], [`Error::TempFile`], [`Error::Permissions`], [`Error::CreateDir`], [`Error::Persist`], [`Error::InvalidPath`] |
//! | Control | [`Error::Cancelled`], [`Error::WorkerLost`], [`Error::WorkerPool`] |

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fancopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// This helper function detects storage-full conditions across platforms.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` (errno 28) |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```
/// use std::io;
/// use fancopy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        // The raw OS error might be available even if kind() isn't StorageFull
        if let Some(raw_error) = error.raw_os_error() {
            const ENOSPC: i32 = 28;
            return raw_error == ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Stable, machine-readable classification of an [`Error`].
///
/// Used by the `fcp` JSON output; the string forms never change between
/// releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Bad configuration: missing destinations, bad URI, bad root
    InvalidInput,
    /// The source could not be read
    SourceRead,
    /// Destination storage is full
    NoSpace,
    /// Permission denied while writing
    PermissionDenied,
    /// Any other IO failure on the destination side
    IoError,
    /// The operation was cancelled
    Cancelled,
    /// Internal failure (lost worker)
    Internal,
}

impl ErrorCode {
    /// The stable string form of this code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::SourceRead => "source_read",
            Self::NoSpace => "no_space",
            Self::PermissionDenied => "permission_denied",
            Self::IoError => "io_error",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while opening backends or replicating an item.
///
/// Destination errors are returned by [`Copier::copy`](crate::Copier::copy)
/// exactly as the failing destination produced them.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A copier was configured without any destination
    #[error("No destinations configured")]
    NoDestinations,

    /// A backend URI could not be parsed or is not usable
    #[error("Invalid URI {uri}: {reason}")]
    InvalidUri {
        /// The offending URI
        uri: String,
        /// Why it was rejected
        reason: String,
    },

    /// No backend is registered for the URI scheme
    #[error("No backend registered for scheme: {0}")]
    UnknownScheme(String),

    /// Configured root directory does not exist
    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    /// Configured root is not a directory
    #[error("Root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A configuration parameter has an unusable value
    #[error("Invalid value for option {key}: {value}")]
    InvalidOption {
        /// Parameter name
        key: String,
        /// Rejected value
        value: String,
    },

    /// Failed to read the item from the source
    #[error("Failed to read {uri}: {source}")]
    Read {
        /// The item URI
        uri: String,
        /// Underlying error
        source: io::Error,
    },

    /// IO error while streaming content
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Relative path does not name a file
    #[error("Path does not name a file: {0}")]
    InvalidPath(String),

    /// Failed to create temporary file
    #[error("Failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to set permission bits on the written file
    #[error("Failed to set permissions on {path}: {source}")]
    Permissions {
        /// File whose mode could not be set
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create the destination's parent directory
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to persist temporary file
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Operation was cancelled through its [`CancelScope`](crate::CancelScope)
    #[error("Operation cancelled")]
    Cancelled,

    /// A write task went away without reporting an outcome
    #[error("Write task exited without reporting an outcome")]
    WorkerLost,

    /// The write workers could not be started
    #[error("Failed to start write workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Classify this error into a stable [`ErrorCode`].
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoDestinations
            | Self::InvalidUri { .. }
            | Self::UnknownScheme(_)
            | Self::RootNotFound(_)
            | Self::NotADirectory(_)
            | Self::InvalidOption { .. }
            | Self::InvalidPath(_) => ErrorCode::InvalidInput,
            Self::Read { .. } => ErrorCode::SourceRead,
            Self::Io(source)
            | Self::TempFile { source, .. }
            | Self::Permissions { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Persist { source, .. } => io_error_code(source),
            Self::Cancelled => ErrorCode::Cancelled,
            Self::WorkerLost | Self::WorkerPool(_) => ErrorCode::Internal,
        }
    }
}

fn io_error_code(error: &io::Error) -> ErrorCode {
    if is_no_space_error(error) {
        return ErrorCode::NoSpace;
    }
    if error.kind() == io::ErrorKind::PermissionDenied {
        return ErrorCode::PermissionDenied;
    }
    ErrorCode::IoError
}
