//! Backend contracts.
//!
//! A backend serves as a [`Source`], a [`Destination`], or both. Each backend
//! is its own type implementing the trait; the [`Registry`](crate::Registry)
//! maps URI schemes to the constructors.

use crate::error::Result;
use crate::scope::CancelScope;
use std::io::Read;

/// Something an item can be read from.
pub trait Source: Send + Sync {
    /// Open and configure a source from its configuration URI.
    fn open(scope: &CancelScope, config_uri: &str) -> Result<Self>
    where
        Self: Sized;

    /// Open a byte stream for the item addressed by `uri`.
    fn read(&self, scope: &CancelScope, uri: &str) -> Result<Box<dyn Read + Send>>;
}

/// Something an item can be stored into.
///
/// Configuration happens once in [`open`](Destination::open) and is fixed
/// for the instance's lifetime, so a destination may be shared across
/// threads without locking.
pub trait Destination: Send + Sync {
    /// Open and configure a destination from its configuration URI.
    fn open(scope: &CancelScope, config_uri: &str) -> Result<Self>
    where
        Self: Sized;

    /// Durably store everything readable from `content` under `path`.
    ///
    /// `path` is interpreted relative to the destination's own root.
    fn write(&self, scope: &CancelScope, path: &str, content: &mut dyn Read) -> Result<()>;
}
