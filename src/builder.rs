//! Builder API for assembling a [`Copier`] from URIs.
//!
//! The builder resolves every URI through a [`Registry`] and hands the
//! opened backends to [`Copier::new`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use fancopy::{CancelScope, CopyBuilder};
//!
//! let scope = CancelScope::new();
//! CopyBuilder::new("local:///data/in")
//!     .destination("local:///mnt/a")
//!     .destination("local:///mnt/b")
//!     .run(&scope, "reports/2024.csv")?;
//! # Ok::<(), fancopy::Error>(())
//! ```
//!
//! ## Reusing a Copier
//!
//! ```no_run
//! use fancopy::{CancelScope, CopyBuilder};
//!
//! let scope = CancelScope::new();
//! let copier = CopyBuilder::new("local:///data/in")
//!     .destinations(["local:///mnt/a", "local:///mnt/b?file_mode=0600"])
//!     .build(&scope)?;
//!
//! for item in ["a.txt", "b.txt"] {
//!     copier.copy(&scope, item)?;
//! }
//! # Ok::<(), fancopy::Error>(())
//! ```

use crate::copier::Copier;
use crate::error::Result;
use crate::registry::Registry;
use crate::scope::CancelScope;

/// A builder for configuring a [`Copier`] from backend URIs.
///
/// Uses [`Registry::with_defaults`] unless another registry is supplied.
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    source: String,
    destinations: Vec<String>,
    registry: Registry,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` reading from `source_uri`.
    pub fn new(source_uri: impl Into<String>) -> Self {
        Self {
            source: source_uri.into(),
            destinations: Vec::new(),
            registry: Registry::with_defaults(),
        }
    }

    /// Add one destination URI.
    #[must_use]
    pub fn destination(mut self, uri: impl Into<String>) -> Self {
        self.destinations.push(uri.into());
        self
    }

    /// Add several destination URIs.
    #[must_use]
    pub fn destinations<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destinations.extend(uris.into_iter().map(Into::into));
        self
    }

    /// Resolve URIs with `registry` instead of the default one.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Open every backend and build the [`Copier`].
    ///
    /// # Errors
    ///
    /// - No destination was added ([`Error::NoDestinations`](crate::Error::NoDestinations)),
    ///   checked before any backend is opened
    /// - Any error from [`Registry::open_source`] or
    ///   [`Registry::open_destination`]
    pub fn build(self, scope: &CancelScope) -> Result<Copier> {
        if self.destinations.is_empty() {
            return Err(crate::Error::NoDestinations);
        }

        let source = self.registry.open_source(scope, &self.source)?;
        let destinations = self
            .destinations
            .iter()
            .map(|uri| self.registry.open_destination(scope, uri))
            .collect::<Result<Vec<_>>>()?;

        Copier::new(source, destinations)
    }

    /// Build the copier and replicate one item.
    ///
    /// # Errors
    ///
    /// Any error from [`build`](Self::build) or [`Copier::copy`].
    pub fn run(self, scope: &CancelScope, uri: &str) -> Result<()> {
        self.build(scope)?.copy(scope, uri)
    }
}
