//! Backend selection by URI scheme.
//!
//! A [`Registry`] is an explicit map from scheme to constructor, built by
//! the caller at composition time. Nothing is registered globally.
//!
//! # Example
//!
//! ```no_run
//! use fancopy::{CancelScope, Registry};
//!
//! let registry = Registry::with_defaults();
//! let scope = CancelScope::new();
//! let source = registry.open_source(&scope, "local:///data/in")?;
//! let mirror = registry.open_destination(&scope, "local:///data/mirror")?;
//! # Ok::<(), fancopy::Error>(())
//! ```

use crate::capability::{Destination, Source};
use crate::error::{Error, Result};
use crate::local::{LocalDestination, LocalSource, SCHEME as LOCAL_SCHEME};
use crate::scope::CancelScope;
use std::collections::HashMap;
use std::sync::Arc;

/// Constructor for a source backend.
pub type SourceFactory = fn(&CancelScope, &str) -> Result<Box<dyn Source>>;

/// Constructor for a destination backend.
pub type DestinationFactory = fn(&CancelScope, &str) -> Result<Arc<dyn Destination>>;

/// Factory for any [`Source`] type, suitable for [`Registry::register_source`].
pub fn source_factory<S: Source + 'static>(
    scope: &CancelScope,
    config_uri: &str,
) -> Result<Box<dyn Source>> {
    Ok(Box::new(S::open(scope, config_uri)?))
}

/// Factory for any [`Destination`] type, suitable for
/// [`Registry::register_destination`].
pub fn destination_factory<D: Destination + 'static>(
    scope: &CancelScope,
    config_uri: &str,
) -> Result<Arc<dyn Destination>> {
    Ok(Arc::new(D::open(scope, config_uri)?))
}

/// Scheme-to-constructor map for sources and destinations.
#[derive(Clone, Default)]
pub struct Registry {
    sources: HashMap<String, SourceFactory>,
    destinations: HashMap<String, DestinationFactory>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("sources", &self.source_schemes())
            .field("destinations", &self.destination_schemes())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `local` backends.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_source(LOCAL_SCHEME, source_factory::<LocalSource>);
        registry.register_destination(LOCAL_SCHEME, destination_factory::<LocalDestination>);
        registry
    }

    /// Register a source constructor, replacing any previous one for `scheme`.
    pub fn register_source(&mut self, scheme: &str, factory: SourceFactory) -> &mut Self {
        self.sources.insert(scheme.to_ascii_lowercase(), factory);
        self
    }

    /// Register a destination constructor, replacing any previous one for `scheme`.
    pub fn register_destination(&mut self, scheme: &str, factory: DestinationFactory) -> &mut Self {
        self.destinations.insert(scheme.to_ascii_lowercase(), factory);
        self
    }

    /// Open the source addressed by `uri`.
    ///
    /// # Errors
    ///
    /// - `uri` is not a URI ([`Error::InvalidUri`])
    /// - No source is registered for its scheme ([`Error::UnknownScheme`])
    /// - Any error from the backend's `open`
    pub fn open_source(&self, scope: &CancelScope, uri: &str) -> Result<Box<dyn Source>> {
        let scheme = scheme_of(uri)?;
        let factory = self
            .sources
            .get(&scheme)
            .ok_or(Error::UnknownScheme(scheme))?;
        factory(scope, uri)
    }

    /// Open the destination addressed by `uri`.
    ///
    /// # Errors
    ///
    /// Same as [`open_source`](Self::open_source).
    pub fn open_destination(&self, scope: &CancelScope, uri: &str) -> Result<Arc<dyn Destination>> {
        let scheme = scheme_of(uri)?;
        let factory = self
            .destinations
            .get(&scheme)
            .ok_or(Error::UnknownScheme(scheme))?;
        factory(scope, uri)
    }

    /// Registered source schemes, sorted.
    #[must_use]
    pub fn source_schemes(&self) -> Vec<&str> {
        sorted_keys(self.sources.keys())
    }

    /// Registered destination schemes, sorted.
    #[must_use]
    pub fn destination_schemes(&self) -> Vec<&str> {
        sorted_keys(self.destinations.keys())
    }
}

fn scheme_of(uri: &str) -> Result<String> {
    url::Url::parse(uri)
        .map(|url| url.scheme().to_owned())
        .map_err(|e| Error::InvalidUri {
            uri: uri.to_owned(),
            reason: e.to_string(),
        })
}

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = keys.map(String::as_str).collect();
    keys.sort_unstable();
    keys
}
