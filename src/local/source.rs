//! Local filesystem source.

use crate::capability::Source;
use crate::error::{Error, Result};
use crate::scope::CancelScope;
use crate::utils::path::{check_root, join_relative, parse_root_uri};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A [`Source`] that reads items from files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    /// Create a source for an existing root directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        check_root(&root)?;
        Ok(Self { root })
    }

    /// The configured root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for LocalSource {
    fn open(_scope: &CancelScope, config_uri: &str) -> Result<Self> {
        // Sources take no parameters; anything in the query is ignored.
        let (root, _params) = parse_root_uri(config_uri)?;
        Self::new(root)
    }

    fn read(&self, scope: &CancelScope, uri: &str) -> Result<Box<dyn Read + Send>> {
        scope.check()?;
        let path = join_relative(&self.root, uri);
        let file = File::open(&path).map_err(|source| Error::Read {
            uri: uri.to_owned(),
            source,
        })?;
        Ok(Box::new(file))
    }
}
