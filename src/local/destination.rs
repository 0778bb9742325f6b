//! Local filesystem destination.
//!
//! Writes go through a temporary file that is renamed over the final path,
//! so readers of the final path only ever see the previous version or the
//! complete new one.

use crate::capability::Destination;
use crate::error::{Error, Result};
use crate::options::LocalOptions;
use crate::scope::CancelScope;
use crate::utils::path::{check_root, is_escaping_path, join_relative, parse_root_uri};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A [`Destination`] rooted at a local directory.
///
/// # Example
///
/// ```no_run
/// use fancopy::{CancelScope, Destination, LocalDestination};
///
/// let scope = CancelScope::new();
/// let dest = LocalDestination::open(&scope, "local:///srv/mirror?file_mode=0640")?;
/// dest.write(&scope, "docs/readme.txt", &mut "hello".as_bytes())?;
/// # Ok::<(), fancopy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalDestination {
    root: PathBuf,
    options: LocalOptions,
}

impl LocalDestination {
    /// Create a destination for an existing root directory.
    ///
    /// # Errors
    ///
    /// - Root does not exist ([`Error::RootNotFound`])
    /// - Root is not a directory ([`Error::NotADirectory`])
    pub fn with_options(root: impl Into<PathBuf>, options: LocalOptions) -> Result<Self> {
        let root = root.into();
        check_root(&root)?;
        Ok(Self { root, options })
    }

    /// The configured root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The options fixed at open time.
    #[must_use]
    pub fn options(&self) -> &LocalOptions {
        &self.options
    }

    /// Absolute path an item would be written to.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        join_relative(&self.root, path)
    }

    /// Write `content` to `path` through a temp file and an atomic rename.
    fn write_atomic(&self, path: &str, content: &mut dyn Read) -> Result<u64> {
        let relative = path.trim_start_matches(['/', '\\']);
        if relative.is_empty() || relative.ends_with(['/', '\\']) {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        if is_escaping_path(Path::new(relative)) {
            self.options
                .warn(&format!("Path escapes destination root: {path}"));
        }

        let dst = self.resolve(path);
        let file_name = dst
            .file_name()
            .ok_or_else(|| Error::InvalidPath(path.to_owned()))?;
        let dst_parent = dst.parent().unwrap_or(&self.root);

        ensure_dir(dst_parent, self.options.dir_mode)?;

        // Temp file lives next to the destination unless a scratch area is
        // configured. Dropping it on any early return removes it.
        let scratch = self.options.scratch_dir.as_deref().unwrap_or(dst_parent);
        let prefix = format!(".{}.", file_name.to_string_lossy());
        let mut temp_file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(scratch)
            .map_err(|e| Error::TempFile {
                path: scratch.to_path_buf(),
                source: e,
            })?;

        let bytes = io::copy(content, temp_file.as_file_mut())?;

        // Ensure data is on disk before rename
        if self.options.fsync {
            temp_file.as_file().sync_all()?;
        }

        set_mode(temp_file.path(), self.options.file_mode).map_err(|e| Error::Permissions {
            path: dst.clone(),
            source: e,
        })?;

        temp_file.persist(&dst).map_err(|e| Error::Persist {
            path: dst.clone(),
            source: e.error,
        })?;

        Ok(bytes)
    }
}

impl Destination for LocalDestination {
    /// Open a destination from `local:///root/dir[?file_mode=..&dir_mode=..&fsync=..&scratch=..]`
    /// or a bare directory path.
    fn open(_scope: &CancelScope, config_uri: &str) -> Result<Self> {
        let (root, params) = parse_root_uri(config_uri)?;
        let mut options = LocalOptions::default();
        for (key, value) in &params {
            options.apply_param(key, value)?;
        }
        Self::with_options(root, options)
    }

    /// The scope is not consulted: once started, a write runs to completion.
    fn write(&self, _scope: &CancelScope, path: &str, content: &mut dyn Read) -> Result<()> {
        let _bytes = self.write_atomic(path, content)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(root = %self.root.display(), path, bytes = _bytes, "wrote item");

        Ok(())
    }
}

/// Create `dir` and any missing ancestors with `mode` if it does not exist.
fn ensure_dir(dir: &Path, mode: u32) -> Result<()> {
    let create_err = |source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    };

    match fs::metadata(dir) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(mode);
            }
            #[cfg(not(unix))]
            let _ = mode;
            builder.create(dir).map_err(create_err)
        }
        Err(e) => Err(create_err(e)),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// Without unix modes, only the write bits carry over (as read-only).
#[cfg(not(unix))]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o222 == 0);
    fs::set_permissions(path, perms)
}

// =============================================================================
// Tests
// =============================================================================
