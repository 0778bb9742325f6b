//! Path helpers shared by the local backends.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Join an item path onto a backend root.
///
/// Leading separators are stripped so `"/a/b"` still lands under `root`,
/// as with Go's `filepath.Join` or a plain string concatenation. No other
/// normalization is done: `..` components are kept and may leave `root`.
pub(crate) fn join_relative(root: &Path, relative: &str) -> PathBuf {
    root.join(relative.trim_start_matches(['/', '\\']))
}

/// Check if a path contains ".." components that could escape upward
#[inline]
pub(crate) fn is_escaping_path(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Parse a backend configuration URI into its root directory and query
/// parameters.
///
/// Accepts `scheme:///abs/path?k=v` URIs as well as bare filesystem paths.
/// The path component is percent-decoded.
pub(crate) fn parse_root_uri(config_uri: &str) -> Result<(PathBuf, Vec<(String, String)>)> {
    let url = match url::Url::parse(config_uri) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Ok((PathBuf::from(config_uri), Vec::new()));
        }
        Err(e) => return Err(invalid_uri(config_uri, e.to_string())),
    };

    if url.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(invalid_uri(
            config_uri,
            "host is not allowed, use scheme:///absolute/path".to_owned(),
        ));
    }

    let decoded = urlencoding::decode(url.path())
        .map_err(|e| invalid_uri(config_uri, e.to_string()))?;
    if decoded.is_empty() {
        return Err(invalid_uri(config_uri, "missing root path".to_owned()));
    }
    let root = match decoded.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    let params = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok((PathBuf::from(root), params))
}

/// Check that `root` exists and is a directory.
pub(crate) fn check_root(root: &Path) -> Result<()> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

fn invalid_uri(uri: &str, reason: String) -> Error {
    Error::InvalidUri {
        uri: uri.to_owned(),
        reason,
    }
}
