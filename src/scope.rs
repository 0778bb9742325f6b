//! Cooperative cancellation scopes.
//!
//! A [`CancelScope`] is a cheap, cloneable handle over a shared flag. Scopes
//! form a chain: a child observes its own flag and every ancestor's, but
//! cancelling a child never touches its parent.
//!
//! # Example
//!
//! ```
//! use fancopy::CancelScope;
//!
//! let root = CancelScope::new();
//! let child = root.child();
//!
//! child.cancel();
//! assert!(child.is_cancelled());
//! assert!(!root.is_cancelled());
//!
//! let other = root.child();
//! root.cancel();
//! assert!(other.is_cancelled());
//! ```

use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A propagated cancellation signal.
///
/// Consumers consult it with [`is_cancelled`](Self::is_cancelled) or
/// [`check`](Self::check); nothing is interrupted forcibly.
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<CancelScope>>,
}

impl CancelScope {
    /// Create a root scope that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an externally owned flag, e.g. one set by a Ctrl+C handler.
    ///
    /// ```
    /// use fancopy::CancelScope;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicBool, Ordering};
    ///
    /// let flag = Arc::new(AtomicBool::new(false));
    /// let scope = CancelScope::from_flag(flag.clone());
    /// flag.store(true, Ordering::Relaxed);
    /// assert!(scope.is_cancelled());
    /// ```
    #[must_use]
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag, parent: None }
    }

    /// Derive a child scope.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Signal cancellation to this scope and all of its descendants.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether this scope or any ancestor has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    /// Return [`Error::Cancelled`] if the scope has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
