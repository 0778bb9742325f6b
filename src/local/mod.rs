//! Local filesystem backends.
//!
//! Both backends are configured from a root-directory URI such as
//! `local:///srv/data`; item paths are resolved relative to that root.

mod destination;
mod source;

pub use destination::LocalDestination;
pub use source::LocalSource;

/// URI scheme the local backends are registered under.
pub const SCHEME: &str = "local";
