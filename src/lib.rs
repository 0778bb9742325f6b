//! # fancopy
//!
//! Replicate one item from a source to many destinations at once.
//!
//! ## Core Features
//!
//! - **Fan-out copying**: The item is read once, then written to every destination in parallel
//! - **First error wins**: A copy returns as soon as any destination fails, with that destination's error
//! - **Cooperative cancellation**: Writes that have not started yet are skipped after a failure
//! - **Atomic local writes**: Temp file + rename, so readers never see a partial file
//! - **Pluggable backends**: [`Source`] and [`Destination`] traits, selected by URI scheme through a [`Registry`]
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use fancopy::{CancelScope, CopyBuilder};
//!
//! let scope = CancelScope::new();
//! CopyBuilder::new("local:///data/in")
//!     .destination("local:///mnt/mirror-a")
//!     .destination("local:///mnt/mirror-b?file_mode=0640")
//!     .run(&scope, "reports/2024.csv")?;
//! # Ok::<(), fancopy::Error>(())
//! ```
//!
//! ## Direct API
//!
//! ```no_run
//! use fancopy::{CancelScope, Copier, Destination, LocalDestination, LocalOptions, LocalSource};
//! use std::sync::Arc;
//!
//! let source = LocalSource::new("/data/in")?;
//! let mirror = LocalDestination::with_options(
//!     "/mnt/mirror",
//!     LocalOptions::default().with_file_mode(0o600),
//! )?;
//!
//! let copier = Copier::new(Box::new(source), vec![Arc::new(mirror) as Arc<dyn Destination>])?;
//! copier.copy(&CancelScope::new(), "reports/2024.csv")?;
//! # Ok::<(), fancopy::Error>(())
//! ```
//!
//! ## Guarantees
//!
//! ### Buffer Before Write
//!
//! The item is fully read before any destination is written. A failing
//! source never leaves partial data anywhere, and every destination receives
//! byte-identical content.
//!
//! ### Atomic Writes
//!
//! [`LocalDestination`] writes to a uniquely named temporary file, sets its
//! permissions, then renames it over the final path. The temporary file is
//! removed on every exit path.
//!
//! ### No Cross-Destination Transactions
//!
//! Destinations succeed or fail independently. When a copy fails, other
//! destinations may already hold the new content; nothing is rolled back.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`LocalOptions`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod capability;
mod copier;
mod error;
mod local;
mod options;
mod registry;
mod scope;
mod utils;

#[cfg(feature = "progress")]
mod progress;

pub use builder::CopyBuilder;
pub use capability::{Destination, Source};
pub use copier::Copier;
pub use error::{Error, ErrorCode, Result, is_no_space_error};
pub use local::{LocalDestination, LocalSource, SCHEME as LOCAL_SCHEME};
pub use options::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, LocalOptions};
pub use registry::{
    DestinationFactory, Registry, SourceFactory, destination_factory, source_factory,
};
pub use scope::CancelScope;

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::{ProgressCallback, create_progress_bar};
