//! Renamescript – a small scripting language for renaming and relocating media files
//!
//! A script is evaluated against metadata about one file (its series, episodes,
//! release group and the import folders known to the host) and produces:
//! - a new file name,
//! - a destination import folder,
//! - a subfolder below that destination.
//!
//! The same parsed script is walked twice, once for the filename and once for
//! the destination and subfolder, so the two halves can be requested
//! independently through [`Renamer`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Destination folder and subfolder resolution
pub mod destination;
/// Episode-number range formatting
pub mod episodes;
/// Metadata records scripts read from
pub mod metadata;
/// Renaming driver and configuration
pub mod renamer;
/// Illegal path character cleanup
pub mod sanitize;
pub mod script;

// Re-export key types for convenience
pub use metadata::RenameRequest;
pub use renamer::{RenameError, RenameResult, Renamer, RenamerConfig, Script};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
