//! Atomic output writing.
//!
//! Generated files are written to a temporary file next to the
//! destination, synced, then renamed over it. Readers see either the old
//! file or the complete new one; a failed write leaves the destination
//! untouched and removes the temporary file.
//!
//! # Examples
//!
//! ```
//! use enumschema_files::write_atomic;
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let path = temp.path().join("schema.json");
//! write_atomic(&path, b"{}\n").unwrap();
//!
//! assert_eq!(std::fs::read(&path).unwrap(), b"{}\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod writer;

pub use writer::{AtomicWriter, write_atomic, write_atomic_with};
