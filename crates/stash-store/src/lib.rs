//! Name-addressed, durable blob storage on the local filesystem.
//!
//! Callers read and write text values and binary streams under a logical
//! [`FsName`]. An injected [`PathResolver`] decides which file a name lives
//! in; the store only requires that mapping to be deterministic.
//!
//! # Backends
//!
//! All backends implement the [`FileSystem`] trait:
//!
//! - [`FileStore`] -- one file per name, atomically replaced on write
//! - [`InMemoryFileSystem`] -- `HashMap`-based store for tests and embedding
//!
//! # Guarantees
//!
//! 1. Writes go to a synced temporary file in the destination's directory
//!    which is then renamed over the destination. Readers see the old value
//!    or the new value, never a mix.
//! 2. A failed write leaves the previous value untouched and removes its
//!    temporary file.
//! 3. Within one store instance, writes and removes are serialized against
//!    each other and against reads by a readers-writer lock.
//! 4. Strings are trimmed of surrounding whitespace on write and read; blobs
//!    are stored byte-for-byte.
//! 5. All I/O errors are returned with the stage they happened in.
//!
//! Nothing here coordinates between processes sharing a root.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod name;
pub mod resolver;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use error::{Stage, StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryFileSystem;
pub use name::FsName;
pub use resolver::{PathResolver, RootResolver};
pub use traits::{FileSystem, ReadSeek};
