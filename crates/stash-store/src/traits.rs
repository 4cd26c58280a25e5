//! The [`FileSystem`] trait defining the named blob interface.

use std::io::{Read, Seek};

use crate::error::StoreResult;
use crate::name::FsName;

/// A readable, seekable byte source accepted by [`FileSystem::set_file`].
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Name-addressed blob storage.
///
/// All implementations must satisfy these invariants:
/// - A reader sees either the previous complete value or the new complete
///   value of a name, never a partial write.
/// - A failed write leaves the previous value untouched.
/// - String values are trimmed of surrounding whitespace on write and read;
///   blobs are stored byte-for-byte.
/// - Missing names fail with [`StoreError::NotFound`].
///
/// [`StoreError::NotFound`]: crate::error::StoreError::NotFound
pub trait FileSystem: Send + Sync {
    /// Owned read handle returned by [`FileSystem::get_file`].
    type File: Read + Seek + Send;

    /// Read the value stored under `name` as trimmed UTF-8 text.
    fn get_string(&self, name: &FsName) -> StoreResult<String>;

    /// Open the blob stored under `name` for sequential reading.
    ///
    /// The caller owns the handle. Later writes to `name` do not affect
    /// content already readable through it.
    fn get_file(&self, name: &FsName) -> StoreResult<Self::File>;

    /// Replace the value stored under `name` with trimmed `value`.
    fn set_string(&self, name: &FsName, value: &str) -> StoreResult<()>;

    /// Replace the blob stored under `name` with everything `value` yields
    /// from its current position to EOF.
    fn set_file(&self, name: &FsName, value: &mut dyn ReadSeek) -> StoreResult<()>;

    /// Delete the blob stored under `name`.
    fn remove_file(&self, name: &FsName) -> StoreResult<()>;
}
