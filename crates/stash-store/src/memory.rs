//! In-memory blob store for testing and embedding.
//!
//! [`InMemoryFileSystem`] keeps every blob in a `HashMap` behind a `RwLock`
//! and follows the same trimming and not-found rules as [`FileStore`].
//! Data is lost when the store is dropped.
//!
//! [`FileStore`]: crate::file::FileStore

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::error::{Stage, StoreError, StoreResult};
use crate::name::FsName;
use crate::traits::{FileSystem, ReadSeek};

/// `HashMap`-based [`FileSystem`].
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
    blobs: RwLock<HashMap<FsName, Vec<u8>>>,
}

impl InMemoryFileSystem {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored names.
    pub fn len(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored names, sorted.
    pub fn names(&self) -> Vec<FsName> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<FsName> = blobs.keys().cloned().collect();
        names.sort();
        names
    }

    fn not_found(name: &FsName) -> StoreError {
        StoreError::NotFound {
            name: name.clone(),
            path: PathBuf::from(name.as_str()),
        }
    }

    fn lookup(&self, name: &FsName) -> StoreResult<Vec<u8>> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        blobs.get(name).cloned().ok_or_else(|| Self::not_found(name))
    }

    fn store(&self, name: &FsName, data: Vec<u8>) {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(name.clone(), data);
    }
}

impl FileSystem for InMemoryFileSystem {
    type File = Cursor<Vec<u8>>;

    fn get_string(&self, name: &FsName) -> StoreResult<String> {
        let data = self.lookup(name)?;
        let text = String::from_utf8(data).map_err(|e| {
            StoreError::io(
                Stage::Read,
                name.as_str(),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(text.trim().to_owned())
    }

    fn get_file(&self, name: &FsName) -> StoreResult<Self::File> {
        self.lookup(name).map(Cursor::new)
    }

    fn set_string(&self, name: &FsName, value: &str) -> StoreResult<()> {
        self.store(name, value.trim().as_bytes().to_vec());
        Ok(())
    }

    fn set_file(&self, name: &FsName, value: &mut dyn ReadSeek) -> StoreResult<()> {
        // Read fully before taking the lock so a failing reader changes
        // nothing.
        let mut data = Vec::new();
        value
            .read_to_end(&mut data)
            .map_err(|e| StoreError::io(Stage::Save, name.as_str(), e))?;
        self.store(name, data);
        Ok(())
    }

    fn remove_file(&self, name: &FsName) -> StoreResult<()> {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(name))
    }
}
