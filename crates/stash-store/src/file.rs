//! On-disk blob store with atomic replacement.
//!
//! [`FileStore`] keeps every name in its own file, at the path its
//! [`PathResolver`] picks. Writes never touch the destination in place:
//! content goes to a temporary file in the destination's directory, is
//! synced to disk, and is then renamed over the destination. A reader
//! therefore sees either the old file or the new one, and a failed write
//! leaves the old file as it was.
//!
//! A store-wide readers-writer lock serializes this process's writers and
//! removers against each other and against readers. It does not coordinate
//! with other processes.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::{Stage, StoreError, StoreResult};
use crate::name::FsName;
use crate::resolver::PathResolver;
use crate::traits::{FileSystem, ReadSeek};

/// Whether the write protocol takes the exclusive lock for its replace step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LockMode {
    /// Take the lock around the rename.
    Locked,
    /// The caller already holds the lock.
    Held,
}

/// Filesystem-backed [`FileSystem`].
pub struct FileStore<R> {
    /// Guards no data; only orders operations.
    lock: RwLock<()>,
    resolver: R,
}

impl<R: PathResolver> FileStore<R> {
    /// Create a store that places names where `resolver` says.
    pub fn new(resolver: R) -> Self {
        Self {
            lock: RwLock::new(()),
            resolver,
        }
    }

    /// The injected path resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The path `name` is stored at.
    pub fn path_of(&self, name: &FsName) -> PathBuf {
        self.resolver.resolve(name)
    }

    // The lock protects `()`, so a panic in another holder leaves nothing
    // inconsistent behind.
    fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the content at `name`'s path with everything `value` yields.
    ///
    /// Copy and sync happen without the lock; with [`LockMode::Locked`] the
    /// exclusive lock is taken only for the rename. Returns the number of
    /// bytes written.
    fn write_atomic<V>(&self, name: &FsName, value: &mut V, mode: LockMode) -> StoreResult<u64>
    where
        V: Read + ?Sized,
    {
        let dest = self.resolver.resolve(name);
        let (dir, base) = split_dest(&dest);

        let mut prefix = OsString::from(".");
        prefix.push(&base);
        prefix.push(".");
        let mut tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| StoreError::io(Stage::CreateTemp, &dir, e))?;

        let tmp_path = tmp.path().to_path_buf();
        let written = match fill_temp(tmp.as_file_mut(), &tmp_path, value) {
            Ok(written) => written,
            Err(err) => {
                discard(tmp.into_temp_path());
                return Err(err);
            }
        };

        // Closes the file; the path stays a drop guard until persisted.
        let tmp = tmp.into_temp_path();

        let _guard = match mode {
            LockMode::Locked => Some(self.exclusive()),
            LockMode::Held => None,
        };
        if let Err(e) = copy_permissions(&tmp, &dest) {
            discard(tmp);
            return Err(StoreError::io(Stage::Permissions, dest, e));
        }
        if let Err(e) = tmp.persist(&dest) {
            discard(e.path);
            return Err(StoreError::io(Stage::Replace, dest, e.error));
        }

        debug!(name = %name, path = %dest.display(), bytes = written, "stored");
        Ok(written)
    }
}

/// A write target that can be forced to durable storage.
trait SyncAll: Write {
    fn sync_all(&self) -> io::Result<()>;
}

impl SyncAll for File {
    fn sync_all(&self) -> io::Result<()> {
        File::sync_all(self)
    }
}

/// Copy `value` into the temporary file at `path` and force it to disk.
fn fill_temp<W, V>(file: &mut W, path: &Path, value: &mut V) -> StoreResult<u64>
where
    W: SyncAll,
    V: Read + ?Sized,
{
    let mut writer = BufWriter::new(&mut *file);
    let written = io::copy(value, &mut writer)
        .and_then(|n| writer.flush().map(|()| n))
        .map_err(|e| StoreError::io(Stage::Save, path, e))?;
    drop(writer);

    file.sync_all()
        .map_err(|e| StoreError::io(Stage::Sync, path, e))?;
    Ok(written)
}

/// Give the temp file the permissions of the file it is about to replace.
///
/// A missing destination keeps the temp file's own (owner-only) mode.
fn copy_permissions(tmp: &Path, dest: &Path) -> io::Result<()> {
    match fs::metadata(dest) {
        Ok(meta) => fs::set_permissions(tmp, meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Remove a temporary file that will not be persisted.
///
/// Failure is logged and otherwise ignored.
fn discard(tmp: TempPath) {
    let path = tmp.to_path_buf();
    if let Err(e) = tmp.close() {
        warn!(path = %path.display(), error = %e, "failed to remove temp file");
    }
}

/// Split a destination into the directory its temp file goes in and the
/// base name the temp file is named after.
fn split_dest(dest: &Path) -> (PathBuf, OsString) {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let base = dest
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    (dir, base)
}

impl<R: PathResolver> FileSystem for FileStore<R> {
    type File = File;

    fn get_string(&self, name: &FsName) -> StoreResult<String> {
        let _guard = self.shared();
        let path = self.resolver.resolve(name);
        let data =
            fs::read(&path).map_err(|e| StoreError::from_io(Stage::Read, name, path.clone(), e))?;
        let text = String::from_utf8(data).map_err(|e| {
            StoreError::io(
                Stage::Read,
                &path,
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(text.trim().to_owned())
    }

    fn get_file(&self, name: &FsName) -> StoreResult<File> {
        let _guard = self.shared();
        let path = self.resolver.resolve(name);
        File::open(&path).map_err(|e| StoreError::from_io(Stage::Open, name, path, e))
    }

    fn set_string(&self, name: &FsName, value: &str) -> StoreResult<()> {
        let _guard = self.exclusive();
        let mut bytes = value.trim().as_bytes();
        self.write_atomic(name, &mut bytes, LockMode::Held)?;
        Ok(())
    }

    fn set_file(&self, name: &FsName, value: &mut dyn ReadSeek) -> StoreResult<()> {
        self.write_atomic(name, value, LockMode::Locked)?;
        Ok(())
    }

    fn remove_file(&self, name: &FsName) -> StoreResult<()> {
        let _guard = self.exclusive();
        let path = self.resolver.resolve(name);
        fs::remove_file(&path)
            .map_err(|e| StoreError::from_io(Stage::Remove, name, path.clone(), e))?;
        debug!(name = %name, path = %path.display(), "removed");
        Ok(())
    }
}

impl<R: fmt::Debug> fmt::Debug for FileStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
