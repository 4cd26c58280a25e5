//! Error types for blob store operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::name::FsName;

/// The step of an operation at which an I/O failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Creating the temporary file next to the destination.
    CreateTemp,
    /// Copying new content into the temporary file.
    Save,
    /// Forcing the temporary file to durable storage.
    Sync,
    /// Giving the temporary file the destination's permissions.
    Permissions,
    /// Renaming the temporary file over the destination.
    Replace,
    /// Reading a stored value.
    Read,
    /// Opening a stored blob for reading.
    Open,
    /// Deleting a stored blob.
    Remove,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTemp => write!(f, "create temp file"),
            Self::Save => write!(f, "save file"),
            Self::Sync => write!(f, "sync changes"),
            Self::Permissions => write!(f, "copy permissions"),
            Self::Replace => write!(f, "replace file"),
            Self::Read => write!(f, "read file"),
            Self::Open => write!(f, "open file"),
            Self::Remove => write!(f, "remove file"),
        }
    }
}

/// Errors from blob store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing is stored under the name.
    #[error("not found: {name} ({})", .path.display())]
    NotFound { name: FsName, path: PathBuf },

    /// An underlying I/O failure, labelled with the stage it happened in.
    #[error("{stage}: {}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store configuration could not be parsed or applied.
    #[error("config error: {0}")]
    Config(String),
}

impl StoreError {
    /// Classify an I/O error from a read or remove of `path`.
    ///
    /// `ErrorKind::NotFound` becomes [`StoreError::NotFound`]; everything
    /// else is wrapped with `stage`.
    pub(crate) fn from_io(stage: Stage, name: &FsName, path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                name: name.clone(),
                path,
            }
        } else {
            Self::Io {
                stage,
                path,
                source,
            }
        }
    }

    /// Wrap an I/O error with the stage it happened in.
    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is a [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The failing stage, for [`StoreError::Io`] errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Io { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels() {
        assert_eq!(Stage::CreateTemp.to_string(), "create temp file");
        assert_eq!(Stage::Save.to_string(), "save file");
        assert_eq!(Stage::Sync.to_string(), "sync changes");
        assert_eq!(Stage::Permissions.to_string(), "copy permissions");
        assert_eq!(Stage::Replace.to_string(), "replace file");
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = StoreError::from_io(
            Stage::Read,
            &FsName::from("cfg"),
            PathBuf::from("/tmp/cfg"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn other_errors_keep_stage() {
        let err = StoreError::from_io(
            Stage::Remove,
            &FsName::from("cfg"),
            PathBuf::from("/tmp/cfg"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(!err.is_not_found());
        assert_eq!(err.stage(), Some(Stage::Remove));
        assert!(err.to_string().starts_with("remove file: /tmp/cfg"));
    }
}
