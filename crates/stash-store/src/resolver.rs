//! Mapping logical names to filesystem paths.
//!
//! A [`PathResolver`] must be deterministic and pure: the same name always
//! resolves to the same path, and resolving performs no I/O and takes no
//! locks. The store calls it while holding its own lock.

use std::path::{Path, PathBuf};

use crate::name::FsName;

/// Resolves a logical name to the path its blob is stored at.
pub trait PathResolver: Send + Sync {
    /// Return the path for `name`.
    fn resolve(&self, name: &FsName) -> PathBuf;
}

impl<F> PathResolver for F
where
    F: Fn(&FsName) -> PathBuf + Send + Sync,
{
    fn resolve(&self, name: &FsName) -> PathBuf {
        self(name)
    }
}

/// Stores every name as a file under a root directory.
///
/// `name` maps to `root/name`, or `root/name.ext` when an extension is set.
/// Names containing `/` map to nested paths; intermediate directories are
/// not created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootResolver {
    root: PathBuf,
    extension: Option<String>,
}

impl RootResolver {
    /// Resolve names directly under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: None,
        }
    }

    /// Append `.ext` to every resolved file name. A leading dot is ignored.
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        let ext = ext.trim_start_matches('.');
        self.extension = (!ext.is_empty()).then(|| ext.to_owned());
        self
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configured extension, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

impl PathResolver for RootResolver {
    fn resolve(&self, name: &FsName) -> PathBuf {
        match &self.extension {
            // Appended rather than `set_extension`, which would replace a
            // dot already present in the name.
            Some(ext) => self.root.join(format!("{name}.{ext}")),
            None => self.root.join(name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_name_under_root() {
        let resolver = RootResolver::new("/data");
        assert_eq!(
            resolver.resolve(&FsName::from("token")),
            PathBuf::from("/data/token")
        );
    }

    #[test]
    fn nested_names_map_to_subdirectories() {
        let resolver = RootResolver::new("/data");
        assert_eq!(
            resolver.resolve(&FsName::from("peers/alice")),
            PathBuf::from("/data/peers/alice")
        );
    }

    #[test]
    fn extension_is_appended() {
        let resolver = RootResolver::new("/data").with_extension(".json");
        assert_eq!(resolver.extension(), Some("json"));
        assert_eq!(
            resolver.resolve(&FsName::from("v1.2")),
            PathBuf::from("/data/v1.2.json")
        );
    }

    #[test]
    fn empty_extension_is_ignored() {
        let resolver = RootResolver::new("/data").with_extension("");
        assert_eq!(resolver.extension(), None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = RootResolver::new("rel").with_extension("txt");
        let name = FsName::from("a");
        assert_eq!(resolver.resolve(&name), resolver.resolve(&name));
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver =
            |name: &FsName| PathBuf::from(format!("/kv/{}", name.as_str().to_uppercase()));
        assert_eq!(
            resolver.resolve(&FsName::from("ab")),
            PathBuf::from("/kv/AB")
        );
    }
}
