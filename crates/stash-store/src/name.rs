use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-chosen identifier for a stored blob.
///
/// The store attaches no meaning to a name; a [`PathResolver`] decides where
/// it lives on disk.
///
/// [`PathResolver`]: crate::resolver::PathResolver
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FsName(String);

impl FsName {
    /// Create a name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for FsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FsName({:?})", self.0)
    }
}

impl fmt::Display for FsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FsName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FsName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FsName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for FsName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&FsName> for FsName {
    fn from(name: &FsName) -> Self {
        name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_name() {
        let name = FsName::from("settings/theme");
        assert_eq!(name.to_string(), "settings/theme");
        assert_eq!(format!("{name:?}"), "FsName(\"settings/theme\")");
    }

    #[test]
    fn conversions_agree() {
        assert_eq!(FsName::new("a"), FsName::from(String::from("a")));
        assert_eq!(FsName::from("a").into_string(), "a");
    }

    #[test]
    fn borrows_as_str_for_map_lookup() {
        let mut map = std::collections::HashMap::new();
        map.insert(FsName::from("k"), 1);
        assert_eq!(map.get("k"), Some(&1));
    }
}
