use std::fmt;

/// An ordered sequence of output keys locating where data is inserted
/// relative to a record's root.
///
/// The empty path addresses the root itself; a flattened relationship merges
/// its fields there. A dotted field alias such as `"a.b"` becomes the
/// two-step path `[a, b]`.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: Vec<String>,
}

impl Path {
    /// The empty path, addressing the record root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A single-key path.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            keys: vec![key.into()],
        }
    }

    /// Splits a dotted alias into a path, one key per segment.
    pub fn dotted(alias: &str) -> Self {
        alias.split('.').map(str::to_string).collect()
    }

    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn push(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// Returns this path with `prefix` prepended.
    ///
    /// Used by the analyzer when promoting a nested relationship: the
    /// promoted child's path becomes relative to the group root.
    pub fn prepend(&self, prefix: &Path) -> Path {
        prefix
            .keys
            .iter()
            .chain(self.keys.iter())
            .cloned()
            .collect()
    }
}

impl FromIterator<String> for Path {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.keys.join(", "))
    }
}
