use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable set of source-file extensions mapped to one language.
///
/// Extensions keep their case; order and duplicates do not affect equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet {
    exts: Vec<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exts: Vec<String> = exts.into_iter().map(Into::into).collect();
        exts.sort();
        exts.dedup();
        Self { exts }
    }

    pub fn single(ext: impl Into<String>) -> Self {
        Self {
            exts: vec![ext.into()],
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.exts
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.exts.binary_search_by(|e| e.as_str().cmp(ext)).is_ok()
    }

    pub fn intersects(&self, other: &ExtensionSet) -> bool {
        self.exts.iter().any(|e| other.contains(e))
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(exts: Vec<String>) -> Self {
        Self::new(exts)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(set: ExtensionSet) -> Self {
        set.exts
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exts.is_empty() {
            return write!(f, "<empty>");
        }
        write!(f, "{}", self.exts.join(","))
    }
}
