use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::BitOr;
use std::path::PathBuf;
use std::sync::Arc;

/// Kinds of language setting entries a piece of discovered data carries,
/// or a language accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKinds(u8);

impl EntryKinds {
    pub const NONE: EntryKinds = EntryKinds(0);
    pub const INCLUDE_PATH: EntryKinds = EntryKinds(1);
    pub const INCLUDE_FILE: EntryKinds = EntryKinds(1 << 1);
    pub const MACRO: EntryKinds = EntryKinds(1 << 2);
    pub const MACRO_FILE: EntryKinds = EntryKinds(1 << 3);
    pub const ALL: EntryKinds = EntryKinds(0b1111);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: EntryKinds) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: EntryKinds) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for EntryKinds {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for EntryKinds {
    type Output = EntryKinds;

    fn bitor(self, rhs: Self) -> Self::Output {
        EntryKinds(self.0 | rhs.0)
    }
}

static EMPTY_ARC: Lazy<Arc<PathInfo>> = Lazy::new(|| Arc::new(PathInfo::EMPTY));

/// Discovered scanner information for one resource: include paths, forced
/// include files and macro definitions.
///
/// Values compare and hash structurally, so equal discoveries coming from
/// different files collapse into the same bucket during merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct PathInfo {
    pub include_paths: Vec<PathBuf>,
    pub quote_include_paths: Vec<PathBuf>,
    pub include_files: Vec<PathBuf>,
    pub macro_files: Vec<PathBuf>,
    pub symbols: BTreeMap<String, String>,
}

impl PathInfo {
    /// Nothing discovered.
    pub const EMPTY: PathInfo = PathInfo {
        include_paths: Vec::new(),
        quote_include_paths: Vec::new(),
        include_files: Vec::new(),
        macro_files: Vec::new(),
        symbols: BTreeMap::new(),
    };

    pub fn new(
        include_paths: Vec<PathBuf>,
        quote_include_paths: Vec<PathBuf>,
        symbols: BTreeMap<String, String>,
        include_files: Vec<PathBuf>,
        macro_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            include_paths,
            quote_include_paths,
            include_files,
            macro_files,
            symbols,
        }
    }

    /// Shared handle to [`PathInfo::EMPTY`].
    pub fn empty_arc() -> Arc<PathInfo> {
        EMPTY_ARC.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.quote_include_paths.is_empty()
            && self.include_files.is_empty()
            && self.macro_files.is_empty()
            && self.symbols.is_empty()
    }

    /// Entry kinds present in this value.
    pub fn entry_kinds(&self) -> EntryKinds {
        let mut kinds = EntryKinds::NONE;
        if !self.include_paths.is_empty() || !self.quote_include_paths.is_empty() {
            kinds = kinds | EntryKinds::INCLUDE_PATH;
        }
        if !self.include_files.is_empty() {
            kinds = kinds | EntryKinds::INCLUDE_FILE;
        }
        if !self.macro_files.is_empty() {
            kinds = kinds | EntryKinds::MACRO_FILE;
        }
        if !self.symbols.is_empty() {
            kinds = kinds | EntryKinds::MACRO;
        }
        kinds
    }

    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn with_quote_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.quote_include_paths.push(path.into());
        self
    }

    pub fn with_include_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_files.push(path.into());
        self
    }

    pub fn with_macro_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.macro_files.push(path.into());
        self
    }

    pub fn with_symbol(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.symbols.insert(name.into(), value.into());
        self
    }
}
