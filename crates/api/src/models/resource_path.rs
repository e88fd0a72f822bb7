use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Project-relative, segment-addressed resource path.
///
/// Zero segments address the project root (whole-configuration data).
/// Ordering is segment-wise, which yields a pre-order walk when paths are
/// kept in a sorted map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/` or `\` separated path; empty and `.` segments are dropped.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path without its last segment; the root stays the root.
    pub fn parent(&self) -> ResourcePath {
        self.remove_last_segments(1)
    }

    pub fn remove_last_segments(&self, count: usize) -> ResourcePath {
        let keep = self.segments.len().saturating_sub(count);
        Self {
            segments: self.segments[..keep].to_vec(),
        }
    }

    pub fn join(&self, segment: impl Into<String>) -> ResourcePath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn is_prefix_of(&self, other: &ResourcePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Text after the last `.` of the last segment, or `""` when there is none.
    pub fn file_extension(&self) -> &str {
        self.last_segment()
            .and_then(|name| name.rfind('.').map(|idx| &name[idx + 1..]))
            .unwrap_or("")
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for ResourcePath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourcePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_separators() {
        let p = ResourcePath::parse("./src\\sub//main.c");
        assert_eq!(p.segments(), &["src", "sub", "main.c"]);
        assert_eq!(p.to_string(), "src/sub/main.c");
        assert!(ResourcePath::parse("").is_root());
    }

    #[test]
    fn file_extension_uses_last_dot() {
        assert_eq!(ResourcePath::parse("a/b.tar.gz").file_extension(), "gz");
        assert_eq!(ResourcePath::parse("a/Makefile").file_extension(), "");
        assert_eq!(ResourcePath::root().file_extension(), "");
    }

    #[test]
    fn parent_and_prefix() {
        let p = ResourcePath::parse("src/a.c");
        assert_eq!(p.parent(), ResourcePath::parse("src"));
        assert_eq!(ResourcePath::root().parent(), ResourcePath::root());
        assert!(ResourcePath::parse("src").is_prefix_of(&p));
        assert!(ResourcePath::root().is_prefix_of(&p));
        assert!(!ResourcePath::parse("sr").is_prefix_of(&p));
    }

    #[test]
    fn ordering_is_preorder() {
        let mut paths = vec![
            ResourcePath::parse("src2"),
            ResourcePath::parse("src/a"),
            ResourcePath::root(),
            ResourcePath::parse("src"),
        ];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["", "src", "src/a", "src2"]);
    }
}
