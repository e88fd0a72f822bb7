use crate::merge::MergeMode;
use serde::{Deserialize, Serialize};

/// Delimiter between profile ids in an input type's discovery attribute.
pub const DEFAULT_PROFILE_DELIMITER: char = '|';

/// Tunables of the discovery subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub profile_delimiter: char,
    /// Fall back to the first profile id declared by any tool of the
    /// configuration when the scope chain configures none.
    pub search_first_profile: bool,
    pub merge_mode: MergeMode,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            profile_delimiter: DEFAULT_PROFILE_DELIMITER,
            search_first_profile: true,
            merge_mode: MergeMode::Tree,
        }
    }
}

impl DiscoveryConfig {
    /// Split a raw, delimiter-joined profile attribute into trimmed ids.
    pub fn split_profile_ids<'a>(&self, raw: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        raw.split(self.profile_delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
