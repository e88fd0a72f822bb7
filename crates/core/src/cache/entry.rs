use scanscope_api::{PathInfo, ScopeContext, SettingRecord};
use std::sync::Arc;
use xxhash_rust::xxh3::xxh3_64;

/// Discovered value attached to one cache owner, tagged with the profile
/// that produced it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub profile_id: String,
    pub value: Arc<PathInfo>,
    /// Merged per-resource records, present for per-file profiles.
    pub settings: Option<Arc<[SettingRecord]>>,
}

impl CacheEntry {
    pub fn new(profile_id: impl Into<String>, value: Arc<PathInfo>) -> Self {
        Self {
            profile_id: profile_id.into(),
            value,
            settings: None,
        }
    }

    pub fn with_settings(mut self, settings: Vec<SettingRecord>) -> Self {
        self.settings = Some(settings.into());
        self
    }

    pub fn is_valid_for(&self, profile_id: &str) -> bool {
        self.profile_id == profile_id
    }
}

/// Fingerprint of a scope and profile, handed to the store to look up
/// persisted discovery data.
pub fn stored_info_key(scope: &ScopeContext, profile_id: &str) -> String {
    let key = format!("{}:{}", scope.storage_key(), profile_id);
    format!("{:016x}", xxh3_64(key.as_bytes()))
}
