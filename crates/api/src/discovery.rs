//! Interfaces of the collaborators the discovery subsystem drives: the
//! build/parser step that produces raw data, the persisted profile store, and
//! the factory that materializes per-resource configuration data.

use crate::error::{DiscoveryResult, ResourceDataError};
use crate::models::{
    FileData, FolderData, LanguageData, RawDiscoveredInfo, ResourceData, ResourcePath, ScopeContext,
};
use tokio_util::sync::CancellationToken;

/// Runs the external build/compiler-output parser for a scope.
pub trait DiscoveryLoader: Send + Sync {
    /// `fresh_run` is false when the store already holds data for the scope
    /// and the loader may read it instead of running the build again.
    fn load(
        &self,
        scope: &ScopeContext,
        profile_id: &str,
        fresh_run: bool,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<RawDiscoveredInfo>;
}

/// Persisted per-scope discovery records owned by the profile registry.
pub trait DiscoveryStore: Send + Sync {
    fn has_stored_info(&self, scope: &ScopeContext, serialized: &str) -> bool;

    fn remove_stored_info(&self, scope: &ScopeContext);
}

/// Store that never has anything; every miss triggers a fresh run.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

impl DiscoveryStore for NoopStore {
    fn has_stored_info(&self, _scope: &ScopeContext, _serialized: &str) -> bool {
        false
    }

    fn remove_stored_info(&self, _scope: &ScopeContext) {}
}

/// Creates configuration data for resources the merge has to synthesize.
pub trait ResourceDataFactory: Send + Sync {
    fn create_file_data(
        &self,
        path: &ResourcePath,
        parent: &FolderData,
        language: Option<&LanguageData>,
    ) -> Result<FileData, ResourceDataError>;

    fn create_file_data_from(
        &self,
        path: &ResourcePath,
        base: &FileData,
    ) -> Result<FileData, ResourceDataError>;

    fn create_folder_data(
        &self,
        path: &ResourcePath,
        parent: &FolderData,
    ) -> Result<FolderData, ResourceDataError>;

    /// Whether existing resource data takes part in the merge.
    fn include_in_calculation(&self, _data: &ResourceData) -> bool {
        true
    }
}

/// Factory whose synthesized data inherits languages from its base.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritingDataFactory;

impl ResourceDataFactory for InheritingDataFactory {
    fn create_file_data(
        &self,
        path: &ResourcePath,
        parent: &FolderData,
        language: Option<&LanguageData>,
    ) -> Result<FileData, ResourceDataError> {
        let language = language
            .cloned()
            .or_else(|| parent.language_for_file(path).cloned());
        Ok(FileData::new(path.clone(), language))
    }

    fn create_file_data_from(
        &self,
        path: &ResourcePath,
        base: &FileData,
    ) -> Result<FileData, ResourceDataError> {
        Ok(FileData::new(path.clone(), base.language.clone()))
    }

    fn create_folder_data(
        &self,
        path: &ResourcePath,
        parent: &FolderData,
    ) -> Result<FolderData, ResourceDataError> {
        Ok(FolderData::new(path.clone(), parent.languages.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inheriting_factory_copies_parent_languages() {
        let parent = FolderData::new(ResourcePath::root(), vec![LanguageData::new("c", ["c"])]);
        let folder = InheritingDataFactory
            .create_folder_data(&ResourcePath::parse("src"), &parent)
            .unwrap();
        assert_eq!(folder.path, ResourcePath::parse("src"));
        assert_eq!(folder.languages, parent.languages);

        let file = InheritingDataFactory
            .create_file_data(&ResourcePath::parse("src/a.c"), &folder, None)
            .unwrap();
        assert_eq!(file.language.map(|l| l.id), Some("c".to_string()));
    }

    #[test]
    fn noop_store_is_always_empty() {
        let scope = ScopeContext::configuration(crate::models::ConfigurationId(0));
        assert!(!NoopStore.has_stored_info(&scope, "x"));
    }
}
