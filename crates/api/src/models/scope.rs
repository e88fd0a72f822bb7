use super::path_info::PathInfo;
use super::resource_path::ResourcePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Build configuration handle.
    ConfigurationId,
    "cfg"
);
arena_id!(ToolChainId, "toolchain");
arena_id!(ToolId, "tool");
arena_id!(InputTypeId, "input");
arena_id!(
    /// Folder or file override inside a configuration.
    ResourceInfoId,
    "rc"
);

/// Identifies where scanner settings may differ: a configuration, optionally
/// narrowed to a resource override, a tool, and a tool input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeContext {
    pub configuration: ConfigurationId,
    pub resource_info: Option<ResourceInfoId>,
    pub tool: Option<ToolId>,
    pub input_type: Option<InputTypeId>,
}

impl ScopeContext {
    pub fn configuration(configuration: ConfigurationId) -> Self {
        Self {
            configuration,
            resource_info: None,
            tool: None,
            input_type: None,
        }
    }

    pub fn with_resource(mut self, resource_info: ResourceInfoId) -> Self {
        self.resource_info = Some(resource_info);
        self
    }

    pub fn with_tool(mut self, tool: ToolId, input_type: Option<InputTypeId>) -> Self {
        self.tool = Some(tool);
        self.input_type = input_type;
        self
    }

    pub fn is_whole_configuration(&self) -> bool {
        self.resource_info.is_none() && self.tool.is_none() && self.input_type.is_none()
    }

    /// Stable textual form used as the key for persisted discovery data.
    pub fn storage_key(&self) -> String {
        let mut key = self.configuration.to_string();
        if let Some(rc) = self.resource_info {
            key.push('/');
            key.push_str(&rc.to_string());
        }
        if let Some(tool) = self.tool {
            key.push('/');
            key.push_str(&tool.to_string());
        }
        if let Some(input) = self.input_type {
            key.push('/');
            key.push_str(&input.to_string());
        }
        key
    }
}

impl fmt::Display for ScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// How discovered data is cached for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachingStrategy {
    /// One entry for the whole configuration.
    WholeConfig,
    /// Entries per tool and input type.
    PerResourceType,
    /// One configuration entry whose discovery yields a per-file map.
    PerFile,
}

/// The object a cache entry is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheOwner {
    Configuration(ConfigurationId),
    Resource(ResourceInfoId),
    ToolInput(ToolId, Option<InputTypeId>),
}

impl CacheOwner {
    pub fn for_scope(scope: &ScopeContext) -> Self {
        match (scope.tool, scope.resource_info) {
            (Some(tool), _) => CacheOwner::ToolInput(tool, scope.input_type),
            (None, Some(rc)) => CacheOwner::Resource(rc),
            (None, None) => CacheOwner::Configuration(scope.configuration),
        }
    }
}

/// Output of an external discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDiscoveredInfo {
    /// Scope-level data.
    #[serde(default)]
    pub base: PathInfo,
    /// Resource path to discovered data, present for per-file profiles.
    #[serde(default)]
    pub per_file: Option<BTreeMap<ResourcePath, PathInfo>>,
}

impl RawDiscoveredInfo {
    pub fn whole(base: PathInfo) -> Self {
        Self {
            base,
            per_file: None,
        }
    }

    pub fn per_file(base: PathInfo, map: BTreeMap<ResourcePath, PathInfo>) -> Self {
        Self {
            base,
            per_file: Some(map),
        }
    }
}

/// One merged assignment: discovered data for a language on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingRecord {
    pub path: ResourcePath,
    pub language: String,
    pub info: Arc<PathInfo>,
}

impl SettingRecord {
    pub fn new(path: ResourcePath, language: impl Into<String>, info: Arc<PathInfo>) -> Self {
        Self {
            path,
            language: language.into(),
            info,
        }
    }
}
