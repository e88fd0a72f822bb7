//! Read-only tool-definition graph: configurations, toolchains, tools and
//! input types, linked by arena ids.
//!
//! The graph is owned outside the discovery subsystem. Superclass links form
//! an acyclic chain that attribute lookups walk until a value is found.

mod builder;
pub mod manifest;

pub use builder::BuildModelBuilder;

use indexmap::IndexMap;
use scanscope_api::{
    ConfigurationData, ConfigurationId, InputTypeId, ResourceInfoId, ResourcePath, ToolChainId,
    ToolId,
};
use std::ops::Index;

#[derive(Debug, Clone)]
pub struct InputType {
    pub id: InputTypeId,
    pub name: String,
    pub superclass: Option<InputTypeId>,
    pub source_extensions: Vec<String>,
    /// Raw attribute; several ids may be joined by the profile delimiter.
    pub discovery_profile_ids: Option<String>,
    pub language_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    pub superclass: Option<ToolId>,
    pub profile_id: Option<String>,
    pub input_types: Vec<InputTypeId>,
}

#[derive(Debug, Clone)]
pub struct ToolChain {
    pub id: ToolChainId,
    pub name: String,
    pub superclass: Option<ToolChainId>,
    pub profile_id: Option<String>,
    pub tools: Vec<ToolId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Folder,
    File,
}

#[derive(Debug, Clone)]
pub struct ResourceInfo {
    pub id: ResourceInfoId,
    pub configuration: ConfigurationId,
    pub path: ResourcePath,
    pub kind: ResourceKind,
    pub toolchain: Option<ToolChainId>,
    pub tools: Vec<ToolId>,
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub id: ConfigurationId,
    pub name: String,
    pub profile_id: Option<String>,
    pub per_rc_type_discovery: bool,
    pub toolchain: ToolChainId,
    pub resource_infos: Vec<ResourceInfoId>,
    pub data: ConfigurationData,
}

/// Registry entry describing a discovery profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub id: String,
    /// Discovery for this profile yields a per-file map.
    pub per_file: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BuildModel {
    pub(crate) configurations: Vec<Configuration>,
    pub(crate) toolchains: Vec<ToolChain>,
    pub(crate) tools: Vec<Tool>,
    pub(crate) input_types: Vec<InputType>,
    pub(crate) resource_infos: Vec<ResourceInfo>,
    pub(crate) profiles: IndexMap<String, ProfileDescriptor>,
}

impl BuildModel {
    pub fn builder() -> BuildModelBuilder {
        BuildModelBuilder::default()
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn toolchains(&self) -> &[ToolChain] {
        &self.toolchains
    }

    pub fn input_types(&self) -> &[InputType] {
        &self.input_types
    }

    pub fn resource_infos(&self) -> &[ResourceInfo] {
        &self.resource_infos
    }

    pub fn profile(&self, id: &str) -> Option<&ProfileDescriptor> {
        self.profiles.get(id)
    }

    pub fn is_per_file_profile(&self, id: &str) -> bool {
        self.profiles.get(id).is_some_and(|p| p.per_file)
    }

    pub fn configuration_by_name(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    pub fn tool_by_name(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn toolchain_by_name(&self, name: &str) -> Option<&ToolChain> {
        self.toolchains.iter().find(|t| t.name == name)
    }

    pub fn input_type_by_name(&self, tool: ToolId, name: &str) -> Option<&InputType> {
        self[tool]
            .input_types
            .iter()
            .map(|id| &self[*id])
            .find(|i| i.name == name)
    }

    pub fn resource_info_by_path(
        &self,
        configuration: ConfigurationId,
        path: &ResourcePath,
    ) -> Option<&ResourceInfo> {
        self[configuration]
            .resource_infos
            .iter()
            .map(|id| &self[*id])
            .find(|rc| &rc.path == path)
    }

    /// Toolchain governing a resource override: its own, else the configuration's.
    pub fn resource_toolchain(&self, rc: ResourceInfoId) -> ToolChainId {
        let info = &self[rc];
        info.toolchain
            .unwrap_or_else(|| self[info.configuration].toolchain)
    }

    /// The tool followed by its superclasses.
    pub fn tool_chain_of(&self, tool: ToolId) -> impl Iterator<Item = &Tool> + '_ {
        std::iter::successors(Some(&self[tool]), move |t| t.superclass.map(|s| &self[s]))
    }

    pub fn toolchain_chain_of(&self, tc: ToolChainId) -> impl Iterator<Item = &ToolChain> + '_ {
        std::iter::successors(Some(&self[tc]), move |t| t.superclass.map(|s| &self[s]))
    }

    pub fn input_type_chain_of(&self, input: InputTypeId) -> impl Iterator<Item = &InputType> + '_ {
        std::iter::successors(Some(&self[input]), move |i| i.superclass.map(|s| &self[s]))
    }

    /// Inherited tool profile id.
    pub fn tool_profile_id(&self, tool: ToolId) -> Option<&str> {
        self.tool_chain_of(tool).find_map(|t| t.profile_id.as_deref())
    }

    pub fn toolchain_profile_id(&self, tc: ToolChainId) -> Option<&str> {
        self.toolchain_chain_of(tc)
            .find_map(|t| t.profile_id.as_deref())
    }

    /// Inherited raw profile-id attribute of an input type.
    pub fn input_type_profile_ids(&self, input: InputTypeId) -> Option<&str> {
        self.input_type_chain_of(input)
            .find_map(|i| i.discovery_profile_ids.as_deref())
    }

    /// Inherited source extensions of an input type.
    pub fn input_type_extensions(&self, input: InputTypeId) -> &[String] {
        self.input_type_chain_of(input)
            .map(|i| i.source_extensions.as_slice())
            .find(|exts| !exts.is_empty())
            .unwrap_or(&[])
    }
}

impl Index<ConfigurationId> for BuildModel {
    type Output = Configuration;

    fn index(&self, id: ConfigurationId) -> &Configuration {
        &self.configurations[id.index()]
    }
}

impl Index<ToolChainId> for BuildModel {
    type Output = ToolChain;

    fn index(&self, id: ToolChainId) -> &ToolChain {
        &self.toolchains[id.index()]
    }
}

impl Index<ToolId> for BuildModel {
    type Output = Tool;

    fn index(&self, id: ToolId) -> &Tool {
        &self.tools[id.index()]
    }
}

impl Index<InputTypeId> for BuildModel {
    type Output = InputType;

    fn index(&self, id: InputTypeId) -> &InputType {
        &self.input_types[id.index()]
    }
}

impl Index<ResourceInfoId> for BuildModel {
    type Output = ResourceInfo;

    fn index(&self, id: ResourceInfoId) -> &ResourceInfo {
        &self.resource_infos[id.index()]
    }
}
