use super::{
    BuildModel, Configuration, InputType, ProfileDescriptor, ResourceInfo, ResourceKind, Tool,
    ToolChain,
};
use scanscope_api::{
    ConfigurationData, ConfigurationId, InputTypeId, ResourceInfoId, ResourcePath, ToolChainId,
    ToolId,
};

/// Incrementally assembles a [`BuildModel`]. Ids handed out are only valid
/// for the model this builder produces.
#[derive(Debug, Default)]
pub struct BuildModelBuilder {
    model: BuildModel,
}

impl BuildModelBuilder {
    pub fn profile(&mut self, id: impl Into<String>, per_file: bool) -> &mut Self {
        let id = id.into();
        self.model
            .profiles
            .insert(id.clone(), ProfileDescriptor { id, per_file });
        self
    }

    pub fn input_type<I, S>(
        &mut self,
        name: impl Into<String>,
        superclass: Option<InputTypeId>,
        source_extensions: I,
        discovery_profile_ids: Option<&str>,
    ) -> InputTypeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = InputTypeId(self.model.input_types.len() as u32);
        self.model.input_types.push(InputType {
            id,
            name: name.into(),
            superclass,
            source_extensions: source_extensions.into_iter().map(Into::into).collect(),
            discovery_profile_ids: discovery_profile_ids.map(str::to_string),
            language_id: None,
        });
        id
    }

    pub fn set_input_language(&mut self, input: InputTypeId, language_id: impl Into<String>) -> &mut Self {
        self.model.input_types[input.index()].language_id = Some(language_id.into());
        self
    }

    pub fn tool(
        &mut self,
        name: impl Into<String>,
        superclass: Option<ToolId>,
        profile_id: Option<&str>,
        input_types: Vec<InputTypeId>,
    ) -> ToolId {
        let id = ToolId(self.model.tools.len() as u32);
        self.model.tools.push(Tool {
            id,
            name: name.into(),
            superclass,
            profile_id: profile_id.map(str::to_string),
            input_types,
        });
        id
    }

    pub fn toolchain(
        &mut self,
        name: impl Into<String>,
        superclass: Option<ToolChainId>,
        profile_id: Option<&str>,
        tools: Vec<ToolId>,
    ) -> ToolChainId {
        let id = ToolChainId(self.model.toolchains.len() as u32);
        self.model.toolchains.push(ToolChain {
            id,
            name: name.into(),
            superclass,
            profile_id: profile_id.map(str::to_string),
            tools,
        });
        id
    }

    /// Adds a configuration together with its root folder resource info,
    /// which carries the configuration's toolchain and tools.
    pub fn configuration(
        &mut self,
        name: impl Into<String>,
        toolchain: ToolChainId,
        profile_id: Option<&str>,
        per_rc_type_discovery: bool,
        data: ConfigurationData,
    ) -> ConfigurationId {
        let id = ConfigurationId(self.model.configurations.len() as u32);
        self.model.configurations.push(Configuration {
            id,
            name: name.into(),
            profile_id: profile_id.map(str::to_string),
            per_rc_type_discovery,
            toolchain,
            resource_infos: Vec::new(),
            data,
        });
        let tools = self.model.toolchains[toolchain.index()].tools.clone();
        self.push_resource_info(id, ResourcePath::root(), ResourceKind::Folder, Some(toolchain), tools);
        id
    }

    pub fn folder_info(
        &mut self,
        configuration: ConfigurationId,
        path: ResourcePath,
        toolchain: Option<ToolChainId>,
        tools: Vec<ToolId>,
    ) -> ResourceInfoId {
        self.push_resource_info(configuration, path, ResourceKind::Folder, toolchain, tools)
    }

    pub fn file_info(
        &mut self,
        configuration: ConfigurationId,
        path: ResourcePath,
        tools: Vec<ToolId>,
    ) -> ResourceInfoId {
        self.push_resource_info(configuration, path, ResourceKind::File, None, tools)
    }

    /// Root folder resource info of a configuration.
    pub fn root_info(&self, configuration: ConfigurationId) -> Option<ResourceInfoId> {
        self.model.configurations[configuration.index()]
            .resource_infos
            .first()
            .copied()
    }

    pub fn build(self) -> BuildModel {
        self.model
    }

    fn push_resource_info(
        &mut self,
        configuration: ConfigurationId,
        path: ResourcePath,
        kind: ResourceKind,
        toolchain: Option<ToolChainId>,
        tools: Vec<ToolId>,
    ) -> ResourceInfoId {
        let id = ResourceInfoId(self.model.resource_infos.len() as u32);
        self.model.resource_infos.push(ResourceInfo {
            id,
            configuration,
            path,
            kind,
            toolchain,
            tools,
        });
        self.model.configurations[configuration.index()]
            .resource_infos
            .push(id);
        id
    }
}
