//! Scope canonicalization and discovery-profile resolution.
//!
//! A scope is only as specific as the scanner settings of the elements it
//! names: a tool that declares nothing for an input type caches like the
//! tool, a tool that declares nothing caches like its resource, and a
//! resource whose toolchain declares nothing caches like the configuration.

use crate::config::DiscoveryConfig;
use crate::toolchain::BuildModel;
use indexmap::IndexSet;
use scanscope_api::{
    CacheOwner, CachingStrategy, ConfigurationId, InputTypeId, ResourceInfoId, ScopeContext,
    ScopeError, ToolChainId, ToolId,
};
use tracing::debug;

/// Element of the build model a profile-id query may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelElement {
    Configuration(ConfigurationId),
    ResourceInfo(ResourceInfoId),
    ToolChain(ToolChainId),
    Tool(ToolId),
    InputType(InputTypeId),
}

impl ModelElement {
    fn kind(&self) -> &'static str {
        match self {
            ModelElement::Configuration(_) => "configuration",
            ModelElement::ResourceInfo(_) => "resource info",
            ModelElement::ToolChain(_) => "toolchain",
            ModelElement::Tool(_) => "tool",
            ModelElement::InputType(_) => "input type",
        }
    }
}

/// A scope after canonicalization, with its governing profile and strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    pub canonical: ScopeContext,
    pub profile_id: Option<String>,
    pub strategy: CachingStrategy,
}

impl ResolvedScope {
    pub fn owner(&self) -> CacheOwner {
        CacheOwner::for_scope(&self.canonical)
    }
}

pub struct ContextResolver<'m> {
    model: &'m BuildModel,
    config: &'m DiscoveryConfig,
}

impl<'m> ContextResolver<'m> {
    pub fn new(model: &'m BuildModel, config: &'m DiscoveryConfig) -> Self {
        Self { model, config }
    }

    /// Coarsest scope whose scanner settings equal those of `scope`.
    pub fn canonicalize(&self, scope: &ScopeContext) -> ScopeContext {
        let cfg = &self.model[scope.configuration];
        if !cfg.per_rc_type_discovery {
            return ScopeContext::configuration(scope.configuration);
        }

        let mut canonical = *scope;
        if let Some(tool) = canonical.tool {
            if let Some(input) = canonical.input_type
                && !self.input_has_settings(input)
            {
                canonical.input_type = None;
            }
            if canonical.input_type.is_none() && !self.tool_has_settings(tool) {
                canonical.tool = None;
            }
        }

        if canonical.tool.is_none() {
            canonical.input_type = None;
            if let Some(rc) = canonical.resource_info {
                let tc = self.model.resource_toolchain(rc);
                if !self.toolchain_has_settings(tc) {
                    canonical.resource_info = None;
                }
            }
        }
        canonical
    }

    /// Profile id governing `scope`, most specific declaration first.
    pub fn resolve_profile_id(
        &self,
        scope: &ScopeContext,
        search_first_if_absent: bool,
    ) -> Option<String> {
        let model = self.model;

        if scope.tool.is_some()
            && let Some(id) = scope.input_type.and_then(|i| self.first_input_profile(i))
        {
            return Some(id.to_string());
        }
        if let Some(id) = scope.tool.and_then(|t| model.tool_profile_id(t)) {
            return Some(id.to_string());
        }

        let cfg = &model[scope.configuration];
        let tc = scope
            .resource_info
            .map(|rc| model.resource_toolchain(rc))
            .unwrap_or(cfg.toolchain);
        if let Some(id) = model.toolchain_profile_id(tc) {
            return Some(id.to_string());
        }
        if let Some(id) = cfg.profile_id.as_deref() {
            return Some(id.to_string());
        }

        if search_first_if_absent {
            return self.first_declared_profile(scope.configuration);
        }
        None
    }

    /// Every profile id reachable from a tool or toolchain.
    pub fn all_profile_ids(&self, element: ModelElement) -> Result<IndexSet<String>, ScopeError> {
        let mut ids = IndexSet::new();
        match element {
            ModelElement::Tool(tool) => self.collect_tool_ids(tool, &mut ids),
            ModelElement::ToolChain(tc) => {
                for chain in self.model.toolchain_chain_of(tc) {
                    if let Some(id) = &chain.profile_id {
                        ids.insert(id.clone());
                    }
                }
                for tool in &self.model[tc].tools {
                    self.collect_tool_ids(*tool, &mut ids);
                }
            }
            other => return Err(ScopeError::UnsupportedScope { kind: other.kind() }),
        }
        Ok(ids)
    }

    /// Canonical scope, governing profile id and caching strategy.
    pub fn resolve(&self, scope: &ScopeContext) -> ResolvedScope {
        let mut canonical = self.canonicalize(scope);
        let profile_id = self.resolve_profile_id(&canonical, self.config.search_first_profile);

        let strategy = match profile_id.as_deref() {
            Some(id) if self.model.is_per_file_profile(id) => {
                canonical = ScopeContext::configuration(canonical.configuration);
                CachingStrategy::PerFile
            }
            _ if self.model[canonical.configuration].per_rc_type_discovery => {
                CachingStrategy::PerResourceType
            }
            _ => CachingStrategy::WholeConfig,
        };

        debug!(
            scope = %scope,
            canonical = %canonical,
            profile = profile_id.as_deref().unwrap_or("<none>"),
            ?strategy,
            "resolved discovery scope"
        );
        ResolvedScope {
            canonical,
            profile_id,
            strategy,
        }
    }

    /// First input type of `tool`'s superclass that shares a source
    /// extension with `input`.
    pub fn matching_super_input(
        &self,
        superclass: ToolId,
        input: Option<InputTypeId>,
    ) -> Option<InputTypeId> {
        let input = input?;
        let exts = self.model.input_type_extensions(input);
        self.model[superclass]
            .input_types
            .iter()
            .copied()
            .find(|candidate| {
                self.model
                    .input_type_extensions(*candidate)
                    .iter()
                    .any(|e| exts.contains(e))
            })
    }

    fn input_has_settings(&self, input: InputTypeId) -> bool {
        self.first_input_profile(input).is_some()
    }

    fn tool_has_settings(&self, tool: ToolId) -> bool {
        self.model.tool_profile_id(tool).is_some()
    }

    fn toolchain_has_settings(&self, tc: ToolChainId) -> bool {
        self.model.toolchain_profile_id(tc).is_some()
    }

    fn first_input_profile(&self, input: InputTypeId) -> Option<&'m str> {
        self.model
            .input_type_profile_ids(input)
            .and_then(|raw| self.config.split_profile_ids(raw).next())
    }

    fn first_declared_profile(&self, configuration: ConfigurationId) -> Option<String> {
        let model = self.model;
        let tc = model[configuration].toolchain;
        model[tc].tools.iter().find_map(|tool| {
            model.tool_profile_id(*tool).map(str::to_string).or_else(|| {
                model[*tool]
                    .input_types
                    .iter()
                    .find_map(|i| self.first_input_profile(*i).map(str::to_string))
            })
        })
    }

    fn collect_tool_ids(&self, tool: ToolId, ids: &mut IndexSet<String>) {
        for chain in self.model.tool_chain_of(tool) {
            if let Some(id) = &chain.profile_id {
                ids.insert(id.clone());
            }
            for input in &chain.input_types {
                for declared in self.model.input_type_chain_of(*input) {
                    if let Some(raw) = &declared.discovery_profile_ids {
                        ids.extend(self.config.split_profile_ids(raw).map(str::to_string));
                    }
                }
            }
        }
    }
}
