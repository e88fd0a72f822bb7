//! JSON description of a build model, referencing elements by name.
//!
//! Elements may only reference names declared before them, which keeps
//! superclass chains acyclic by construction.

use super::{BuildModel, BuildModelBuilder};
use crate::config::DiscoveryConfig;
use crate::error::{Result, ScanscopeError};
use scanscope_api::{ConfigurationData, InputTypeId, ResourcePath, ToolChainId, ToolId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub id: String,
    #[serde(default)]
    pub per_file: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputTypeSpec {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub source_extensions: Vec<String>,
    #[serde(default)]
    pub discovery_profile_ids: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub input_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolChainSpec {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKindSpec {
    #[default]
    Folder,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfoSpec {
    pub path: ResourcePath,
    #[serde(default)]
    pub kind: ResourceKindSpec,
    #[serde(default)]
    pub toolchain: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationSpec {
    pub name: String,
    pub toolchain: String,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub per_rc_type_discovery: bool,
    #[serde(default)]
    pub resources: Vec<ResourceInfoSpec>,
    #[serde(default)]
    pub data: ConfigurationData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub profiles: Vec<ProfileSpec>,
    #[serde(default)]
    pub input_types: Vec<InputTypeSpec>,
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
    #[serde(default)]
    pub toolchains: Vec<ToolChainSpec>,
    pub configurations: Vec<ConfigurationSpec>,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl ProjectManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn to_model(&self) -> Result<BuildModel> {
        let mut b = BuildModelBuilder::default();
        for profile in &self.profiles {
            b.profile(profile.id.clone(), profile.per_file);
        }

        let mut inputs: HashMap<&str, InputTypeId> = HashMap::new();
        for spec in &self.input_types {
            let superclass = lookup(&inputs, spec.superclass.as_deref(), "input type", &spec.name)?;
            let id = b.input_type(
                spec.name.clone(),
                superclass,
                spec.source_extensions.iter().cloned(),
                spec.discovery_profile_ids.as_deref(),
            );
            if let Some(language) = &spec.language {
                b.set_input_language(id, language.clone());
            }
            inputs.insert(spec.name.as_str(), id);
        }

        let mut tools: HashMap<&str, ToolId> = HashMap::new();
        for spec in &self.tools {
            let superclass = lookup(&tools, spec.superclass.as_deref(), "tool", &spec.name)?;
            let owned = lookup_all(&inputs, &spec.input_types, "input type", &spec.name)?;
            let id = b.tool(spec.name.clone(), superclass, spec.profile_id.as_deref(), owned);
            tools.insert(spec.name.as_str(), id);
        }

        let mut toolchains: HashMap<&str, ToolChainId> = HashMap::new();
        for spec in &self.toolchains {
            let superclass = lookup(&toolchains, spec.superclass.as_deref(), "toolchain", &spec.name)?;
            let owned = lookup_all(&tools, &spec.tools, "tool", &spec.name)?;
            let id = b.toolchain(spec.name.clone(), superclass, spec.profile_id.as_deref(), owned);
            toolchains.insert(spec.name.as_str(), id);
        }

        for spec in &self.configurations {
            let toolchain = lookup(&toolchains, Some(spec.toolchain.as_str()), "toolchain", &spec.name)?
                .ok_or_else(|| ScanscopeError::Manifest(format!("configuration `{}` has no toolchain", spec.name)))?;
            let cfg = b.configuration(
                spec.name.clone(),
                toolchain,
                spec.profile_id.as_deref(),
                spec.per_rc_type_discovery,
                spec.data.clone(),
            );
            for rc in &spec.resources {
                if rc.path.is_root() {
                    return Err(ScanscopeError::Manifest(format!(
                        "configuration `{}` redeclares the root resource",
                        spec.name
                    )));
                }
                let rc_tools = lookup_all(&tools, &rc.tools, "tool", &spec.name)?;
                match rc.kind {
                    ResourceKindSpec::Folder => {
                        let tc = lookup(&toolchains, rc.toolchain.as_deref(), "toolchain", &spec.name)?;
                        b.folder_info(cfg, rc.path.clone(), tc, rc_tools);
                    }
                    ResourceKindSpec::File => {
                        b.file_info(cfg, rc.path.clone(), rc_tools);
                    }
                }
            }
        }

        Ok(b.build())
    }
}

fn lookup<T: Copy>(
    table: &HashMap<&str, T>,
    name: Option<&str>,
    kind: &str,
    referrer: &str,
) -> Result<Option<T>> {
    match name {
        None => Ok(None),
        Some(name) => table.get(name).copied().map(Some).ok_or_else(|| {
            ScanscopeError::Manifest(format!("unknown {kind} `{name}` referenced by `{referrer}`"))
        }),
    }
}

fn lookup_all<T: Copy>(
    table: &HashMap<&str, T>,
    names: &[String],
    kind: &str,
    referrer: &str,
) -> Result<Vec<T>> {
    names
        .iter()
        .map(|name| {
            table.get(name.as_str()).copied().ok_or_else(|| {
                ScanscopeError::Manifest(format!("unknown {kind} `{name}` referenced by `{referrer}`"))
            })
        })
        .collect()
}
